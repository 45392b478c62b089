use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SendMessageResponse {
    pub response: String,
}

async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Json<SendMessageResponse> {
    if request.message.is_empty() {
        return Json(SendMessageResponse {
            response: "No message received".to_string(),
        });
    }

    let mut agent = state.agent.lock().await;
    let response = agent.process_command(&request.message).await;
    Json(SendMessageResponse { response })
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/send_message", post(send_message))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use concierge::opener::RecordingOpener;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/send_message")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn reply_of(app: Router, body: &str) -> (StatusCode, String) {
        let response = app.oneshot(post_json(body)).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let reply: SendMessageResponse = serde_json::from_slice(&bytes).unwrap();
        (status, reply.response)
    }

    #[tokio::test]
    async fn test_send_message_runs_task() {
        let opener = Arc::new(RecordingOpener::default());
        let state = test_state(
            &[r#"{"type": "maps", "parameters": {"start": "Paris", "end": "Lyon"}}"#],
            opener.clone(),
        );

        let (status, reply) =
            reply_of(routes(state.clone()), r#"{"message": "directions from Paris to Lyon"}"#)
                .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            reply,
            "I've completed the task: Successfully opened https://www.google.com/maps/dir/Paris/Lyon"
        );
        assert_eq!(opener.opened(), vec!["https://www.google.com/maps/dir/Paris/Lyon"]);
        assert_eq!(state.agent.lock().await.history().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_message() {
        let state = test_state(&[], Arc::new(RecordingOpener::default()));

        for body in [r#"{"message": ""}"#, "{}"] {
            let (status, reply) = reply_of(routes(state.clone()), body).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(reply, "No message received");
        }
        // nothing reached the agent
        assert!(state.agent.lock().await.history().is_empty());
    }

    #[tokio::test]
    async fn test_conversation_is_shared_across_requests() {
        let state = test_state(
            &["Hello!", "You said hi earlier."],
            Arc::new(RecordingOpener::default()),
        );

        let (_, first) = reply_of(routes(state.clone()), r#"{"message": "hi"}"#).await;
        let (_, second) = reply_of(routes(state.clone()), r#"{"message": "what did I say?"}"#).await;

        assert_eq!(first, "Hello!");
        assert_eq!(second, "You said hi earlier.");
        assert_eq!(state.agent.lock().await.history().len(), 4);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let state = test_state(&[], Arc::new(RecordingOpener::default()));
        let response = routes(state).oneshot(post_json("not json")).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
