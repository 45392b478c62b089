use concierge::agent::Agent;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state. Requests take turns on the single conversation.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<Mutex<Agent>>,
}

impl AppState {
    pub fn new(agent: Agent) -> Self {
        Self {
            agent: Arc::new(Mutex::new(agent)),
        }
    }
}
