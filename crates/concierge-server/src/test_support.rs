use concierge::agent::Agent;
use concierge::config::AgentConfig;
use concierge::opener::RecordingOpener;
use concierge::providers::mock::MockProvider;
use std::sync::Arc;

use crate::state::AppState;

pub fn test_state(replies: &[&str], opener: Arc<RecordingOpener>) -> AppState {
    let config = AgentConfig {
        require_confirmation: false,
        ..AgentConfig::default()
    };
    let agent = Agent::new(Arc::new(config), Arc::new(MockProvider::new(replies)), opener).unwrap();
    AppState::new(agent)
}
