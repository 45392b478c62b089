//! These models represent the objects passed around by the agent
//!
//! Messages and the conversation history are replayed verbatim to the completion
//! endpoint on every turn. Tasks are the structured intent the model extracts from a
//! request, and only live for the duration of one turn.
pub mod history;
pub mod message;
pub mod role;
pub mod task;
