pub mod agent;
pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod key_manager;
pub mod models;
pub mod opener;
pub mod prompt_template;
pub mod providers;
