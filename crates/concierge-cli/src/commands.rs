pub mod configure;
pub mod session;
pub mod version;
