pub mod app_config;
pub mod coordinator;
pub mod lares;
pub mod platform;
