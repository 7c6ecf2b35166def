pub mod client;
pub mod domain;
pub mod mac;
pub mod output;
pub mod setup;
mod xml;
