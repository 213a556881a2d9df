//! HTTP route handlers.

pub mod connection;
pub mod health;
pub mod prompts;
pub mod resources;
pub mod tools;
