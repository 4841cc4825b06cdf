pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod view;

pub use handlers::{create_app, AppState};
