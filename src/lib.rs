//! FinePrint contract analysis service
//!
//! Extracts the first page of an uploaded contract PDF, asks a hosted
//! generative model to flag risky clauses, and turns the free-text reply
//! into a structured record plus a plain-language summary.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::{create_router, AppState};
