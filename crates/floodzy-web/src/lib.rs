//! floodzy-web: HTTP adapter for the Floodzy chatbot
//!
//! ```text
//! POST /chatbot       {question, history?} -> {answer}
//! GET  /chatbot       liveness message
//! ```
//!
//! Both routes are also served under `/api`.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
