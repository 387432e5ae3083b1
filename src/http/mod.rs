//! HTTP API server for session control and monitoring
//!
//! This module provides a REST API over the streaming sessions:
//! - POST /sessions/start - Start a new streaming session
//! - POST /sessions/stop/:id - Stop a session
//! - GET /sessions/:id/status - Connection status and latest recognized text
//! - GET /sessions/:id/transcript - Recognition updates received so far
//! - GET /sessions/:id/history - Conversation turns (when collaborators are wired)
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
