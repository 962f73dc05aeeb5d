//! Financial Agent Router
//!
//! Routes free-text user queries to one of three specialized capability
//! agents, executes the chosen agent, and recovers from a known class of
//! finance-lookup failures by asking the search agent for a ticker symbol
//! before retrying the finance agent once.
//!
//! QUERY FLOW:
//! INPUT → ROUTE → EXECUTE → FALLBACK? → COMPLETE

pub mod activity;
pub mod agent;
pub mod agents;
pub mod api;
pub mod config;
pub mod error;
pub mod executor;
pub mod fallback;
pub mod gemini;
pub mod market;
pub mod models;
pub mod router;
pub mod state;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use router::Router;
