//! Last-change widget library
//!
//! Fetches recent commit activity of public GitHub repositories and renders
//! it as an embeddable SVG image.

pub mod activity;
pub mod cache;
pub mod colour;
pub mod compose;
pub mod config;
pub mod error;
pub mod headers;
pub mod humanize;
pub mod render;
pub mod server;
pub mod source;
pub mod types;

#[cfg(test)]
mod testing;

pub use activity::ActivityService;
pub use cache::{Clock, SystemClock, TtlCache};
pub use config::{ExecutionMode, WidgetConfig};
pub use error::{Result, WidgetError};
pub use server::{create_router, start_server, ServerState, SharedState};
pub use source::RepositorySource;
pub use types::*;
