//! Lambda handler and the release notification pipeline

pub mod deliver;
pub mod handler;
pub mod parsing;
pub mod pipeline;
pub mod response;
pub mod summarize;

// Re-export the main handler for convenience
pub use handler::handler;
pub use pipeline::{Pipeline, PipelineSettings};
