//! Store/brand RAG (Red/Amber/Green) attach-rate classification engine.
//!
//! A pure, synchronous, read-only computation: callers load stores and
//! sales records however they like, hand them to [`engine::evaluate`] with
//! explicit [`engine::EngineOptions`], and get back a priority-ordered
//! [`report::RagReport`]. The engine never touches storage, never logs,
//! and never reads the clock.

pub mod aggregate;
pub mod attach_rate;
pub mod engine;
pub mod error;
pub mod insights;
pub mod model;
pub mod report;
pub mod status;
pub mod thresholds;
pub mod trend;
pub mod types;
