//! Quarterly employee-recognition workflow core.
//!
//! The host HR platform supplies a quarterly period and a role
//! classification; this crate runs the selection → quorum → shortlist →
//! rating → scoring pipeline and answers read-only status and ranking
//! queries, including the per-user derived phase.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
