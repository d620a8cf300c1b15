//! QS Evaluation - assessment evaluation engine
//!
//! Turns submitted answer sheets into per-factor scores, interprets each
//! score into a risk level through pluggable rule strategies, aggregates the
//! result and drives the assessment lifecycle that consumes it.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
