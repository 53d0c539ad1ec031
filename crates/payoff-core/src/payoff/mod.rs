//! Debt payoff projection.
//!
//! [`engine::simulate`] is the single authoritative amortization simulator.
//! Everything else in this module (budgeting, plan comparison, the linear
//! chart preview) is built on top of it or explicitly labelled approximate.

pub mod budget;
pub mod engine;
pub mod strategy;

#[cfg(feature = "planning")]
pub mod plan;

#[cfg(feature = "preview")]
pub mod preview;

pub use engine::{simulate, Milestone, PayoffResult, SimulationConfig, TrajectoryPoint};
