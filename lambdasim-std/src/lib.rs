//! # lambdasim-std
//!
//! Standard implementations for the lambdasim invocation simulator.
//!
//! This crate provides:
//! - **Engine**: [`Simulator`], [`SimulatorBuilder`]
//! - **Configuration**: [`SimulatorConfig`]
//! - **Gateway proxy**: [`GatewayProxy`], [`PathTemplate`]
//! - **Log capture**: [`CaptureLayer`] and the [`logging`] setup
//! - **Testing**: ready-made handlers in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use lambdasim_core;

// Modules
pub mod capture;
pub mod config;
pub mod engine;
pub mod gateway;
pub mod logging;
pub mod testing;
mod unwind;

pub use capture::CaptureLayer;
pub use config::SimulatorConfig;
pub use engine::{Simulator, SimulatorBuilder};
pub use gateway::{GatewayProxy, PathTemplate};
