//! Deterministic simulation core of a 2D side-scrolling action game.

pub mod app;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatter;
pub mod logging;
pub mod simulation;
pub mod snapshot;
pub mod systems;
pub mod terrain;
