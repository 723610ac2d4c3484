//! Centralized error types for the simulation crate.
//!
//! The tick itself is infallible: counters are clamped and missing entities short-circuit
//! the affected system. Errors only surface while building or inspecting a simulation.

/// Main error type for the simulation.
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised while validating a background layout.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LayoutError {
    #[error("Background dimensions must be positive, got {width}x{height}")]
    NonPositiveDimensions { width: f32, height: f32 },

    #[error("Reference height must be positive, got {0}")]
    NonPositiveReference(f32),

    #[error("Platform gap ends before it starts: {start}..={end}")]
    InvertedGap { start: f32, end: f32 },
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
