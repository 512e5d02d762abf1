//! Rules engine for a falling-block puzzle game.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - Piece geometry, the active piece and the board grid
//! - [`engine`] - The game session state machine, its configuration and events
//!
//! Rendering, input capture and the gravity timer live outside the engine.
//! Callers drive a [`Session`] with commands and react to the
//! [`SessionEvents`] each command returns.
//!
//! # Example
//!
//! ```
//! use tetrix_engine::{Session, SessionConfig, SessionEvent};
//!
//! let mut session = Session::new(SessionConfig::default()).unwrap();
//! let events = session.start();
//! assert!(events.iter().any(|e| e == SessionEvent::BoardRedrawNeeded));
//!
//! session.move_left();
//! session.rotate_right();
//! session.hard_drop();
//!
//! // The driver re-arms its timer with this interval after every call.
//! let _interval = session.timer_interval();
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Rejected [`SessionConfig`] values.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display(
        "board must be between {}x{} and {}x{}, got {width}x{height}",
        SessionConfig::MIN_WIDTH,
        SessionConfig::MIN_HEIGHT,
        SessionConfig::MAX_WIDTH,
        SessionConfig::MAX_HEIGHT
    )]
    BoardSize { width: usize, height: usize },
    #[display("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },
    #[display("pieces per level must be greater than zero")]
    ZeroPiecesPerLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid hex: expected 32 characters, got {_0}")]
    Length(#[error(not(source))] usize),
    #[display("invalid hex: {_0}")]
    Digits(#[error(not(source))] String),
}
