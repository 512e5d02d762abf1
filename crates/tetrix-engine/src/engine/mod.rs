//! Game session logic built on the [`core`](crate::core) data structures.
//!
//! - [`Session`] - The state machine: spawn, gravity, movement, locking, scoring
//! - [`SessionConfig`] - Board size, gravity curve, scoring rules and seed
//! - [`SessionEvents`] - Notifications returned by every session command
//! - [`SessionStats`] - Score, level and counters
//! - [`ShapeSeed`] - Seed for deterministic shape generation
//!
//! # Game Flow
//!
//! 1. Build a [`Session`] from a [`SessionConfig`]
//! 2. [`Session::start`] clears the board and spawns the first piece
//! 3. The driver calls [`Session::tick`] every [`Session::timer_interval`]
//!    and forwards input to the movement commands
//! 4. Locked pieces score; full lines are removed and the session waits one
//!    settle delay before the next spawn
//! 5. The game ends when a new piece cannot spawn
//!
//! # Example
//!
//! ```
//! use tetrix_engine::{Session, SessionConfig, ShapeSeed};
//!
//! let config = SessionConfig {
//!     seed: Some(ShapeSeed::from_bytes([1; 16])),
//!     ..SessionConfig::default()
//! };
//! let mut session = Session::new(config).unwrap();
//! session.start();
//!
//! while !session.state().is_game_over() {
//!     session.hard_drop();
//!     session.tick();
//! }
//! assert!(session.pieces_dropped() > 0);
//! ```

pub use self::{
    session::*, session_config::*, session_events::*, session_stats::*, shape_seed::*,
};

mod session;
mod session_config;
mod session_events;
mod session_stats;
mod shape_seed;
