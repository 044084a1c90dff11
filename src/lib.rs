//! Bracket Core - single-elimination tournament bracket engine.
//!
//! Models a tournament as a complete binary heap of games, plays it out with
//! a pluggable decision function, scores the result against real outcomes,
//! and serializes brackets for display.
//!
//! ```
//! use bracket_core::{Bracket, Decision, ExportFormat, Squad};
//!
//! let mut bracket = Bracket::new("2011-12");
//! for (i, slot) in (31..bracket.len()).enumerate() {
//!     let game = bracket.game_mut(slot).unwrap();
//!     game.opponents.push(Squad::new(i as u64 * 2, "home", 1));
//!     game.opponents.push(Squad::new(i as u64 * 2 + 1, "away", 16));
//! }
//!
//! bracket.simulate(|_game| Ok(Decision::Index(0))).unwrap();
//! let json = bracket.export(ExportFormat::Heap).unwrap();
//! assert!(json.contains("\"season\":\"2011-12\""));
//! ```

pub mod bracket;
pub mod constants;
pub mod deciders;
pub mod error;
pub mod export;
pub mod game;
pub mod index;
pub mod score;
pub mod simulate;
pub mod squad;

pub use bracket::Bracket;
pub use constants::{DEFAULT_DELIM, DEFAULT_REGIONS, DEFAULT_ROUNDS, ROUND_POINTS};
pub use error::{BracketError, Result};
pub use export::ExportFormat;
pub use game::GameNode;
pub use index::{child_indices, parent_index, BracketIndex, Coordinate};
pub use score::PointsOverride;
pub use simulate::{run_simulations, Decision};
pub use squad::{Squad, SquadRef};
