//! Example decision functions.
//!
//! Real picks usually come from a trained model outside this crate; these
//! cover baselines and tests. Each one takes the game by reference and hands
//! back a [`Decision`], so they drop straight into
//! [`Bracket::simulate`](crate::Bracket::simulate).

use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::Result;
use crate::game::GameNode;
use crate::simulate::Decision;

/// Estimated scoring margin per seed position of separation.
const SEED_GAP_MARGIN: f64 = 1.1;

/// Standard deviation of a single game's scoring margin.
const SCORING_STDDEV: f64 = 11.0;

/// Always advances the better-seeded opponent (lower seed number). Ties go
/// to the first opponent.
pub fn chalk(game: &GameNode) -> Result<Decision> {
    let (a, b) = game.require_opponents()?;
    Ok(Decision::Index(if b.seed < a.seed { 1 } else { 0 }))
}

/// Uniform coin flip.
pub fn coin_flip<R: Rng>(rng: &mut R, game: &GameNode) -> Result<Decision> {
    game.require_opponents()?;
    Ok(Decision::Index(rng.gen_range(0..2)))
}

/// Draws the winner with a probability derived from the seed difference:
/// the expected margin goes through a normal CDF, then a uniform draw picks
/// the side.
pub fn seed_gap<R: Rng>(rng: &mut R, game: &GameNode) -> Result<Decision> {
    let (a, b) = game.require_opponents()?;
    let margin = (b.seed as f64 - a.seed as f64) * SEED_GAP_MARGIN;
    let normal = Normal::new(0.0, 1.0).unwrap();
    let p_first = normal.cdf(margin / SCORING_STDDEV);
    Ok(Decision::Index(if rng.gen::<f64>() < p_first { 0 } else { 1 }))
}
