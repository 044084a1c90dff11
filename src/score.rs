use std::collections::HashMap;

use crate::bracket::Bracket;
use crate::error::{BracketError, Result};
use crate::index::depth_of;

/// Replacement scoring table passed to [`Bracket::score`].
///
/// Either shape replaces the bracket's pointsmap for this and later scoring
/// passes. Rounds the override does not mention score zero.
#[derive(Clone, Debug)]
pub enum PointsOverride {
    /// Points per round, paired positionally with the round list,
    /// championship first.
    PerRound(Vec<u32>),
    /// Points keyed by round label. Every key must name a known round.
    ByLabel(HashMap<String, u32>),
}

impl Bracket {
    /// Mark every game's `accurate` flag against the real bracket: `true`
    /// when winners match, `false` when they differ, `None` when the real
    /// game has no winner yet.
    pub fn correct(&mut self, real: &Bracket) {
        let n = self.games.len().min(real.games.len());
        for i in 0..n {
            self.games[i].accurate = match &real.games[i].winner {
                None => None,
                Some(real_winner) => Some(
                    self.games[i]
                        .winner
                        .as_ref()
                        .map_or(false, |w| **w == **real_winner),
                ),
            };
        }
    }

    /// Correct against `real` and total the points for accurate picks.
    ///
    /// The total is returned and cached on the bracket. Points come from the
    /// pointsmap, per game, keyed by the round the game sits in.
    pub fn score(&mut self, real: &Bracket, pointsmap: Option<PointsOverride>) -> Result<u32> {
        if let Some(ovr) = pointsmap {
            self.pointsmap = match ovr {
                PointsOverride::PerRound(values) => self
                    .index
                    .rounds()
                    .iter()
                    .cloned()
                    .zip(values)
                    .collect(),
                PointsOverride::ByLabel(map) => {
                    for label in map.keys() {
                        if !self.index.rounds().contains(label) {
                            return Err(BracketError::UnknownRound(label.clone()));
                        }
                    }
                    map
                }
            };
        }

        self.correct(real);

        let mut total = 0;
        for game in &self.games {
            if game.accurate == Some(true) {
                let label = &self.index.rounds()[depth_of(game.index())];
                total += self.pointsmap.get(label).copied().unwrap_or(0);
            }
        }
        self.points = Some(total);
        Ok(total)
    }

    /// Fraction of games in round `round` (0 = championship) whose winner
    /// matches the real bracket. Undecided games on either side count as
    /// misses; the denominator is the full round.
    pub fn correct_in_round(&self, real: &Bracket, round: usize) -> Result<f64> {
        if round >= self.index.rounds().len() {
            return Err(BracketError::DepthOutOfRange {
                depth: round,
                len: self.index.rounds().len(),
            });
        }

        let start = (1usize << round) - 1;
        let end = (1usize << (round + 1)) - 1;
        let matched = (start..end)
            .filter(|&i| match (&self.games[i].winner, &real.games[i].winner) {
                (Some(mine), Some(theirs)) => **mine == **theirs,
                _ => false,
            })
            .count();

        Ok(matched as f64 / (end - start) as f64)
    }
}
