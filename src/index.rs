use serde::{Deserialize, Serialize};

use crate::error::{BracketError, Result};

/// Human-facing address of a game slot.
///
/// `region` and `slot` become meaningless near the top of the bracket: the
/// championship carries neither, and the row below it (where regions merge
/// in pairs) carries a combined region label with no slot number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coordinate {
    pub round: String,
    pub region: Option<String>,
    pub slot: Option<usize>,
}

/// Depth of index `n` in the heap, with the championship at depth 0.
pub(crate) fn depth_of(n: usize) -> usize {
    (usize::BITS - 1 - (n + 1).leading_zeros()) as usize
}

/// Parent of heap index `n`, or `None` for the championship game.
pub fn parent_index(n: usize) -> Option<usize> {
    if n == 0 {
        None
    } else {
        Some(((n + 1) >> 1) - 1)
    }
}

/// Children of heap index `n`: the two games that feed it.
pub fn child_indices(n: usize) -> (usize, usize) {
    (2 * n + 1, 2 * n + 2)
}

/// Bidirectional mapping between flat heap indices and coordinates.
///
/// Tournaments are not symmetric at the top: regions merge into the Final
/// Four row and then into the championship, so the plain
/// `region * gsize + slot` formula fails on the top two rows. Those
/// irregular rows are handled here so the rest of the engine can work with
/// plain integers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BracketIndex {
    rounds: Vec<String>,
    regions: Vec<String>,
    delim: String,
}

impl BracketIndex {
    pub fn new(rounds: Vec<String>, regions: Vec<String>, delim: impl Into<String>) -> Self {
        BracketIndex {
            rounds,
            regions,
            delim: delim.into(),
        }
    }

    pub fn rounds(&self) -> &[String] {
        &self.rounds
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn delim(&self) -> &str {
        &self.delim
    }

    /// Total number of games in a bracket with this layout.
    pub fn num_games(&self) -> usize {
        (1 << self.rounds.len()) - 1
    }

    /// Heap index of the first game in the opening round.
    pub fn first_round_start(&self) -> usize {
        (1 << (self.rounds.len() - 1)) - 1
    }

    /// Resolve heap index `n` to its coordinate.
    pub fn lookup(&self, n: usize) -> Result<Coordinate> {
        if n >= self.num_games() {
            return Err(BracketError::IndexOutOfRange {
                index: n,
                len: self.num_games(),
            });
        }

        let m = n + 1;
        let depth = depth_of(n);
        let k = m - (1 << depth);
        let gsize = (1 << depth) / self.regions.len();

        if gsize == 0 {
            // Fewer slots than regions in this row.
            if depth == 0 {
                return Ok(Coordinate {
                    round: self.rounds[0].clone(),
                    region: None,
                    slot: None,
                });
            }
            // Merge row: slot 0 covers the first two regions, slot 1 the last two.
            let half = if m <= 2 {
                &self.regions[..2]
            } else {
                &self.regions[self.regions.len() - 2..]
            };
            return Ok(Coordinate {
                round: self.rounds[depth].clone(),
                region: Some(half.join(&self.delim)),
                slot: None,
            });
        }

        Ok(Coordinate {
            round: self.rounds[depth].clone(),
            region: Some(self.regions[k / gsize].clone()),
            slot: Some(k % gsize),
        })
    }

    /// Heap index for a labeled coordinate. `region = None` means region 0,
    /// and a combined label ("East/West") resolves by its first component.
    pub fn index(&self, round: &str, region: Option<&str>, slot: usize) -> Result<usize> {
        let depth = self
            .rounds
            .iter()
            .position(|r| r == round)
            .ok_or_else(|| BracketError::UnknownRound(round.to_string()))?;
        let region_pos = match region {
            Some(label) => self.resolve_region(label)?,
            None => 0,
        };
        self.index_raw(depth, region_pos, slot)
    }

    /// Heap index for positional coordinates (round depth, region position,
    /// slot within the region).
    pub fn index_raw(&self, depth: usize, region: usize, slot: usize) -> Result<usize> {
        if depth >= self.rounds.len() {
            return Err(BracketError::DepthOutOfRange {
                depth,
                len: self.rounds.len(),
            });
        }

        let rowinit = (1 << depth) - 1;
        let gsize = (1 << depth) / self.regions.len();

        if gsize == 0 {
            if depth == 0 {
                return Ok(0);
            }
            // Merge row: two regions share each slot.
            return Ok(region / 2 + 1);
        }

        Ok(rowinit + region * gsize + slot)
    }

    /// Exact left inverse of [`lookup`](Self::lookup).
    pub fn index_of(&self, coord: &Coordinate) -> Result<usize> {
        self.index(&coord.round, coord.region.as_deref(), coord.slot.unwrap_or(0))
    }

    fn resolve_region(&self, label: &str) -> Result<usize> {
        let base = match label.split_once(self.delim.as_str()) {
            Some((first, _)) => first,
            None => label,
        };
        self.regions
            .iter()
            .position(|r| r == base)
            .ok_or_else(|| BracketError::UnknownRegion(label.to_string()))
    }
}
