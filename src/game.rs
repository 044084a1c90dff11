use serde::{Deserialize, Serialize};

use crate::error::{BracketError, Result};
use crate::index::parent_index;
use crate::squad::SquadRef;

/// A single slot in the bracket heap.
///
/// A first-round game starts with both opponents filled in; every other game
/// starts empty and receives its opponents as the games below it resolve.
/// `accurate` is only set by correction against a real bracket: `Some(true)`
/// or `Some(false)` once the real game has a winner, `None` while it does
/// not.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameNode {
    index: usize,
    pub opponents: Vec<SquadRef>,
    pub winner: Option<SquadRef>,
    pub loser: Option<SquadRef>,
    pub winner_score: Option<u32>,
    pub loser_score: Option<u32>,
    pub accurate: Option<bool>,
}

impl GameNode {
    pub fn new(index: usize) -> Self {
        GameNode {
            index,
            opponents: Vec::new(),
            winner: None,
            loser: None,
            winner_score: None,
            loser_score: None,
            accurate: None,
        }
    }

    /// Position in the heap array. Fixed at construction.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Heap index of the game this one's winner advances to.
    pub fn parent_index(&self) -> Option<usize> {
        parent_index(self.index)
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some() && self.loser.is_some()
    }

    /// Both opponents, or the incomplete-game error naming this slot.
    pub fn require_opponents(&self) -> Result<(&SquadRef, &SquadRef)> {
        match self.opponents.as_slice() {
            [a, b] => Ok((a, b)),
            other => Err(BracketError::IncompleteGame {
                index: self.index,
                count: other.len(),
            }),
        }
    }
}
