use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DELIM, DEFAULT_REGIONS, DEFAULT_ROUNDS, ROUND_POINTS};
use crate::error::{BracketError, Result};
use crate::game::GameNode;
use crate::index::BracketIndex;

/// A single-elimination tournament stored as a binary heap of games.
///
/// Index 0 is the championship; the children of game `i` sit at `2i+1` and
/// `2i+2` and must be decided before `i` can be. The arena holds plain
/// values only, so a bracket is cheap to clone for parallel simulation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bracket {
    pub(crate) season: String,
    pub(crate) index: BracketIndex,
    pub(crate) games: Vec<GameNode>,

    /// Points per round label. Transient: rebuilt by `validate_or_build`.
    #[serde(skip)]
    pub(crate) pointsmap: HashMap<String, u32>,

    /// Total from the most recent scoring pass. Transient.
    #[serde(skip)]
    pub(crate) points: Option<u32>,
}

impl Bracket {
    /// Standard 6-round, 4-region, 64-team layout.
    pub fn new(season: impl Into<String>) -> Self {
        Bracket::with_layout(
            season,
            DEFAULT_ROUNDS.map(String::from).to_vec(),
            DEFAULT_REGIONS.map(String::from).to_vec(),
            DEFAULT_DELIM,
        )
    }

    /// Bracket with explicit round and region labels, championship-first.
    pub fn with_layout(
        season: impl Into<String>,
        rounds: Vec<String>,
        regions: Vec<String>,
        delim: impl Into<String>,
    ) -> Self {
        let mut bracket = Bracket {
            season: season.into(),
            index: BracketIndex::new(rounds, regions, delim),
            games: Vec::new(),
            pointsmap: HashMap::new(),
            points: None,
        };
        bracket.build_defaults();
        bracket
    }

    /// Fill in whatever construction or deserialization left out, then check
    /// the arena shape. Call once after loading a serialized bracket; the
    /// transient pointsmap is rebuilt here.
    pub fn validate_or_build(&mut self) -> Result<()> {
        self.build_defaults();

        let expected = self.index.num_games();
        if self.games.len() != expected {
            return Err(BracketError::ShapeMismatch {
                found: self.games.len(),
                expected,
            });
        }
        for (position, game) in self.games.iter().enumerate() {
            if game.index() != position {
                return Err(BracketError::MisplacedGame {
                    position,
                    index: game.index(),
                });
            }
        }
        Ok(())
    }

    fn build_defaults(&mut self) {
        if self.games.is_empty() {
            self.games = (0..self.index.num_games()).map(GameNode::new).collect();
        }
        if self.pointsmap.is_empty() {
            self.pointsmap = self
                .index
                .rounds()
                .iter()
                .cloned()
                .zip(ROUND_POINTS)
                .collect();
        }
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    pub fn index(&self) -> &BracketIndex {
        &self.index
    }

    pub fn rounds(&self) -> &[String] {
        self.index.rounds()
    }

    pub fn regions(&self) -> &[String] {
        self.index.regions()
    }

    pub fn pointsmap(&self) -> &HashMap<String, u32> {
        &self.pointsmap
    }

    /// Total from the most recent scoring pass, if any.
    pub fn points(&self) -> Option<u32> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn games(&self) -> &[GameNode] {
        &self.games
    }

    pub fn game(&self, n: usize) -> Option<&GameNode> {
        self.games.get(n)
    }

    pub fn game_mut(&mut self, n: usize) -> Option<&mut GameNode> {
        self.games.get_mut(n)
    }

    /// Game at a labeled coordinate.
    pub fn get(&self, round: &str, region: Option<&str>, slot: usize) -> Result<&GameNode> {
        let n = self.index.index(round, region, slot)?;
        self.games.get(n).ok_or(BracketError::IndexOutOfRange {
            index: n,
            len: self.games.len(),
        })
    }

    pub fn get_mut(
        &mut self,
        round: &str,
        region: Option<&str>,
        slot: usize,
    ) -> Result<&mut GameNode> {
        let n = self.index.index(round, region, slot)?;
        let len = self.games.len();
        self.games
            .get_mut(n)
            .ok_or(BracketError::IndexOutOfRange { index: n, len })
    }

    /// Games in array order, championship first.
    pub fn iter(&self) -> std::slice::Iter<'_, GameNode> {
        self.games.iter()
    }

    /// Games from the highest index down, so every game is visited after
    /// both of its children. Simulation must use this order.
    pub fn iter_rev(&self) -> impl Iterator<Item = &GameNode> {
        self.games.iter().rev()
    }

    /// Fresh, unplayed bracket with the same layout, seeded with this
    /// bracket's first-round matchups and nothing else.
    pub fn empty_bracket(&self, name: impl Into<String>) -> Bracket {
        let mut fresh = Bracket::with_layout(
            name,
            self.index.rounds().to_vec(),
            self.index.regions().to_vec(),
            self.index.delim(),
        );
        for i in self.index.first_round_start()..self.games.len() {
            fresh.games[i].opponents = self.games[i].opponents.clone();
        }
        fresh
    }

    /// Like [`empty_bracket`](Self::empty_bracket), with a discriminator
    /// drawn from the caller's RNG instead of an explicit name.
    pub fn empty_bracket_with_rng<R: Rng>(&self, rng: &mut R) -> Bracket {
        let name = format!("{}-empty-{}", self.season, rng.gen_range(0..1_000_000));
        self.empty_bracket(name)
    }
}
