use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::bracket::Bracket;
use crate::error::{BracketError, Result};
use crate::game::GameNode;
use crate::index::parent_index;
use crate::squad::SquadRef;

/// What a decision function may hand back for a game.
///
/// Each variant normalizes to a (winner, loser) pair; anything a decider
/// could produce must be expressed as one of these shapes.
#[derive(Clone, Debug)]
pub enum Decision {
    /// A decided game payload. Winner and loser must both be set; scores are
    /// carried over when present.
    Game(GameNode),
    /// Winner and loser, in that order.
    Pair(SquadRef, SquadRef),
    /// The winning squad; the loser is inferred as the other opponent.
    Winner(SquadRef),
    /// Index of the winner within the game's opponents (0 or 1).
    Index(usize),
    /// Numeric sequence whose first element is the winner's opponent index.
    /// The shape estimator predictions usually arrive in.
    Sequence(Vec<f64>),
}

impl Bracket {
    /// Play the bracket to completion, leaves first.
    ///
    /// Every game must already hold exactly two opponents when visited; each
    /// winner is appended to its parent's opponents exactly once. Running
    /// this on an already-decided bracket fails with the opponents-count
    /// error, since parents would receive duplicate entries — reset with
    /// [`empty_bracket`](Bracket::empty_bracket) first. A failed run leaves
    /// the bracket partially decided; discard it.
    pub fn simulate<F>(&mut self, mut decide: F) -> Result<()>
    where
        F: FnMut(&GameNode) -> Result<Decision>,
    {
        for i in (0..self.games.len()).rev() {
            self.games[i].require_opponents()?;

            let decision = decide(&self.games[i])?;
            let (winner, loser, scores) = resolve(&self.games[i], decision)?;

            let game = &mut self.games[i];
            game.winner = Some(winner.clone());
            game.loser = Some(loser);
            if let Some((winner_score, loser_score)) = scores {
                game.winner_score = winner_score;
                game.loser_score = loser_score;
            }

            if let Some(p) = parent_index(i) {
                if self.games[p].opponents.len() >= 2 {
                    return Err(BracketError::OpponentsFull { index: p });
                }
                self.games[p].opponents.push(winner);
            }
        }
        Ok(())
    }
}

type Resolved = (SquadRef, SquadRef, Option<(Option<u32>, Option<u32>)>);

fn resolve(game: &GameNode, decision: Decision) -> Result<Resolved> {
    match decision {
        Decision::Game(decided) => match (decided.winner, decided.loser) {
            (Some(winner), Some(loser)) => Ok((
                winner,
                loser,
                Some((decided.winner_score, decided.loser_score)),
            )),
            _ => Err(BracketError::UndecidedResult {
                index: game.index(),
            }),
        },
        Decision::Pair(winner, loser) => Ok((winner, loser, None)),
        Decision::Winner(winner) => {
            let pos = game
                .opponents
                .iter()
                .position(|s| **s == *winner)
                .ok_or(BracketError::UnknownOpponent {
                    index: game.index(),
                })?;
            Ok((winner, game.opponents[(pos + 1) % 2].clone(), None))
        }
        Decision::Index(pick) => pick_opponent(game, pick),
        Decision::Sequence(values) => {
            let head = values.first().ok_or(BracketError::EmptyDecision {
                index: game.index(),
            })?;
            pick_opponent(game, *head as usize)
        }
    }
}

fn pick_opponent(game: &GameNode, pick: usize) -> Result<Resolved> {
    if pick >= 2 {
        return Err(BracketError::PickOutOfRange {
            index: game.index(),
            pick,
        });
    }
    Ok((
        game.opponents[pick].clone(),
        game.opponents[pick ^ 1].clone(),
        None,
    ))
}

/// Run `n_simulations` independent Monte Carlo brackets against `real` and
/// return their scores.
///
/// Each run gets its own seed fanned out from the master seed and its own
/// clone of the real bracket's first round, so workers share nothing mutable
/// and results are reproducible for a given `seed`.
pub fn run_simulations<F>(
    real: &Bracket,
    n_simulations: usize,
    seed: Option<u64>,
    decide: F,
) -> Result<Vec<u32>>
where
    F: Fn(&mut ChaCha8Rng, &GameNode) -> Result<Decision> + Sync,
{
    let mut master = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    let seeds: Vec<u64> = (0..n_simulations).map(|_| master.gen()).collect();

    debug!(
        "running {} simulations against '{}'",
        n_simulations,
        real.season()
    );

    seeds
        .into_par_iter()
        .map(|s| {
            let mut rng = ChaCha8Rng::seed_from_u64(s);
            let mut sim = real.empty_bracket_with_rng(&mut rng);
            sim.simulate(|game| decide(&mut rng, game))?;
            sim.score(real, None)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::squad::Squad;

    // 7-game bracket with all eight first-round squads in place.
    fn seeded_bracket() -> Bracket {
        let mut bracket = Bracket::with_layout(
            "test",
            vec!["finals".into(), "semis".into(), "1st".into()],
            crate::constants::DEFAULT_REGIONS.map(String::from).to_vec(),
            "/",
        );
        for (slot, game) in (3..7).zip(0u64..) {
            let a = Squad::new(game * 2 + 1, format!("team{}", game * 2 + 1), 1);
            let b = Squad::new(game * 2 + 2, format!("team{}", game * 2 + 2), 16);
            let node = bracket.game_mut(slot).unwrap();
            node.opponents.push(a);
            node.opponents.push(b);
        }
        bracket
    }

    #[test]
    fn test_simulate_decides_every_game() {
        let mut bracket = seeded_bracket();
        bracket.simulate(|_| Ok(Decision::Index(0))).unwrap();

        for game in bracket.iter() {
            assert!(game.is_decided(), "game {} undecided", game.index());
        }
        assert_eq!(bracket.game(0).unwrap().opponents.len(), 2);
        // Reverse-index order means each parent hears from its right child
        // first, so opponents[0] of the root comes from the highest-index
        // subtree.
        assert_eq!(bracket.game(0).unwrap().winner.as_ref().unwrap().id, 7);
    }

    #[test]
    fn test_simulate_requires_two_opponents() {
        let mut bracket = seeded_bracket();
        bracket.game_mut(5).unwrap().opponents.pop();

        let err = bracket.simulate(|_| Ok(Decision::Index(0))).unwrap_err();
        assert!(matches!(
            err,
            BracketError::IncompleteGame { index: 5, count: 1 }
        ));
    }

    #[test]
    fn test_resimulating_decided_bracket_fails() {
        let mut bracket = seeded_bracket();
        bracket.simulate(|_| Ok(Decision::Index(0))).unwrap();

        let err = bracket.simulate(|_| Ok(Decision::Index(0))).unwrap_err();
        assert!(matches!(err, BracketError::OpponentsFull { .. }));
    }

    #[test]
    fn test_winner_variant_infers_loser() {
        let mut bracket = seeded_bracket();
        bracket
            .simulate(|game| Ok(Decision::Winner(game.opponents[1].clone())))
            .unwrap();

        let leaf = bracket.game(3).unwrap();
        assert_eq!(leaf.winner.as_ref().unwrap().id, 2);
        assert_eq!(leaf.loser.as_ref().unwrap().id, 1);
    }

    #[test]
    fn test_winner_variant_rejects_stranger() {
        let mut bracket = seeded_bracket();
        let err = bracket
            .simulate(|_| Ok(Decision::Winner(Squad::new(999, "ringer", 1))))
            .unwrap_err();
        assert!(matches!(err, BracketError::UnknownOpponent { index: 6 }));
    }

    #[test]
    fn test_sequence_variant_uses_head() {
        let mut bracket = seeded_bracket();
        bracket
            .simulate(|_| Ok(Decision::Sequence(vec![1.0, 0.3])))
            .unwrap();
        assert_eq!(bracket.game(3).unwrap().winner.as_ref().unwrap().seed, 16);

        let mut empty_seq = seeded_bracket();
        let err = empty_seq
            .simulate(|_| Ok(Decision::Sequence(Vec::new())))
            .unwrap_err();
        assert!(matches!(err, BracketError::EmptyDecision { .. }));
    }

    #[test]
    fn test_game_variant_carries_scores() {
        let mut bracket = seeded_bracket();
        bracket
            .simulate(|game| {
                let mut decided = game.clone();
                decided.winner = Some(game.opponents[0].clone());
                decided.loser = Some(game.opponents[1].clone());
                decided.winner_score = Some(78);
                decided.loser_score = Some(64);
                Ok(Decision::Game(decided))
            })
            .unwrap();

        let root = bracket.game(0).unwrap();
        assert_eq!(root.winner_score, Some(78));
        assert_eq!(root.loser_score, Some(64));
    }

    #[test]
    fn test_game_variant_requires_both_sides() {
        let mut bracket = seeded_bracket();
        let err = bracket
            .simulate(|game| {
                let mut decided = game.clone();
                decided.winner = Some(game.opponents[0].clone());
                Ok(Decision::Game(decided))
            })
            .unwrap_err();
        assert!(matches!(err, BracketError::UndecidedResult { index: 6 }));
    }

    #[test]
    fn test_pick_out_of_range() {
        let mut bracket = seeded_bracket();
        let err = bracket.simulate(|_| Ok(Decision::Index(2))).unwrap_err();
        assert!(matches!(
            err,
            BracketError::PickOutOfRange { index: 6, pick: 2 }
        ));
    }

    #[test]
    fn test_decider_errors_propagate() {
        let mut bracket = seeded_bracket();
        let err = bracket
            .simulate(|_| Err(BracketError::Decider("model offline".into())))
            .unwrap_err();
        assert!(matches!(err, BracketError::Decider(_)));
    }

    #[test]
    fn test_run_simulations_reproducible() {
        let mut real = seeded_bracket();
        real.simulate(|_| Ok(Decision::Index(0))).unwrap();

        let flip = |rng: &mut ChaCha8Rng, game: &GameNode| {
            crate::deciders::coin_flip(rng, game)
        };
        let a = run_simulations(&real, 16, Some(42), flip).unwrap();
        let b = run_simulations(&real, 16, Some(42), flip).unwrap();
        assert_eq!(a.len(), 16);
        assert_eq!(a, b);
    }
}
