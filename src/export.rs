use std::str::FromStr;

use log::debug;
use serde::Serialize;

use crate::bracket::Bracket;
use crate::error::{BracketError, Result};
use crate::squad::SquadRef;

/// The two supported serialization shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Flat copy of the heap, winners per game, plus synthetic opponent
    /// nodes for the first round.
    Heap,
    /// Tree rooted at the champion, expanding down to first-round opponents.
    Nested,
}

impl FromStr for ExportFormat {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "heap" => Ok(ExportFormat::Heap),
            "nested" => Ok(ExportFormat::Nested),
            other => Err(BracketError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    regions: &'a [String],
    rounds: &'a [String],
    season: &'a str,
    nodes: T,
}

#[derive(Serialize)]
struct ExportNode {
    id: usize,
    name: String,
    data: NodeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<ExportNode>>,
}

#[derive(Serialize)]
struct NodeData {
    sid: u64,
    seed: u32,
    points: Option<u32>,
}

fn make_node(
    id: usize,
    squad: &SquadRef,
    points: Option<u32>,
    children: Option<Vec<ExportNode>>,
) -> ExportNode {
    ExportNode {
        id,
        name: squad.name.clone(),
        data: NodeData {
            sid: squad.id,
            seed: squad.seed,
            points,
        },
        children,
    }
}

impl Bracket {
    /// Serialize the bracket to JSON in the requested format.
    ///
    /// Both formats need a winner on every game they touch; an undecided
    /// game surfaces the missing-winner error before any output is built.
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        debug!("exporting '{}' as {:?}", self.season, format);
        match format {
            ExportFormat::Heap => {
                let nodes = self.heap_nodes()?;
                Ok(serde_json::to_string(&self.envelope(nodes))?)
            }
            ExportFormat::Nested => {
                let root = self.nested_tree(0, None)?;
                Ok(serde_json::to_string(&self.envelope(root))?)
            }
        }
    }

    fn envelope<T: Serialize>(&self, nodes: T) -> Envelope<'_, T> {
        Envelope {
            regions: self.index.regions(),
            rounds: self.index.rounds(),
            season: &self.season,
            nodes,
        }
    }

    fn winner_of(&self, n: usize) -> Result<&SquadRef> {
        self.games[n]
            .winner
            .as_ref()
            .ok_or(BracketError::MissingWinner { index: n })
    }

    /// Opponents of game `n` ordered by seed, highest seed number first.
    fn ordered_opponents(&self, n: usize) -> Result<(&SquadRef, &SquadRef)> {
        let (a, b) = self.games[n].require_opponents()?;
        if a.seed >= b.seed {
            Ok((a, b))
        } else {
            Ok((b, a))
        }
    }

    fn heap_nodes(&self) -> Result<Vec<ExportNode>> {
        let first_round = self.index.first_round_start();
        let mut nodes = Vec::with_capacity(self.games.len() + 2 * (self.games.len() - first_round));

        for (i, game) in self.games.iter().enumerate() {
            let winner = self.winner_of(i)?;
            nodes.push(make_node(i, winner, game.winner_score, None));
        }

        // First-round opponents get synthetic leaf ids 2i+1 and 2i+2 so the
        // full field is present even though they are not heap-addressed.
        for i in first_round..self.games.len() {
            let game = &self.games[i];
            let winner = self.winner_of(i)?;
            let (high, low) = self.ordered_opponents(i)?;
            for (offset, squad) in [high, low].into_iter().enumerate() {
                let points = if **squad == **winner {
                    game.winner_score
                } else {
                    game.loser_score
                };
                nodes.push(make_node(2 * i + 1 + offset, squad, points, None));
            }
        }

        Ok(nodes)
    }

    fn nested_tree(&self, n: usize, prev: Option<usize>) -> Result<ExportNode> {
        let (squad, children) = if n >= self.games.len() {
            // Synthetic leaf: pick from the seed-descending opponent pair
            // by parity of the leaf index; the even leaf takes the higher
            // seed number.
            let parent = prev.ok_or(BracketError::IndexOutOfRange {
                index: n,
                len: self.games.len(),
            })?;
            let (high, low) = self.ordered_opponents(parent)?;
            let squad = if n % 2 == 0 { high } else { low };
            (squad, Vec::new())
        } else {
            let squad = self.winner_of(n)?;
            let children = vec![
                self.nested_tree(2 * n + 1, Some(n))?,
                self.nested_tree(2 * n + 2, Some(n))?,
            ];
            (squad, children)
        };

        let points = match prev {
            Some(p) => {
                let game = &self.games[p];
                if game.winner.as_deref() == Some(squad.as_ref()) {
                    game.winner_score
                } else if game.loser.as_deref() == Some(squad.as_ref()) {
                    game.loser_score
                } else {
                    None
                }
            }
            None => None,
        };

        Ok(make_node(n, squad, points, Some(children)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::Decision;
    use crate::squad::Squad;
    use serde_json::Value;

    // 7-game bracket, seeds 1 vs 16 in each first-round game, scores on
    // every decided game.
    fn played_bracket() -> Bracket {
        let mut bracket = Bracket::with_layout(
            "2012",
            vec!["finals".into(), "semis".into(), "1st".into()],
            crate::constants::DEFAULT_REGIONS.map(String::from).to_vec(),
            "/",
        );
        for slot in 3..7 {
            let base = (slot as u64 - 3) * 2;
            let node = bracket.game_mut(slot).unwrap();
            node.opponents.push(Squad::new(base + 1, format!("s{}", base + 1), 1));
            node.opponents.push(Squad::new(base + 2, format!("s{}", base + 2), 16));
        }
        bracket
            .simulate(|game| {
                let mut decided = game.clone();
                decided.winner = Some(game.opponents[0].clone());
                decided.loser = Some(game.opponents[1].clone());
                decided.winner_score = Some(70 + game.index() as u32);
                decided.loser_score = Some(60);
                Ok(Decision::Game(decided))
            })
            .unwrap();
        bracket
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("heap".parse::<ExportFormat>().unwrap(), ExportFormat::Heap);
        assert_eq!(
            "NESTED".parse::<ExportFormat>().unwrap(),
            ExportFormat::Nested
        );
        assert!(matches!(
            "csv".parse::<ExportFormat>(),
            Err(BracketError::UnknownFormat(f)) if f == "csv"
        ));
    }

    #[test]
    fn test_heap_export_shape() {
        let bracket = played_bracket();
        let out: Value = serde_json::from_str(&bracket.export(ExportFormat::Heap).unwrap()).unwrap();

        assert_eq!(out["season"], "2012");
        assert_eq!(out["rounds"].as_array().unwrap().len(), 3);
        assert_eq!(out["regions"].as_array().unwrap().len(), 4);

        // 7 winner nodes plus 2 synthetic opponents per first-round game.
        let nodes = out["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 7 + 2 * 4);

        // Heap nodes carry no children key.
        assert!(nodes[0].get("children").is_none());

        // Synthetic ids for game 3 are 7 and 8, seed 16 entry first.
        let leaf = nodes.iter().find(|n| n["id"] == 7).unwrap();
        assert_eq!(leaf["data"]["seed"], 16);
        assert_eq!(leaf["data"]["points"], 60);
        let leaf = nodes.iter().find(|n| n["id"] == 8).unwrap();
        assert_eq!(leaf["data"]["seed"], 1);
        assert_eq!(leaf["data"]["points"], 73);
    }

    #[test]
    fn test_heap_export_deterministic() {
        let a = played_bracket().export(ExportFormat::Heap).unwrap();
        let b = played_bracket().export(ExportFormat::Heap).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nested_export_shape() {
        let bracket = played_bracket();
        let out: Value =
            serde_json::from_str(&bracket.export(ExportFormat::Nested).unwrap()).unwrap();

        let root = &out["nodes"];
        assert_eq!(root["id"], 0);
        // Champion is the winner of the root game.
        let champion = bracket.game(0).unwrap().winner.as_ref().unwrap();
        assert_eq!(root["name"], champion.name.as_str());
        assert_eq!(root["data"]["points"], Value::Null);

        // Every non-leaf node has exactly two children; leaves have zero.
        fn check(node: &Value) -> usize {
            let children = node["children"].as_array().unwrap();
            assert!(children.len() == 2 || children.is_empty());
            1 + children.iter().map(check).sum::<usize>()
        }
        // 7 games + 8 leaves.
        assert_eq!(check(root), 15);
    }

    #[test]
    fn test_nested_points_come_from_parent_game() {
        let bracket = played_bracket();
        let out: Value =
            serde_json::from_str(&bracket.export(ExportFormat::Nested).unwrap()).unwrap();

        // Root's children are the finalists; the winner's entry carries the
        // final's winning score.
        let finalists = out["nodes"]["children"].as_array().unwrap();
        let champion = bracket.game(0).unwrap().winner.as_ref().unwrap();
        let champ_node = finalists
            .iter()
            .find(|n| n["name"] == champion.name.as_str())
            .unwrap();
        assert_eq!(champ_node["data"]["points"], 70);
    }

    #[test]
    fn test_export_requires_winners() {
        let bracket = played_bracket().empty_bracket("fresh");
        assert!(matches!(
            bracket.export(ExportFormat::Heap),
            Err(BracketError::MissingWinner { index: 0 })
        ));
        assert!(matches!(
            bracket.export(ExportFormat::Nested),
            Err(BracketError::MissingWinner { index: 0 })
        ));
    }
}
