use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Shared handle to a squad. Brackets clone handles freely and never mutate
/// the squad behind them.
pub type SquadRef = Arc<Squad>;

/// A team's tournament entry: identity, display name, and seed.
///
/// Equality and hashing go by `id` alone, so two handles compare equal
/// whenever they refer to the same squad regardless of how the display
/// fields were loaded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Squad {
    pub id: u64,
    pub name: String,
    pub seed: u32,
}

impl Squad {
    pub fn new(id: u64, name: impl Into<String>, seed: u32) -> SquadRef {
        Arc::new(Squad {
            id,
            name: name.into(),
            seed,
        })
    }
}

impl PartialEq for Squad {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Squad {}

impl Hash for Squad {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
