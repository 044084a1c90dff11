/// Round labels ordered from the championship (index 0) down to the first round.
pub const DEFAULT_ROUNDS: [&str; 6] = ["finals", "finalfour", "elite8", "sweet16", "2nd", "1st"];

/// Default region labels for a four-region tournament.
pub const DEFAULT_REGIONS: [&str; 4] = ["North", "East", "South", "West"];

/// Separator used when two region labels collapse into one Final Four slot.
pub const DEFAULT_DELIM: &str = "/";

/// ESPN-style points per correct game in each round, championship first.
pub const ROUND_POINTS: [u32; 6] = [320, 160, 80, 40, 20, 10];
