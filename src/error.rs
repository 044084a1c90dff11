use thiserror::Error;

pub type Result<T> = std::result::Result<T, BracketError>;

/// Errors raised by the bracket engine.
///
/// None of these are retried internally; a failed simulation leaves the
/// bracket partially decided and callers should discard it.
#[derive(Debug, Error)]
pub enum BracketError {
    #[error("game {index} has {count} opponents, expected 2")]
    IncompleteGame { index: usize, count: usize },

    #[error("game {index} already has two opponents")]
    OpponentsFull { index: usize },

    #[error("decision for game {index} did not carry both winner and loser")]
    UndecidedResult { index: usize },

    #[error("decided winner is not an opponent in game {index}")]
    UnknownOpponent { index: usize },

    #[error("opponent pick {pick} out of range in game {index}")]
    PickOutOfRange { index: usize, pick: usize },

    #[error("empty decision sequence for game {index}")]
    EmptyDecision { index: usize },

    #[error("unknown round label '{0}'")]
    UnknownRound(String),

    #[error("unknown region label '{0}'")]
    UnknownRegion(String),

    #[error("game index {index} out of range for {len} games")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("round depth {depth} out of range for {len} rounds")]
    DepthOutOfRange { depth: usize, len: usize },

    #[error("export format '{0}' is not implemented")]
    UnknownFormat(String),

    #[error("no winner recorded for game {index}")]
    MissingWinner { index: usize },

    #[error("bracket has {found} games, expected {expected}")]
    ShapeMismatch { found: usize, expected: usize },

    #[error("game at position {position} carries index {index}")]
    MisplacedGame { position: usize, index: usize },

    #[error("decider failed: {0}")]
    Decider(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
