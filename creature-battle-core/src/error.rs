use crate::types::ElementType;
use thiserror::Error;

/// Precondition violations raised while building creatures and their parts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CreatureError {
    #[error("hit point {0} is not greater than 0")]
    NonPositiveHitPoints(i32),

    #[error("creature should at least have 1 move")]
    EmptyMoveSet,

    #[error("move slot {0} does not exist (slots are 1 to 4)")]
    SlotOutOfRange(usize),

    #[error("a move set holds at most 4 moves, got {0}")]
    TooManyMoves(usize),

    #[error("creature type '{0}' does not exist")]
    UnknownType(String),

    #[error("expected {expected} damage multipliers, got {actual}")]
    MultiplierCount { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum BattleError {
    #[error("{defender} has no damage multiplier for {attacker_type} attacks")]
    MissingMultiplier {
        defender: String,
        attacker_type: ElementType,
    },

    #[error("creature '{0}' is not registered")]
    UnknownCreature(String),

    #[error("'{0}' cannot fight itself")]
    SameCreature(String),

    #[error("battle did not finish within {0} turns")]
    TurnLimitExceeded(u32),

    #[error("battle is already over")]
    Finished,

    #[error("move selection failed: {0}")]
    Input(#[from] std::io::Error),

    #[error(transparent)]
    Creature(#[from] CreatureError),
}
