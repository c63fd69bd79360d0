use crate::error::BattleError;
use crate::model::Creature;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;

/// What a selector gets to see when it is asked for a move.
#[derive(Clone, Copy, Debug)]
pub struct TurnContext<'a> {
    pub turn: u32,
    pub attacker: &'a Creature,
    pub defender: &'a Creature,
    /// Multiplier the defender takes from the attacker's type.
    pub multiplier: f64,
    /// Occupied slot numbers of the attacker, never empty.
    pub available: &'a [usize],
}

pub trait MoveSelector {
    /// Pick a slot number. Choices outside `ctx.available` are rejected by
    /// the battle and asked for again.
    fn select_move(&mut self, ctx: &TurnContext<'_>) -> Result<usize, BattleError>;
}

/// Uniform random choice among the available slots.
pub struct RandomSelector {
    rng: SmallRng,
}

impl RandomSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl MoveSelector for RandomSelector {
    fn select_move(&mut self, ctx: &TurnContext<'_>) -> Result<usize, BattleError> {
        Ok(*ctx.available.choose(&mut self.rng).unwrap_or(&1))
    }
}

/// Replays a fixed list of slot choices, then keeps picking the first
/// available slot.
#[derive(Debug, Default)]
pub struct ScriptedSelector {
    choices: VecDeque<usize>,
}

impl ScriptedSelector {
    pub fn new(choices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.choices.len()
    }
}

impl MoveSelector for ScriptedSelector {
    fn select_move(&mut self, ctx: &TurnContext<'_>) -> Result<usize, BattleError> {
        match self.choices.pop_front() {
            Some(slot) => Ok(slot),
            None => Ok(ctx.available.first().copied().unwrap_or(1)),
        }
    }
}
