//! Core of the creature battle simulator: data model, registry, turn
//! resolution and the CSV loader.
//!
//! The main entry points are [`registry::Registry`] for keeping creatures
//! around and [`battle::Battle`] for resolving a fight between two of them.

pub mod ai;
pub mod battle;
pub mod battle_logger;
pub mod error;
pub mod loader;
pub mod model;
pub mod registry;
pub mod types;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::ai::{MoveSelector, RandomSelector, ScriptedSelector};
    pub use crate::battle::{
        compute_damage, resolve_battle, Battle, BattleOptions, BattleOutcome, Side, TurnReport,
        GLOBAL_DAMAGE_REDUCTION,
    };
    pub use crate::battle_logger::{BattleEvent, BattleLogger};
    pub use crate::error::{BattleError, CreatureError};
    pub use crate::model::{Creature, DamageMultipliers, Move, MoveSet, DEFAULT_REVIVE_HP};
    pub use crate::registry::Registry;
    pub use crate::types::ElementType;
}
