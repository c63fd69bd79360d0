use crate::ai::{MoveSelector, TurnContext};
use crate::battle_logger::{BattleEvent, BattleLogger};
use crate::error::{BattleError, CreatureError};
use crate::model::Creature;
use tracing::{debug, info, warn};

/// Divides every hit; hit points and move power live on different scales.
pub const GLOBAL_DAMAGE_REDUCTION: u32 = 4;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct BattleOptions {
    /// Abort with [`BattleError::TurnLimitExceeded`] once this many attacks
    /// have been made without a winner. `None` never gives up.
    pub max_turns: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BattleOutcome {
    pub winner: Side,
    pub winner_name: String,
    pub loser_name: String,
    pub winner_hp: i32,
    /// Attacks made before the loser's turn came up.
    pub turns: u32,
}

/// Result of a single [`Battle::step`].
#[derive(Clone, Debug, PartialEq)]
pub enum TurnReport {
    Attack(BattleEvent),
    Finished(BattleOutcome),
}

/// `floor(power * multiplier / GLOBAL_DAMAGE_REDUCTION)`.
pub fn compute_damage(power: u32, multiplier: f64) -> i32 {
    (power as f64 * multiplier / GLOBAL_DAMAGE_REDUCTION as f64).floor() as i32
}

/// Two creatures taking turns until one of them cannot act. The first
/// creature attacks first. Hit points are changed in place on the borrowed
/// creatures.
pub struct Battle<'a> {
    creatures: [&'a mut Creature; 2],
    turn: u32,
    to_act: Side,
    options: BattleOptions,
    logger: BattleLogger,
    outcome: Option<BattleOutcome>,
}

impl<'a> Battle<'a> {
    pub fn new(first: &'a mut Creature, second: &'a mut Creature, options: BattleOptions) -> Self {
        Self {
            creatures: [first, second],
            turn: 1,
            to_act: Side::First,
            options,
            logger: BattleLogger::new(),
            outcome: None,
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn to_act(&self) -> Side {
        self.to_act
    }

    pub fn creature(&self, side: Side) -> &Creature {
        match side {
            Side::First => &*self.creatures[0],
            Side::Second => &*self.creatures[1],
        }
    }

    pub fn outcome(&self) -> Option<&BattleOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn logger(&self) -> &BattleLogger {
        &self.logger
    }

    pub fn into_logger(self) -> BattleLogger {
        self.logger
    }

    fn combatants(&mut self) -> (&mut Creature, &mut Creature) {
        let [first, second] = &mut self.creatures;
        match self.to_act {
            Side::First => (&mut **first, &mut **second),
            Side::Second => (&mut **second, &mut **first),
        }
    }

    /// Resolve the turn of the creature whose turn it is: either it attacks,
    /// or it is down and the battle ends.
    pub fn step(&mut self, selector: &mut dyn MoveSelector) -> Result<TurnReport, BattleError> {
        if self.outcome.is_some() {
            return Err(BattleError::Finished);
        }
        let turn = self.turn;
        let side = self.to_act;
        let limit = self.options.max_turns;
        let (attacker, defender) = self.combatants();

        if attacker.is_knocked_out() {
            attacker.clamp_fainted();
            let outcome = BattleOutcome {
                winner: side.opponent(),
                winner_name: defender.name().to_string(),
                loser_name: attacker.name().to_string(),
                winner_hp: defender.hit_points(),
                turns: turn - 1,
            };
            info!(
                winner = %outcome.winner_name,
                hp = outcome.winner_hp,
                turns = outcome.turns,
                "battle finished"
            );
            self.logger.record(BattleEvent::Win {
                winner: outcome.winner_name.clone(),
                winner_hp: outcome.winner_hp,
                loser: outcome.loser_name.clone(),
                turns: outcome.turns,
            });
            self.outcome = Some(outcome.clone());
            return Ok(TurnReport::Finished(outcome));
        }

        if let Some(limit) = limit {
            if turn > limit {
                return Err(BattleError::TurnLimitExceeded(limit));
            }
        }

        let multiplier = defender.damage_multipliers().get(attacker.element()).ok_or_else(|| {
            BattleError::MissingMultiplier {
                defender: defender.name().to_string(),
                attacker_type: attacker.element(),
            }
        })?;
        let available = attacker.available_moves();
        let turn_event = BattleEvent::Turn {
            turn,
            attacker: attacker.name().to_string(),
            attacker_hp: attacker.hit_points(),
            defender: defender.name().to_string(),
            defender_hp: defender.hit_points(),
            multiplier,
        };

        let ctx = TurnContext {
            turn,
            attacker: &*attacker,
            defender: &*defender,
            multiplier,
            available: &available,
        };
        let slot = loop {
            let slot = selector.select_move(&ctx)?;
            if available.contains(&slot) {
                break slot;
            }
            warn!(slot, attacker = %attacker.name(), ?available, "rejected move choice");
        };
        let (move_name, power) = attacker
            .moves()
            .get(slot)
            .map(|mv| (mv.name.clone(), mv.power))
            .ok_or(CreatureError::SlotOutOfRange(slot))?;

        let damage = compute_damage(power, multiplier);
        defender.take_damage(damage);
        debug!(
            turn,
            attacker = %attacker.name(),
            defender = %defender.name(),
            %move_name,
            damage,
            defender_hp = defender.hit_points(),
            "attack resolved"
        );
        let attack_event = BattleEvent::Attack {
            turn,
            attacker: attacker.name().to_string(),
            slot,
            move_name,
            damage,
            defender: defender.name().to_string(),
            defender_hp: defender.hit_points(),
        };

        self.logger.record(turn_event);
        self.logger.record(attack_event.clone());
        self.turn = self.turn.saturating_add(1);
        self.to_act = side.opponent();
        Ok(TurnReport::Attack(attack_event))
    }

    /// Step until one side wins.
    pub fn run(&mut self, selector: &mut dyn MoveSelector) -> Result<BattleOutcome, BattleError> {
        loop {
            if let TurnReport::Finished(outcome) = self.step(selector)? {
                return Ok(outcome);
            }
        }
    }
}

/// Fight `first` against `second` to the end; `first` attacks first.
pub fn resolve_battle(
    first: &mut Creature,
    second: &mut Creature,
    selector: &mut dyn MoveSelector,
    options: &BattleOptions,
) -> Result<BattleOutcome, BattleError> {
    let mut battle = Battle::new(first, second, options.clone());
    battle.run(selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_examples() {
        assert_eq!(compute_damage(40, 2.0), 20);
        assert_eq!(compute_damage(15, 0.5), 1);
        assert_eq!(compute_damage(100, 1.0), 25);
        assert_eq!(compute_damage(3, 1.0), 0);
        assert_eq!(compute_damage(0, 2.0), 0);
        assert_eq!(compute_damage(150, 0.0), 0);
    }

    #[test]
    fn damage_matches_floor_formula_on_a_grid() {
        let multipliers = [0.0, 0.25, 0.5, 1.0, 1.5, 2.0, 4.0];
        for power in 0..=200u32 {
            for &m in &multipliers {
                let expected = ((power as f64) * m / 4.0).floor() as i32;
                assert_eq!(compute_damage(power, m), expected, "power {power} x {m}");
            }
        }
    }

    #[test]
    fn turn_counter_stops_at_its_maximum() -> Result<(), BattleError> {
        use crate::ai::ScriptedSelector;
        use crate::model::{DamageMultipliers, Move, MoveSet};
        use crate::types::ElementType;

        let stalemate = |name: &str| {
            Creature::new(
                name,
                10,
                MoveSet::from_moves(vec![Move::new("Growl", 0)])?,
                ElementType::Normal,
                Some(DamageMultipliers::standard(ElementType::Normal)),
            )
        };
        let mut a = stalemate("A")?;
        let mut b = stalemate("B")?;
        let mut battle = Battle::new(&mut a, &mut b, BattleOptions::default());
        battle.turn = u32::MAX - 1;
        let mut selector = ScriptedSelector::default();
        for _ in 0..3 {
            assert!(matches!(battle.step(&mut selector)?, TurnReport::Attack(_)));
        }
        assert_eq!(battle.turn(), u32::MAX);
        assert!(!battle.is_finished());
        Ok(())
    }

    #[test]
    fn opponent_flips_sides() {
        assert_eq!(Side::First.opponent(), Side::Second);
        assert_eq!(Side::Second.opponent(), Side::First);
    }
}
