use crate::ai::MoveSelector;
use crate::battle::{Battle, BattleOptions, BattleOutcome};
use crate::battle_logger::BattleLogger;
use crate::error::{BattleError, CreatureError};
use crate::model::{Creature, DamageMultipliers, MoveSet};
use crate::types::ElementType;
use std::collections::HashMap;
use tracing::debug;

/// Creatures by name. Registering a name that is already present replaces
/// the old creature in place, so listing order stays that of first
/// registration.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    creatures: Vec<Creature>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `creature`, returning the creature it replaced, if any.
    pub fn register(&mut self, creature: Creature) -> Option<Creature> {
        match self.index.get(creature.name()) {
            Some(&idx) => {
                debug!(name = %creature.name(), "replacing registered creature");
                Some(std::mem::replace(&mut self.creatures[idx], creature))
            }
            None => {
                self.index
                    .insert(creature.name().to_string(), self.creatures.len());
                self.creatures.push(creature);
                None
            }
        }
    }

    /// Build a creature and register it under its name.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        hit_points: i32,
        moves: MoveSet,
        element: ElementType,
        damage_multipliers: Option<DamageMultipliers>,
    ) -> Result<&Creature, CreatureError> {
        let creature = Creature::new(name, hit_points, moves, element, damage_multipliers)?;
        let name = creature.name().to_string();
        self.register(creature);
        let idx = self.index[&name];
        Ok(&self.creatures[idx])
    }

    pub fn get(&self, name: &str) -> Option<&Creature> {
        self.index.get(name).map(|&idx| &self.creatures[idx])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Creature> {
        match self.index.get(name) {
            Some(&idx) => Some(&mut self.creatures[idx]),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Creatures in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Creature> + '_ {
        self.creatures.iter()
    }

    /// Creature at a 1-based listing position.
    pub fn by_position(&self, position: usize) -> Option<&Creature> {
        position.checked_sub(1).and_then(|idx| self.creatures.get(idx))
    }

    pub fn revive(&mut self, name: &str, hit_points: i32) -> Result<(), BattleError> {
        let creature = self
            .get_mut(name)
            .ok_or_else(|| BattleError::UnknownCreature(name.to_string()))?;
        creature.revive(hit_points);
        Ok(())
    }

    /// Mutable access to two different creatures at once.
    pub fn pair_mut(
        &mut self,
        first: &str,
        second: &str,
    ) -> Result<(&mut Creature, &mut Creature), BattleError> {
        let a = *self
            .index
            .get(first)
            .ok_or_else(|| BattleError::UnknownCreature(first.to_string()))?;
        let b = *self
            .index
            .get(second)
            .ok_or_else(|| BattleError::UnknownCreature(second.to_string()))?;
        if a == b {
            return Err(BattleError::SameCreature(first.to_string()));
        }
        if a < b {
            let (left, right) = self.creatures.split_at_mut(b);
            Ok((&mut left[a], &mut right[0]))
        } else {
            let (left, right) = self.creatures.split_at_mut(a);
            Ok((&mut right[0], &mut left[b]))
        }
    }

    /// Battle two registered creatures; `first` attacks first. Hit points
    /// change on the registered records.
    pub fn battle(
        &mut self,
        first: &str,
        second: &str,
        selector: &mut dyn MoveSelector,
        options: &BattleOptions,
    ) -> Result<(BattleOutcome, BattleLogger), BattleError> {
        let (a, b) = self.pair_mut(first, second)?;
        let mut battle = Battle::new(a, b, options.clone());
        let outcome = battle.run(selector)?;
        Ok((outcome, battle.into_logger()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Move;

    fn moves(power: u32) -> MoveSet {
        MoveSet::from_moves(vec![Move::new("Hit", power)]).unwrap()
    }

    #[test]
    fn re_registering_replaces_in_place() {
        let mut registry = Registry::new();
        registry
            .create("Pikachu", 35, moves(40), ElementType::Electric, None)
            .unwrap();
        registry
            .create("Eevee", 55, moves(40), ElementType::Normal, None)
            .unwrap();
        let replaced = registry.register(
            Creature::new("Pikachu", 99, moves(90), ElementType::Fire, None).unwrap(),
        );
        assert_eq!(replaced.map(|c| c.hit_points()), Some(35));
        assert_eq!(registry.len(), 2);
        let pikachu = registry.get("Pikachu").unwrap();
        assert_eq!(pikachu.hit_points(), 99);
        assert_eq!(pikachu.element(), ElementType::Fire);
        let names: Vec<_> = registry.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["Pikachu", "Eevee"]);
    }

    #[test]
    fn failed_creation_leaves_registry_untouched() {
        let mut registry = Registry::new();
        assert!(registry
            .create("Ghosty", 0, moves(10), ElementType::Ghost, None)
            .is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn pair_mut_in_both_orders() {
        let mut registry = Registry::new();
        registry.create("A", 1, moves(1), ElementType::Normal, None).unwrap();
        registry.create("B", 2, moves(1), ElementType::Normal, None).unwrap();
        let (b, a) = registry.pair_mut("B", "A").unwrap();
        assert_eq!((a.name(), b.name()), ("A", "B"));
        assert!(matches!(
            registry.pair_mut("A", "A"),
            Err(BattleError::SameCreature(_))
        ));
        assert!(matches!(
            registry.pair_mut("A", "C"),
            Err(BattleError::UnknownCreature(name)) if name == "C"
        ));
    }

    #[test]
    fn revive_by_name() {
        let mut registry = Registry::new();
        registry.create("A", 1, moves(1), ElementType::Normal, None).unwrap();
        registry.revive("A", 50).unwrap();
        assert_eq!(registry.get("A").unwrap().hit_points(), 50);
        assert!(registry.revive("missing", 50).is_err());
    }

    #[test]
    fn positions_are_one_based() {
        let mut registry = Registry::new();
        registry.create("A", 1, moves(1), ElementType::Normal, None).unwrap();
        assert_eq!(registry.by_position(1).map(|c| c.name()), Some("A"));
        assert!(registry.by_position(0).is_none());
        assert!(registry.by_position(2).is_none());
    }
}
