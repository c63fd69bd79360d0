use crate::error::CreatureError;
use crate::types::{type_effectiveness, ElementType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Hit points handed out by [`Creature::revive`] when the caller has no
/// preference.
pub const DEFAULT_REVIVE_HP: i32 = 100;

/// Number of move slots every creature has.
pub const MOVE_SLOTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    pub name: String,
    pub power: u32,
}

impl Move {
    pub fn new(name: impl Into<String>, power: u32) -> Self {
        Self {
            name: name.into(),
            power,
        }
    }
}

/// Four optional move slots, addressed by slot number 1 to 4.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveSet {
    slots: [Option<Move>; MOVE_SLOTS],
}

impl MoveSet {
    pub fn new(slots: [Option<Move>; MOVE_SLOTS]) -> Self {
        Self { slots }
    }

    /// Fill slots 1..=n with `moves` in order.
    pub fn from_moves(moves: Vec<Move>) -> Result<Self, CreatureError> {
        if moves.len() > MOVE_SLOTS {
            return Err(CreatureError::TooManyMoves(moves.len()));
        }
        let mut set = MoveSet::default();
        for (idx, mv) in moves.into_iter().enumerate() {
            set.slots[idx] = Some(mv);
        }
        Ok(set)
    }

    pub fn get(&self, slot: usize) -> Option<&Move> {
        slot.checked_sub(1)
            .and_then(|idx| self.slots.get(idx))
            .and_then(Option::as_ref)
    }

    pub fn set(&mut self, slot: usize, mv: Option<Move>) -> Result<(), CreatureError> {
        let entry = slot
            .checked_sub(1)
            .and_then(|idx| self.slots.get_mut(idx))
            .ok_or(CreatureError::SlotOutOfRange(slot))?;
        *entry = mv;
        Ok(())
    }

    /// Occupied slot numbers, in slot order.
    pub fn occupied(&self) -> Vec<usize> {
        self.iter().map(|(slot, _)| slot).collect()
    }

    /// Occupied slots as `(slot number, move)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Move)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, mv)| mv.as_ref().map(|mv| (idx + 1, mv)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|mv| mv.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Incoming damage multiplier per attacking type. Entries may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DamageMultipliers(BTreeMap<ElementType, f64>);

impl DamageMultipliers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a full table from values given in canonical type order.
    pub fn from_ordered(values: &[f64]) -> Result<Self, CreatureError> {
        if values.len() != ElementType::COUNT {
            return Err(CreatureError::MultiplierCount {
                expected: ElementType::COUNT,
                actual: values.len(),
            });
        }
        Ok(ElementType::ALL.iter().copied().zip(values.iter().copied()).collect())
    }

    /// The type chart's multipliers for a creature of type `defending`.
    pub fn standard(defending: ElementType) -> Self {
        ElementType::ALL
            .iter()
            .map(|&attacking| (attacking, type_effectiveness(attacking, defending)))
            .collect()
    }

    pub fn get(&self, attacking: ElementType) -> Option<f64> {
        self.0.get(&attacking).copied()
    }

    pub fn insert(&mut self, attacking: ElementType, multiplier: f64) -> Option<f64> {
        self.0.insert(attacking, multiplier)
    }

    /// Entries in canonical type order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementType, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ElementType, f64)> for DamageMultipliers {
    fn from_iter<I: IntoIterator<Item = (ElementType, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Multipliers have to be finite and not below zero.
pub fn is_valid_multiplier(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Creature {
    name: String,
    hit_points: i32,
    element: ElementType,
    moves: MoveSet,
    damage_multipliers: DamageMultipliers,
}

impl Creature {
    /// Build a creature. Hit points must be positive and at least one move
    /// slot must be occupied.
    pub fn new(
        name: impl Into<String>,
        hit_points: i32,
        moves: MoveSet,
        element: ElementType,
        damage_multipliers: Option<DamageMultipliers>,
    ) -> Result<Self, CreatureError> {
        if hit_points <= 0 {
            return Err(CreatureError::NonPositiveHitPoints(hit_points));
        }
        if moves.is_empty() {
            return Err(CreatureError::EmptyMoveSet);
        }
        Ok(Self {
            name: name.into(),
            hit_points,
            element,
            moves,
            damage_multipliers: damage_multipliers.unwrap_or_default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current hit points. Can be negative right after a hit, until the
    /// creature's next turn clamps them.
    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn element(&self) -> ElementType {
        self.element
    }

    pub fn moves(&self) -> &MoveSet {
        &self.moves
    }

    pub fn damage_multipliers(&self) -> &DamageMultipliers {
        &self.damage_multipliers
    }

    pub fn is_knocked_out(&self) -> bool {
        self.hit_points <= 0
    }

    /// 1-based slot numbers this creature can use.
    pub fn available_moves(&self) -> Vec<usize> {
        self.moves.occupied()
    }

    pub fn revive(&mut self, hit_points: i32) {
        self.hit_points = hit_points;
    }

    pub(crate) fn take_damage(&mut self, damage: i32) {
        self.hit_points = self.hit_points.saturating_sub(damage);
    }

    pub(crate) fn clamp_fainted(&mut self) {
        if self.hit_points < 0 {
            self.hit_points = 0;
        }
    }
}
