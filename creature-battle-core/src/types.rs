use crate::error::CreatureError;
use phf::phf_map;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The fifteen elemental types, declared in the column order used by the
/// creature data file.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fight,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
}

static TYPE_NAMES: phf::Map<&'static str, ElementType> = phf_map! {
    "normal" => ElementType::Normal,
    "fire" => ElementType::Fire,
    "water" => ElementType::Water,
    "electric" => ElementType::Electric,
    "grass" => ElementType::Grass,
    "ice" => ElementType::Ice,
    "fight" => ElementType::Fight,
    "poison" => ElementType::Poison,
    "ground" => ElementType::Ground,
    "flying" => ElementType::Flying,
    "psychic" => ElementType::Psychic,
    "bug" => ElementType::Bug,
    "rock" => ElementType::Rock,
    "ghost" => ElementType::Ghost,
    "dragon" => ElementType::Dragon,
};

impl ElementType {
    pub const COUNT: usize = 15;

    pub const ALL: [ElementType; Self::COUNT] = [
        ElementType::Normal,
        ElementType::Fire,
        ElementType::Water,
        ElementType::Electric,
        ElementType::Grass,
        ElementType::Ice,
        ElementType::Fight,
        ElementType::Poison,
        ElementType::Ground,
        ElementType::Flying,
        ElementType::Psychic,
        ElementType::Bug,
        ElementType::Rock,
        ElementType::Ghost,
        ElementType::Dragon,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Normal => "normal",
            ElementType::Fire => "fire",
            ElementType::Water => "water",
            ElementType::Electric => "electric",
            ElementType::Grass => "grass",
            ElementType::Ice => "ice",
            ElementType::Fight => "fight",
            ElementType::Poison => "poison",
            ElementType::Ground => "ground",
            ElementType::Flying => "flying",
            ElementType::Psychic => "psychic",
            ElementType::Bug => "bug",
            ElementType::Rock => "rock",
            ElementType::Ghost => "ghost",
            ElementType::Dragon => "dragon",
        }
    }

    /// Case-insensitive lookup by type name.
    pub fn from_name(name: &str) -> Option<ElementType> {
        let key = name.trim().to_ascii_lowercase();
        TYPE_NAMES.get(key.as_str()).copied()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = CreatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::from_name(s).ok_or_else(|| CreatureError::UnknownType(s.trim().to_string()))
    }
}

/// First-generation type chart: the multiplier an `attacking` move type
/// deals against a `defending` creature type.
pub fn type_effectiveness(attacking: ElementType, defending: ElementType) -> f64 {
    use ElementType::*;
    match attacking {
        Normal => match defending {
            Rock => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Fire => match defending {
            Fire | Water | Rock | Dragon => 0.5,
            Grass | Ice | Bug => 2.0,
            _ => 1.0,
        },
        Water => match defending {
            Water | Grass | Dragon => 0.5,
            Fire | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Electric => match defending {
            Electric | Grass | Dragon => 0.5,
            Water | Flying => 2.0,
            Ground => 0.0,
            _ => 1.0,
        },
        Grass => match defending {
            Fire | Grass | Poison | Flying | Bug | Dragon => 0.5,
            Water | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Ice => match defending {
            Water | Ice => 0.5,
            Grass | Ground | Flying | Dragon => 2.0,
            _ => 1.0,
        },
        Fight => match defending {
            Normal | Ice | Rock => 2.0,
            Poison | Flying | Psychic | Bug => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Poison => match defending {
            Grass | Bug => 2.0,
            Poison | Ground | Rock | Ghost => 0.5,
            _ => 1.0,
        },
        Ground => match defending {
            Fire | Electric | Poison | Rock => 2.0,
            Grass | Bug => 0.5,
            Flying => 0.0,
            _ => 1.0,
        },
        Flying => match defending {
            Grass | Fight | Bug => 2.0,
            Electric | Rock => 0.5,
            _ => 1.0,
        },
        Psychic => match defending {
            Fight | Poison => 2.0,
            Psychic => 0.5,
            _ => 1.0,
        },
        Bug => match defending {
            Grass | Psychic | Poison => 2.0,
            Fire | Fight | Flying | Ghost => 0.5,
            _ => 1.0,
        },
        Rock => match defending {
            Fire | Ice | Flying | Bug => 2.0,
            Fight | Ground => 0.5,
            _ => 1.0,
        },
        Ghost => match defending {
            Ghost => 2.0,
            Normal | Psychic => 0.0,
            _ => 1.0,
        },
        Dragon => match defending {
            Dragon => 2.0,
            _ => 1.0,
        },
    }
}
