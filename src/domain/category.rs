// src/domain/category.rs
//
// Elemental category shared by creatures and moves.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl Category {
    pub const ALL: [Category; 18] = [
        Category::Normal,
        Category::Fire,
        Category::Water,
        Category::Grass,
        Category::Electric,
        Category::Ice,
        Category::Fighting,
        Category::Poison,
        Category::Ground,
        Category::Flying,
        Category::Psychic,
        Category::Bug,
        Category::Rock,
        Category::Ghost,
        Category::Dragon,
        Category::Dark,
        Category::Steel,
        Category::Fairy,
    ];

    /// Stored form, identical to the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Normal => "NORMAL",
            Category::Fire => "FIRE",
            Category::Water => "WATER",
            Category::Grass => "GRASS",
            Category::Electric => "ELECTRIC",
            Category::Ice => "ICE",
            Category::Fighting => "FIGHTING",
            Category::Poison => "POISON",
            Category::Ground => "GROUND",
            Category::Flying => "FLYING",
            Category::Psychic => "PSYCHIC",
            Category::Bug => "BUG",
            Category::Rock => "ROCK",
            Category::Ghost => "GHOST",
            Category::Dragon => "DRAGON",
            Category::Dark => "DARK",
            Category::Steel => "STEEL",
            Category::Fairy => "FAIRY",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::InvalidFormat {
                field: "tipo",
                value: s.to_string(),
                expected: "one of the 18 elemental categories",
            })
    }
}
