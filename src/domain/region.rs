// src/domain/region.rs
//
// Home regions and the pokedex range each one accepts.

use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Kanto,
    Johto,
    Hoenn,
    Sinnoh,
    Unova,
    Kalos,
    Alola,
    Galar,
    Paldea,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::Kanto,
        Region::Johto,
        Region::Hoenn,
        Region::Sinnoh,
        Region::Unova,
        Region::Kalos,
        Region::Alola,
        Region::Galar,
        Region::Paldea,
    ];

    /// Inclusive pokedex range of the region's generation.
    /// Ranges are contiguous and never overlap.
    pub fn range(&self) -> RangeInclusive<u16> {
        match self {
            Region::Kanto => 1..=151,
            Region::Johto => 152..=251,
            Region::Hoenn => 252..=386,
            Region::Sinnoh => 387..=493,
            Region::Unova => 494..=649,
            Region::Kalos => 650..=721,
            Region::Alola => 722..=809,
            Region::Galar => 810..=905,
            Region::Paldea => 906..=1010,
        }
    }

    pub fn contains(&self, number: u16) -> bool {
        self.range().contains(&number)
    }

    /// Region whose range holds `number`, if any
    pub fn for_number(number: u16) -> Option<Region> {
        Region::ALL.into_iter().find(|r| r.contains(number))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Kanto => "KANTO",
            Region::Johto => "JOHTO",
            Region::Hoenn => "HOENN",
            Region::Sinnoh => "SINNOH",
            Region::Unova => "UNOVA",
            Region::Kalos => "KALOS",
            Region::Alola => "ALOLA",
            Region::Galar => "GALAR",
            Region::Paldea => "PALDEA",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Region {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::InvalidFormat {
                field: "region",
                value: s.to_string(),
                expected: "a known region",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_are_contiguous() {
        let mut next = 1;
        for region in Region::ALL {
            let range = region.range();
            assert_eq!(*range.start(), next, "{} starts at a gap", region);
            next = range.end() + 1;
        }
        // every three-digit number except 000 has a home
        for n in 1..=999 {
            assert!(Region::for_number(n).is_some(), "{} has no region", n);
        }
    }

    #[test]
    fn test_range_boundaries() {
        assert_eq!(Region::for_number(0), None);
        assert_eq!(Region::for_number(1), Some(Region::Kanto));
        assert_eq!(Region::for_number(151), Some(Region::Kanto));
        assert_eq!(Region::for_number(152), Some(Region::Johto));
        assert_eq!(Region::for_number(999), Some(Region::Paldea));
    }

    #[test]
    fn test_parse() {
        assert_eq!("johto".parse::<Region>().unwrap(), Region::Johto);
        assert!("orre".parse::<Region>().is_err());
    }
}
