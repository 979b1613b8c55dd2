// src/domain/identity.rs
//
// Identity value objects.
//
// INVARIANTS:
// - An identity that exists has already matched its format
// - Identities are immutable and compared by value
// - Serialized as the bare string

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

fn is_valid(cell: &'static OnceLock<Regex>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).unwrap())
        .is_match(value)
}

macro_rules! identity {
    ($(#[$doc:meta])* $name:ident, $field:literal, $pattern:literal, $expected:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
                static PATTERN: OnceLock<Regex> = OnceLock::new();
                let value = value.into();
                if !is_valid(&PATTERN, $pattern, &value) {
                    return Err(DomainError::InvalidFormat {
                        field: $field,
                        value,
                        expected: $expected,
                    });
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

identity!(
    /// Three-digit pokedex number, e.g. "025"
    PokedexNumber,
    "pokedexNumber",
    r"^[0-9]{3}$",
    "3 digits, e.g. 025"
);

identity!(
    /// Two uppercase letters and four digits, e.g. "TH1023"
    MoveId,
    "id movimiento",
    r"^[A-Z]{2}[0-9]{4}$",
    "2 uppercase letters + 4 digits, e.g. TH1023"
);

identity!(
    /// National id of a trainer: eight digits and an uppercase letter, e.g. "65788344F"
    TrainerId,
    "DNI",
    r"^[0-9]{8}[A-Z]$",
    "8 digits + 1 uppercase letter, e.g. 65788344F"
);

impl PokedexNumber {
    /// Numeric value used for region range checks
    pub fn number(&self) -> u16 {
        // three ASCII digits always fit
        self.0.bytes().fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'))
    }
}
