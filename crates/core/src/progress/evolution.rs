//! Morpho evolution stages.
//!
//! The library mascot evolves with collection size: grub, cocoon at 50
//! books, butterfly at 100.

use serde::{Deserialize, Serialize};

const COCOON_BOOKS: u64 = 50;
const BUTTERFLY_BOOKS: u64 = 100;

/// The three evolution stages, in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionStage {
    Grub,
    Cocoon,
    Butterfly,
}

/// All stages in ascending order.
pub const EVOLUTION_STAGES: [EvolutionStage; 3] = [
    EvolutionStage::Grub,
    EvolutionStage::Cocoon,
    EvolutionStage::Butterfly,
];

impl EvolutionStage {
    /// Stage reached at the given collection size.
    pub fn for_books(total_books: u64) -> Self {
        if total_books >= BUTTERFLY_BOOKS {
            Self::Butterfly
        } else if total_books >= COCOON_BOOKS {
            Self::Cocoon
        } else {
            Self::Grub
        }
    }

    /// Stable identifier used for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grub => "grub",
            Self::Cocoon => "cocoon",
            Self::Butterfly => "butterfly",
        }
    }

    /// Parse a persisted stage identifier. Unknown values read as `Grub`.
    pub fn parse(value: &str) -> Self {
        match value {
            "cocoon" => Self::Cocoon,
            "butterfly" => Self::Butterfly,
            _ => Self::Grub,
        }
    }

    /// Display name of the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Grub => "Baby Grub",
            Self::Cocoon => "Growing Cocoon",
            Self::Butterfly => "Morpho Butterfly",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_thresholds() {
        assert_eq!(EvolutionStage::for_books(0), EvolutionStage::Grub);
        assert_eq!(EvolutionStage::for_books(49), EvolutionStage::Grub);
        assert_eq!(EvolutionStage::for_books(50), EvolutionStage::Cocoon);
        assert_eq!(EvolutionStage::for_books(99), EvolutionStage::Cocoon);
        assert_eq!(EvolutionStage::for_books(100), EvolutionStage::Butterfly);
        assert_eq!(EvolutionStage::for_books(10_000), EvolutionStage::Butterfly);
    }

    #[test]
    fn test_parse_roundtrip() {
        for stage in EVOLUTION_STAGES {
            assert_eq!(EvolutionStage::parse(stage.as_str()), stage);
        }
    }

    #[test]
    fn test_parse_unknown_defaults_to_grub() {
        assert_eq!(EvolutionStage::parse("chrysalis"), EvolutionStage::Grub);
    }

    #[test]
    fn test_stages_are_ordered() {
        assert!(EvolutionStage::Grub < EvolutionStage::Cocoon);
        assert!(EvolutionStage::Cocoon < EvolutionStage::Butterfly);
    }
}
