//! Model registry — the single place model identifiers and pricing are declared.
//!
//! Two tiers, fixed at build time. Extending the set means adding an enum
//! member and its spec together; the exhaustive `match` in [`ModelTier::spec`]
//! makes a tier without a spec fail to compile.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical quality/cost class of model, decoupled from the provider's
/// concrete model identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Cheap and quick. First choice for high-volume extraction calls.
    Fast,
    /// Stronger reasoning at a higher per-token rate.
    Capable,
}

/// Concrete provider model and per-million-token pricing for one tier.
/// Read-only for the life of the process.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub id: &'static str,
    pub input_price_per_mtok: f64,
    pub output_price_per_mtok: f64,
}

static FAST: ModelSpec = ModelSpec {
    id: "claude-3-5-haiku-20241022",
    input_price_per_mtok: 0.8,
    output_price_per_mtok: 4.0,
};

static CAPABLE: ModelSpec = ModelSpec {
    id: "claude-sonnet-4-5-20250929",
    input_price_per_mtok: 3.0,
    output_price_per_mtok: 15.0,
};

impl ModelTier {
    /// Resolves this tier to its model id and pricing. Total and side-effect-free.
    pub fn spec(self) -> &'static ModelSpec {
        match self {
            ModelTier::Fast => &FAST,
            ModelTier::Capable => &CAPABLE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelTier::Fast => "fast",
            ModelTier::Capable => "capable",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TIERS: [ModelTier; 2] = [ModelTier::Fast, ModelTier::Capable];

    #[test]
    fn test_every_tier_resolves_to_a_priced_spec() {
        for tier in ALL_TIERS {
            let spec = tier.spec();
            assert!(!spec.id.is_empty());
            assert!(spec.input_price_per_mtok > 0.0);
            assert!(spec.output_price_per_mtok > 0.0);
        }
    }

    #[test]
    fn test_fast_tier_is_cheaper_than_capable() {
        let fast = ModelTier::Fast.spec();
        let capable = ModelTier::Capable.spec();
        assert!(fast.input_price_per_mtok < capable.input_price_per_mtok);
        assert!(fast.output_price_per_mtok < capable.output_price_per_mtok);
    }

    #[test]
    fn test_tier_display_matches_wire_name() {
        assert_eq!(ModelTier::Fast.to_string(), "fast");
        assert_eq!(ModelTier::Capable.to_string(), "capable");
    }

    #[test]
    fn test_tier_serde_round_trip() {
        for tier in ALL_TIERS {
            let json = serde_json::to_string(&tier).unwrap();
            let recovered: ModelTier = serde_json::from_str(&json).unwrap();
            assert_eq!(recovered, tier);
        }
        assert_eq!(serde_json::to_string(&ModelTier::Fast).unwrap(), r#""fast""#);
    }
}
