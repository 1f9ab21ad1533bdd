use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Fractional rates (0.05 = 5%). Used throughout the schedule tables.
pub type Rate = Decimal;

/// Form-style percentages (5 = 5%). Used by caller-facing input records,
/// matching the intake form convention.
pub type Percent = Decimal;

/// Report / label language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lang {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh")]
    Zh,
}

/// Supported market. Wire codes match the intake form payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "uk")]
    Uk,
    #[serde(rename = "uae")]
    Uae,
    #[serde(rename = "th")]
    Thailand,
    #[serde(rename = "jp")]
    Japan,
}

impl Country {
    /// Settlement currency for the market.
    pub fn currency(&self) -> Currency {
        match self {
            Country::Uk => Currency::GBP,
            Country::Uae => Currency::AED,
            Country::Thailand => Currency::THB,
            Country::Japan => Currency::JPY,
        }
    }

    /// Localized display name.
    pub fn label(&self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Country::Uk, Lang::En) => "UK",
            (Country::Uk, Lang::Zh) => "英国",
            (Country::Uae, Lang::En) => "UAE",
            (Country::Uae, Lang::Zh) => "阿联酋",
            (Country::Thailand, Lang::En) => "Thailand",
            (Country::Thailand, Lang::Zh) => "泰国",
            (Country::Japan, Lang::En) => "Japan",
            (Country::Japan, Lang::Zh) => "日本",
        }
    }
}

/// Why the property is being bought. Selects which output branch is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    #[serde(rename = "investment")]
    Investment,
    #[serde(rename = "owner")]
    OwnerOccupied,
}

/// UK buyer profile: first vs additional home (drives the additional-home
/// surcharge and first-time-buyer relief eligibility).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeCount {
    #[serde(rename = "first")]
    First,
    #[serde(rename = "additional")]
    Additional,
}

/// UK buyer profile: residency status (drives the non-resident surcharge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuyerResidency {
    #[serde(rename = "resident")]
    Resident,
    #[serde(rename = "nonResident")]
    NonResident,
}

/// Currency code per supported market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    GBP,
    AED,
    THB,
    JPY,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::GBP => "GBP",
            Currency::AED => "AED",
            Currency::THB => "THB",
            Currency::JPY => "JPY",
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Clamp a form-style percentage into [0, 100]. Idempotent.
pub fn clamp_percent(pct: Percent) -> Percent {
    pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Round a monetary amount to whole currency units, half away from zero.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_clamp_percent_range() {
        assert_eq!(clamp_percent(dec!(-5)), Decimal::ZERO);
        assert_eq!(clamp_percent(dec!(42.5)), dec!(42.5));
        assert_eq!(clamp_percent(dec!(150)), dec!(100));
    }

    #[test]
    fn test_clamp_percent_idempotent() {
        for raw in [dec!(-10), dec!(0), dec!(33.3), dec!(100), dec!(250)] {
            let once = clamp_percent(raw);
            assert_eq!(clamp_percent(once), once);
        }
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.5)), dec!(3));
        assert_eq!(round_money(dec!(-2.5)), dec!(-3));
        assert_eq!(round_money(dec!(2.4)), dec!(2));
        assert_eq!(round_money(dec!(1234)), dec!(1234));
    }

    #[test]
    fn test_country_wire_codes() {
        assert_eq!(serde_json::to_string(&Country::Uk).unwrap(), "\"uk\"");
        assert_eq!(serde_json::to_string(&Country::Thailand).unwrap(), "\"th\"");
        let c: Country = serde_json::from_str("\"uae\"").unwrap();
        assert_eq!(c, Country::Uae);
    }

    #[test]
    fn test_country_currency_mapping() {
        assert_eq!(Country::Uk.currency().code(), "GBP");
        assert_eq!(Country::Uae.currency().code(), "AED");
        assert_eq!(Country::Thailand.currency().code(), "THB");
        assert_eq!(Country::Japan.currency().code(), "JPY");
    }

    #[test]
    fn test_purpose_wire_codes() {
        assert_eq!(
            serde_json::to_string(&Purpose::OwnerOccupied).unwrap(),
            "\"owner\""
        );
        let p: Purpose = serde_json::from_str("\"investment\"").unwrap();
        assert_eq!(p, Purpose::Investment);
    }
}
