//! Owner-occupied annual running-cost estimators. Markets without a defined
//! formula return zero for that line item.

use rust_decimal::Decimal;

use crate::schedules::Schedules;
use crate::types::{round_money, Country, Money};

/// Estimated annual council / municipal tax.
pub fn council_tax(country: Country, price: Money, schedules: &Schedules) -> Money {
    let price = price.max(Decimal::ZERO);
    match &schedules.running_costs(country).council_tax {
        Some(tier) => round_money((price * tier.rate).clamp(tier.floor, tier.ceiling)),
        None => Decimal::ZERO,
    }
}

/// Estimated annual utilities (power, water, broadband).
pub fn utilities(country: Country, schedules: &Schedules) -> Money {
    schedules
        .running_costs(country)
        .utilities_flat
        .map(round_money)
        .unwrap_or(Decimal::ZERO)
}

/// Estimated annual property / land tax, price-proportional where defined.
pub fn property_tax(country: Country, price: Money, schedules: &Schedules) -> Money {
    let price = price.max(Decimal::ZERO);
    match schedules.running_costs(country).property_tax_rate {
        Some(rate) => round_money(price * rate),
        None => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_uk_council_tax_tiers() {
        let s = Schedules::default();
        // Floor at the low end: 0.5% of 150k = 750, floored to 1,200
        assert_eq!(council_tax(Country::Uk, dec!(150000), &s), dec!(1200));
        // Proportional in the middle: 0.5% of 300k
        assert_eq!(council_tax(Country::Uk, dec!(300000), &s), dec!(1500));
        // Ceiling at the top: 0.5% of 900k = 4,500, capped at 3,000
        assert_eq!(council_tax(Country::Uk, dec!(900000), &s), dec!(3000));
    }

    #[test]
    fn test_uk_utilities_flat() {
        let s = Schedules::default();
        assert_eq!(utilities(Country::Uk, &s), dec!(2000));
    }

    #[test]
    fn test_undefined_estimators_are_zero() {
        let s = Schedules::default();
        for country in [Country::Uae, Country::Thailand, Country::Japan] {
            assert_eq!(council_tax(country, dec!(1000000), &s), Decimal::ZERO);
            assert_eq!(utilities(country, &s), Decimal::ZERO);
            assert_eq!(property_tax(country, dec!(1000000), &s), Decimal::ZERO);
        }
        // UK has no property/land tax in this model
        assert_eq!(property_tax(Country::Uk, dec!(1000000), &s), Decimal::ZERO);
    }

    #[test]
    fn test_property_tax_when_configured() {
        let mut s = Schedules::default();
        s.jp_running_costs.property_tax_rate = Some(dec!(0.014));
        assert_eq!(property_tax(Country::Japan, dec!(50000000), &s), dec!(700000));
    }
}
