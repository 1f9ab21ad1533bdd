//! One-off acquisition cost estimators: purchase tax and the independent
//! government / solicitor / admin fee estimate, both keyed by market.

use rust_decimal::Decimal;

use crate::schedules::{Schedules, StampDutyTable};
use crate::types::{round_money, BuyerResidency, Country, HomeCount, Money, Rate};

/// Purchase tax for the selected market.
///
/// UK runs the progressive SDLT table; the other markets apply a flat
/// transfer duty on the price.
pub fn purchase_tax(
    country: Country,
    price: Money,
    home_count: HomeCount,
    residency: BuyerResidency,
    schedules: &Schedules,
) -> Money {
    match country {
        Country::Uk => uk_stamp_duty(price, home_count, residency, &schedules.uk_stamp_duty),
        _ => {
            // Validated tables always carry a duty for non-UK markets
            let rate = schedules.transfer_duty(country).unwrap_or(Decimal::ZERO);
            flat_transfer_duty(price, rate)
        }
    }
}

/// Progressive UK SDLT with buyer-profile surcharges.
///
/// The surcharge (additional home and/or non-resident) is added to the rate
/// of every chargeable band; the nil-rate slice stays uncharged. First-home
/// buyers at or below the relief cap get the simplified two-band relief
/// schedule instead of the standard bands.
pub fn uk_stamp_duty(
    price: Money,
    home_count: HomeCount,
    residency: BuyerResidency,
    table: &StampDutyTable,
) -> Money {
    let price = round_money(price.max(Decimal::ZERO));
    let surcharge = buyer_surcharge(home_count, residency, table);

    let relief = &table.first_time_buyer;
    if home_count == HomeCount::First && price <= relief.price_cap {
        let chargeable = (price.min(relief.price_cap) - relief.nil_band).max(Decimal::ZERO);
        return round_money(chargeable * (relief.rate + surcharge));
    }

    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;
    for band in &table.bands {
        let upper = band.up_to.unwrap_or(price);
        let slice = (price.min(upper) - lower).max(Decimal::ZERO);
        if band.rate > Decimal::ZERO && slice > Decimal::ZERO {
            tax += slice * (band.rate + surcharge);
        }
        if price <= upper {
            break;
        }
        lower = upper;
    }
    round_money(tax)
}

fn buyer_surcharge(home_count: HomeCount, residency: BuyerResidency, table: &StampDutyTable) -> Rate {
    let mut surcharge = Decimal::ZERO;
    if home_count == HomeCount::Additional {
        surcharge += table.additional_home_surcharge;
    }
    if residency == BuyerResidency::NonResident {
        surcharge += table.non_resident_surcharge;
    }
    surcharge
}

/// Flat percentage-of-price transfer duty (UAE / Thailand / Japan).
pub fn flat_transfer_duty(price: Money, rate: Rate) -> Money {
    round_money((price * rate).max(Decimal::ZERO))
}

/// Government / solicitor / admin fee estimate: `max(minimum, price * rate)`
/// from the market's fee schedule.
pub fn government_admin_fees(country: Country, price: Money, schedules: &Schedules) -> Money {
    let price = price.max(Decimal::ZERO);
    let fee = schedules.fees(country);
    round_money(fee.minimum.max(price * fee.rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn schedules() -> Schedules {
        Schedules::default()
    }

    #[test]
    fn test_uk_standard_bands_resident_additional() {
        // 750k additional home, resident: +3% on chargeable bands
        // (250k-125k)*5% + (750k-250k)*8% = 6,250 + 40,000
        let tax = uk_stamp_duty(
            dec!(750000),
            HomeCount::Additional,
            BuyerResidency::Resident,
            &schedules().uk_stamp_duty,
        );
        assert_eq!(tax, dec!(46250));
    }

    #[test]
    fn test_uk_standard_bands_non_resident_additional() {
        // Surcharges stack: +3% +2%
        // 125000*0.07 + 500000*0.10 = 8,750 + 50,000
        let tax = uk_stamp_duty(
            dec!(750000),
            HomeCount::Additional,
            BuyerResidency::NonResident,
            &schedules().uk_stamp_duty,
        );
        assert_eq!(tax, dec!(58750));
    }

    #[test]
    fn test_uk_nil_band_unsurcharged() {
        // Below the first band nothing is chargeable, even for additional homes
        let tax = uk_stamp_duty(
            dec!(100000),
            HomeCount::Additional,
            BuyerResidency::Resident,
            &schedules().uk_stamp_duty,
        );
        assert_eq!(tax, Decimal::ZERO);
    }

    #[test]
    fn test_uk_first_time_buyer_relief() {
        // 420k first home: (420k - 300k) * 5%
        let tax = uk_stamp_duty(
            dec!(420000),
            HomeCount::First,
            BuyerResidency::Resident,
            &schedules().uk_stamp_duty,
        );
        assert_eq!(tax, dec!(6000));
    }

    #[test]
    fn test_uk_first_time_buyer_below_nil_band() {
        let tax = uk_stamp_duty(
            dec!(280000),
            HomeCount::First,
            BuyerResidency::Resident,
            &schedules().uk_stamp_duty,
        );
        assert_eq!(tax, Decimal::ZERO);
    }

    #[test]
    fn test_uk_first_home_above_cap_uses_standard_bands() {
        // 600k first home: relief cap exceeded, standard bands without surcharge
        // 125000*0.02 + 350000*0.05 = 2,500 + 17,500
        let tax = uk_stamp_duty(
            dec!(600000),
            HomeCount::First,
            BuyerResidency::Resident,
            &schedules().uk_stamp_duty,
        );
        assert_eq!(tax, dec!(20000));
    }

    #[test]
    fn test_uk_relief_keeps_non_resident_surcharge() {
        // (420k - 300k) * (5% + 2%)
        let tax = uk_stamp_duty(
            dec!(420000),
            HomeCount::First,
            BuyerResidency::NonResident,
            &schedules().uk_stamp_duty,
        );
        assert_eq!(tax, dec!(8400));
    }

    #[test]
    fn test_uk_top_band() {
        // 2m additional resident:
        // 125000*0.05 + 675000*0.08 + 575000*0.13 + 500000*0.15
        let tax = uk_stamp_duty(
            dec!(2000000),
            HomeCount::Additional,
            BuyerResidency::Resident,
            &schedules().uk_stamp_duty,
        );
        assert_eq!(tax, dec!(6250) + dec!(54000) + dec!(74750) + dec!(75000));
    }

    #[test]
    fn test_flat_duties() {
        let s = schedules();
        assert_eq!(
            purchase_tax(
                Country::Uae,
                dec!(2000000),
                HomeCount::First,
                BuyerResidency::Resident,
                &s
            ),
            dec!(80000)
        );
        assert_eq!(
            purchase_tax(
                Country::Thailand,
                dec!(5000000),
                HomeCount::First,
                BuyerResidency::Resident,
                &s
            ),
            dec!(100000)
        );
        assert_eq!(
            purchase_tax(
                Country::Japan,
                dec!(50000000),
                HomeCount::First,
                BuyerResidency::Resident,
                &s
            ),
            dec!(500000)
        );
    }

    #[test]
    fn test_gov_fees_floor_and_proportional() {
        let s = schedules();
        // UK: 0.4% of 750k beats the 1,650 floor
        assert_eq!(government_admin_fees(Country::Uk, dec!(750000), &s), dec!(3000));
        // UK: floor wins at 300k (0.4% = 1,200)
        assert_eq!(government_admin_fees(Country::Uk, dec!(300000), &s), dec!(1650));
        // UAE: trustee + admin floor (4,580) beats 0.15% of 2m (3,000)
        assert_eq!(
            government_admin_fees(Country::Uae, dec!(2000000), &s),
            dec!(4580)
        );
        assert_eq!(
            government_admin_fees(Country::Thailand, dec!(1000000), &s),
            dec!(25000)
        );
        // JP: 0.15% of 100m beats the 120,000 floor
        assert_eq!(
            government_admin_fees(Country::Japan, dec!(100000000), &s),
            dec!(150000)
        );
    }
}
