//! Duty, fee and running-cost rate tables.
//!
//! Band boundaries and rates are domain parameters, not code: every table is
//! a serde-loadable value so rates can be updated without a release. The
//! `Default` impl carries the canonical MVP constants.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ValuationError;
use crate::types::{Country, Money, Rate};
use crate::GpcResult;

/// One marginal band of a progressive duty table.
///
/// `up_to` is the inclusive upper bound of the band; `None` marks the
/// open-ended top band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to: Option<Money>,
    pub rate: Rate,
}

/// First-time-buyer relief parameters (UK).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstTimeBuyerRelief {
    /// Relief applies only when the price does not exceed this cap
    pub price_cap: Money,
    /// Nil-rate slice under relief
    pub nil_band: Money,
    /// Flat rate on the slice between `nil_band` and `price_cap`
    pub rate: Rate,
}

/// UK stamp duty (SDLT): marginal bands plus buyer-profile surcharges.
///
/// Surcharges are added to the rate of every chargeable band; the nil-rate
/// slice stays uncharged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampDutyTable {
    pub bands: Vec<TaxBand>,
    pub additional_home_surcharge: Rate,
    pub non_resident_surcharge: Rate,
    pub first_time_buyer: FirstTimeBuyerRelief,
}

impl StampDutyTable {
    pub fn validate(&self) -> GpcResult<()> {
        if self.bands.is_empty() {
            return Err(ValuationError::InvalidSchedule(
                "stamp duty table has no bands".into(),
            ));
        }
        let mut prev: Option<Money> = None;
        for (i, band) in self.bands.iter().enumerate() {
            if band.rate < Decimal::ZERO || band.rate > Decimal::ONE {
                return Err(ValuationError::InvalidSchedule(format!(
                    "band {i} rate {} outside [0, 1]",
                    band.rate
                )));
            }
            match band.up_to {
                Some(upper) => {
                    if i == self.bands.len() - 1 {
                        return Err(ValuationError::InvalidSchedule(
                            "last band must be open-ended".into(),
                        ));
                    }
                    if let Some(p) = prev {
                        if upper <= p {
                            return Err(ValuationError::InvalidSchedule(format!(
                                "band {i} upper bound {upper} does not ascend past {p}"
                            )));
                        }
                    }
                    prev = Some(upper);
                }
                None => {
                    if i != self.bands.len() - 1 {
                        return Err(ValuationError::InvalidSchedule(format!(
                            "band {i} is open-ended but not last"
                        )));
                    }
                }
            }
        }
        if self.additional_home_surcharge < Decimal::ZERO
            || self.non_resident_surcharge < Decimal::ZERO
        {
            return Err(ValuationError::InvalidSchedule(
                "surcharges must be non-negative".into(),
            ));
        }
        let ftb = &self.first_time_buyer;
        if ftb.nil_band > ftb.price_cap {
            return Err(ValuationError::InvalidSchedule(
                "first-time-buyer nil band exceeds the relief price cap".into(),
            ));
        }
        if ftb.rate < Decimal::ZERO || ftb.rate > Decimal::ONE {
            return Err(ValuationError::InvalidSchedule(format!(
                "first-time-buyer rate {} outside [0, 1]",
                ftb.rate
            )));
        }
        Ok(())
    }
}

/// `max(minimum, price * rate)` estimator for government / solicitor /
/// administrative fees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub minimum: Money,
    pub rate: Rate,
}

/// Price-proportional estimate with a floor and a ceiling (UK council tax).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TieredCostSchedule {
    pub rate: Rate,
    pub floor: Money,
    pub ceiling: Money,
}

/// Owner-occupied running-cost parameters for one market. Absent estimators
/// produce zero for that line item (MVP simplification, not missing data).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunningCostSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub council_tax: Option<TieredCostSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilities_flat: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_tax_rate: Option<Rate>,
}

/// Full rate configuration for every supported market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedules {
    pub uk_stamp_duty: StampDutyTable,
    /// UAE DLD transfer fee
    pub uae_transfer_duty: Rate,
    /// Thailand transfer / registration estimate
    pub th_transfer_duty: Rate,
    /// Japan bundled acquisition / registration / stamp estimate
    pub jp_transfer_duty: Rate,
    pub uk_fees: FeeSchedule,
    pub uae_fees: FeeSchedule,
    pub th_fees: FeeSchedule,
    pub jp_fees: FeeSchedule,
    #[serde(default)]
    pub uk_running_costs: RunningCostSchedule,
    #[serde(default)]
    pub uae_running_costs: RunningCostSchedule,
    #[serde(default)]
    pub th_running_costs: RunningCostSchedule,
    #[serde(default)]
    pub jp_running_costs: RunningCostSchedule,
}

impl Schedules {
    pub fn fees(&self, country: Country) -> &FeeSchedule {
        match country {
            Country::Uk => &self.uk_fees,
            Country::Uae => &self.uae_fees,
            Country::Thailand => &self.th_fees,
            Country::Japan => &self.jp_fees,
        }
    }

    /// Flat transfer duty for the non-UK markets.
    pub fn transfer_duty(&self, country: Country) -> Option<Rate> {
        match country {
            Country::Uk => None,
            Country::Uae => Some(self.uae_transfer_duty),
            Country::Thailand => Some(self.th_transfer_duty),
            Country::Japan => Some(self.jp_transfer_duty),
        }
    }

    pub fn running_costs(&self, country: Country) -> &RunningCostSchedule {
        match country {
            Country::Uk => &self.uk_running_costs,
            Country::Uae => &self.uae_running_costs,
            Country::Thailand => &self.th_running_costs,
            Country::Japan => &self.jp_running_costs,
        }
    }

    pub fn validate(&self) -> GpcResult<()> {
        self.uk_stamp_duty.validate()?;
        for (name, duty) in [
            ("uae_transfer_duty", self.uae_transfer_duty),
            ("th_transfer_duty", self.th_transfer_duty),
            ("jp_transfer_duty", self.jp_transfer_duty),
        ] {
            if duty < Decimal::ZERO || duty > Decimal::ONE {
                return Err(ValuationError::InvalidSchedule(format!(
                    "{name} {duty} outside [0, 1]"
                )));
            }
        }
        for (name, fee) in [
            ("uk_fees", &self.uk_fees),
            ("uae_fees", &self.uae_fees),
            ("th_fees", &self.th_fees),
            ("jp_fees", &self.jp_fees),
        ] {
            if fee.minimum < Decimal::ZERO || fee.rate < Decimal::ZERO {
                return Err(ValuationError::InvalidSchedule(format!(
                    "{name} has a negative minimum or rate"
                )));
            }
        }
        for (name, rc) in [
            ("uk_running_costs", &self.uk_running_costs),
            ("uae_running_costs", &self.uae_running_costs),
            ("th_running_costs", &self.th_running_costs),
            ("jp_running_costs", &self.jp_running_costs),
        ] {
            if let Some(ct) = &rc.council_tax {
                if ct.floor > ct.ceiling || ct.rate < Decimal::ZERO {
                    return Err(ValuationError::InvalidSchedule(format!(
                        "{name} council tax floor/ceiling/rate inconsistent"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for Schedules {
    fn default() -> Self {
        Self {
            // Standard residential SDLT bands:
            // 0% to 125k, 2% to 250k, 5% to 925k, 10% to 1.5m, 12% above
            uk_stamp_duty: StampDutyTable {
                bands: vec![
                    TaxBand {
                        up_to: Some(dec!(125000)),
                        rate: Decimal::ZERO,
                    },
                    TaxBand {
                        up_to: Some(dec!(250000)),
                        rate: dec!(0.02),
                    },
                    TaxBand {
                        up_to: Some(dec!(925000)),
                        rate: dec!(0.05),
                    },
                    TaxBand {
                        up_to: Some(dec!(1500000)),
                        rate: dec!(0.10),
                    },
                    TaxBand {
                        up_to: None,
                        rate: dec!(0.12),
                    },
                ],
                additional_home_surcharge: dec!(0.03),
                non_resident_surcharge: dec!(0.02),
                first_time_buyer: FirstTimeBuyerRelief {
                    price_cap: dec!(500000),
                    nil_band: dec!(300000),
                    rate: dec!(0.05),
                },
            },
            uae_transfer_duty: dec!(0.04),
            th_transfer_duty: dec!(0.02),
            jp_transfer_duty: dec!(0.01),
            uk_fees: FeeSchedule {
                minimum: dec!(1650),
                rate: dec!(0.004),
            },
            // DLD trustee 4,000 + admin 580
            uae_fees: FeeSchedule {
                minimum: dec!(4580),
                rate: dec!(0.0015),
            },
            th_fees: FeeSchedule {
                minimum: dec!(25000),
                rate: dec!(0.002),
            },
            jp_fees: FeeSchedule {
                minimum: dec!(120000),
                rate: dec!(0.0015),
            },
            uk_running_costs: RunningCostSchedule {
                council_tax: Some(TieredCostSchedule {
                    rate: dec!(0.005),
                    floor: dec!(1200),
                    ceiling: dec!(3000),
                }),
                utilities_flat: Some(dec!(2000)),
                property_tax_rate: None,
            },
            uae_running_costs: RunningCostSchedule::default(),
            th_running_costs: RunningCostSchedule::default(),
            jp_running_costs: RunningCostSchedule::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedules_validate() {
        Schedules::default().validate().unwrap();
    }

    #[test]
    fn test_descending_bands_rejected() {
        let mut schedules = Schedules::default();
        schedules.uk_stamp_duty.bands[1].up_to = Some(dec!(100000));
        assert!(matches!(
            schedules.validate(),
            Err(ValuationError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn test_closed_last_band_rejected() {
        let mut schedules = Schedules::default();
        schedules.uk_stamp_duty.bands.last_mut().unwrap().up_to = Some(dec!(9000000));
        assert!(schedules.validate().is_err());
    }

    #[test]
    fn test_negative_surcharge_rejected() {
        let mut schedules = Schedules::default();
        schedules.uk_stamp_duty.additional_home_surcharge = dec!(-0.01);
        assert!(schedules.validate().is_err());
    }

    #[test]
    fn test_out_of_range_duty_rejected() {
        let mut schedules = Schedules::default();
        schedules.th_transfer_duty = dec!(1.5);
        assert!(schedules.validate().is_err());
    }

    #[test]
    fn test_schedules_round_trip_json() {
        let schedules = Schedules::default();
        let json = serde_json::to_string(&schedules).unwrap();
        let back: Schedules = serde_json::from_str(&json).unwrap();
        back.validate().unwrap();
        assert_eq!(back.uk_stamp_duty.bands.len(), 5);
    }
}
