use super::valuation_model::{DerivedValue, ValuationSettings};

/// Value `settings.grams` of silver at `silver_usd_per_oz`, converted at `rate`.
///
/// ounces = grams / grams_per_troy_ounce
/// commodity_usd = ounces * price
/// local_no_surcharge = commodity_usd * rate
/// local_with_surcharge = local_no_surcharge * (1 + surcharge_rate)
pub fn calculate_derived_value(
    silver_usd_per_oz: f64,
    rate: f64,
    settings: &ValuationSettings,
) -> DerivedValue {
    let commodity_usd = settings.troy_ounces() * silver_usd_per_oz;
    let local_no_surcharge = commodity_usd * rate;
    let local_with_surcharge = local_no_surcharge * (1.0 + settings.surcharge_rate);

    DerivedValue {
        commodity_usd,
        local_no_surcharge,
        local_with_surcharge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected ~{}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_reference_valuation() {
        // At a price equal to the grams-per-ounce constant, 9.6 g is worth $9.60.
        let settings = ValuationSettings::default();
        let value = calculate_derived_value(31.1034768, 3.7, &settings);

        assert_close(value.commodity_usd, 9.6);
        assert_close(value.local_no_surcharge, 35.52);
        assert_close(value.local_with_surcharge, 41.9136);
    }

    #[test]
    fn test_surcharge_identity() {
        let settings = ValuationSettings::default();
        for (price, rate) in [(24.31, 3.71), (31.5, 1.0), (0.01, 150.0)] {
            let value = calculate_derived_value(price, rate, &settings);
            assert_eq!(
                value.local_with_surcharge,
                value.local_no_surcharge * (1.0 + settings.surcharge_rate)
            );
            assert!(value.local_with_surcharge > value.local_no_surcharge);
        }
    }

    #[test]
    fn test_ounce_of_silver_at_unit_rate() {
        let settings = ValuationSettings {
            grams: 31.1034768,
            surcharge_rate: 0.0,
            ..Default::default()
        };
        let value = calculate_derived_value(24.0, 1.0, &settings);
        assert!((value.commodity_usd - 24.0).abs() < 1e-12);
        assert_eq!(value.local_with_surcharge, value.local_no_surcharge);
    }
}
