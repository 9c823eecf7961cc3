//! Расчёт стоимости мест.
//!
//! Flat mode: seat count × base price. Tiered mode: per-row price looked up by
//! the seat's first character, falling back to `DEFAULT`, then the base price,
//! then zero. The mode is chosen by whether the show carries a usable pricing map.

use serde_json::Value;
use std::collections::HashMap;

use crate::models::{SeatSet, Show};

pub const DEFAULT_KEY: &str = "DEFAULT";

/// Parsed per-row price table.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    rows: HashMap<String, f64>,
    default: Option<f64>,
}

impl PricingConfig {
    /// Returns `None` when the stored value is not an object with at least one
    /// non-negative numeric entry; such shows are priced flat.
    pub fn from_value(value: &Value) -> Option<Self> {
        let entries = value.as_object()?;

        let mut rows = HashMap::new();
        let mut default = None;
        for (key, price) in entries {
            let Some(price) = price.as_f64().filter(|p| p.is_finite() && *p >= 0.0) else {
                continue;
            };
            let key = key.trim().to_uppercase();
            if key == DEFAULT_KEY {
                default = Some(price);
            } else if !key.is_empty() {
                rows.insert(key, price);
            }
        }

        if rows.is_empty() && default.is_none() {
            return None;
        }
        Some(Self { rows, default })
    }

    fn seat_price(&self, seat: &str, base_price: Option<f64>) -> f64 {
        let row: String = seat.chars().take(1).collect();
        self.rows
            .get(&row)
            .copied()
            .or(self.default)
            .or(base_price)
            .unwrap_or(0.0)
    }
}

pub fn compute_total(pricing: Option<&PricingConfig>, base_price: Option<f64>, seats: &SeatSet) -> f64 {
    let base_price = base_price.filter(|p| p.is_finite() && *p >= 0.0);
    match pricing {
        Some(config) => seats
            .iter()
            .map(|seat| config.seat_price(seat, base_price))
            .sum(),
        None => seats.len() as f64 * base_price.unwrap_or(0.0),
    }
}

/// Prices `seats` against the show as returned by the claim.
pub fn price_for_show(show: &Show, seats: &SeatSet) -> f64 {
    let config = show.pricing.as_ref().and_then(PricingConfig::from_value);
    compute_total(config.as_ref(), show.price, seats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seats::normalize_seats;
    use serde_json::json;

    #[test]
    fn flat_mode_multiplies_base_price() {
        let seats = normalize_seats(&["A1", "A2", "B1"]).unwrap();
        assert_eq!(compute_total(None, Some(200.0), &seats), 600.0);
    }

    #[test]
    fn flat_mode_without_price_is_free() {
        let seats = normalize_seats(&["A1", "A2"]).unwrap();
        assert_eq!(compute_total(None, None, &seats), 0.0);
    }

    #[test]
    fn tiered_mode_uses_row_then_default() {
        let config = PricingConfig::from_value(&json!({"A": 1500, "B": 1200, "DEFAULT": 1000})).unwrap();
        let seats = normalize_seats(&["A1", "B5", "C9"]).unwrap();
        assert_eq!(compute_total(Some(&config), Some(200.0), &seats), 3700.0);
    }

    #[test]
    fn tiered_mode_falls_back_to_base_then_zero() {
        let config = PricingConfig::from_value(&json!({"A": 1500})).unwrap();
        let seats = normalize_seats(&["A1", "C9"]).unwrap();
        assert_eq!(compute_total(Some(&config), Some(300.0), &seats), 1800.0);
        assert_eq!(compute_total(Some(&config), None, &seats), 1500.0);
    }

    #[test]
    fn row_keys_match_case_insensitively() {
        let config = PricingConfig::from_value(&json!({"a": 10, "default": 1})).unwrap();
        let seats = normalize_seats(&["a4", "z1"]).unwrap();
        assert_eq!(compute_total(Some(&config), None, &seats), 11.0);
    }

    #[test]
    fn unusable_config_means_flat_mode() {
        assert!(PricingConfig::from_value(&json!({})).is_none());
        assert!(PricingConfig::from_value(&json!("premium")).is_none());
        assert!(PricingConfig::from_value(&json!({"A": "cheap", "B": -5})).is_none());

        let show = Show::new("s1", Some(250.0)).with_pricing(json!([]));
        let seats = normalize_seats(&["A1", "B1"]).unwrap();
        assert_eq!(price_for_show(&show, &seats), 500.0);
    }

    #[test]
    fn same_input_same_total() {
        let show = Show::new("s1", Some(90.0)).with_pricing(json!({"A": 120.5, "DEFAULT": 80}));
        let seats = normalize_seats(&["A1", "A2", "K7"]).unwrap();
        assert_eq!(price_for_show(&show, &seats), price_for_show(&show, &seats));
        assert_eq!(price_for_show(&show, &seats), 321.0);
    }
}
