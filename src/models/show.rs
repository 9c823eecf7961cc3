use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use std::collections::BTreeSet;

use crate::{error::ReservationError, services::seats::normalize_seats};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Base price per seat, used by flat pricing and as the last tiered fallback.
    #[serde(default)]
    pub price: Option<f64>,
    /// Raw row-designator -> price mapping as stored; parsed by the pricing engine.
    #[serde(default)]
    pub pricing: Option<serde_json::Value>,
    #[serde(default)]
    pub booked_seats: BTreeSet<String>,
}

impl Show {
    pub fn new(id: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            price,
            pricing: None,
            booked_seats: BTreeSet::new(),
        }
    }

    pub fn with_pricing(mut self, pricing: serde_json::Value) -> Self {
        self.pricing = Some(pricing);
        self
    }

    /// Brings externally loaded booked seats to canonical form, so that a
    /// seeded `" a1"` and a requested `A1` are the same seat.
    pub fn normalized(mut self) -> Result<Self, ReservationError> {
        if !self.booked_seats.is_empty() {
            let booked: Vec<&String> = self.booked_seats.iter().collect();
            let seats = normalize_seats(&booked)?;
            self.booked_seats = seats.iter().cloned().collect();
        }
        Ok(self)
    }

    pub fn booked_seats_vec(&self) -> Vec<String> {
        self.booked_seats.iter().cloned().collect()
    }
}

// Строка таблицы shows
#[derive(Debug, FromRow)]
pub(crate) struct ShowRow {
    pub id: String,
    pub title: String,
    pub price: Option<f64>,
    pub pricing: Option<Json<serde_json::Value>>,
    pub booked_seats: Vec<String>,
}

impl From<ShowRow> for Show {
    fn from(row: ShowRow) -> Self {
        Show {
            id: row.id,
            title: row.title,
            price: row.price,
            pricing: row.pricing.map(|Json(value)| value),
            booked_seats: row.booked_seats.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_canonicalizes_booked_seats() {
        let mut show = Show::new("s1", None);
        show.booked_seats = ["a1", " b2", "A1"].iter().map(|s| s.to_string()).collect();

        let show = show.normalized().unwrap();
        assert_eq!(show.booked_seats_vec(), vec!["A1", "B2"]);
    }

    #[test]
    fn normalized_rejects_blank_booked_seats() {
        let mut show = Show::new("s1", None);
        show.booked_seats.insert("  ".to_string());

        assert!(matches!(
            show.normalized(),
            Err(ReservationError::InvalidInput(_))
        ));
    }
}
