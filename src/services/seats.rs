use std::collections::BTreeSet;

use crate::{error::ReservationError, models::SeatSet};

/// Trims and upper-cases every token, collapsing duplicates.
///
/// Fails on an empty request or on a token that is blank once trimmed.
pub fn normalize_seats<S: AsRef<str>>(raw: &[S]) -> Result<SeatSet, ReservationError> {
    if raw.is_empty() {
        return Err(ReservationError::InvalidInput(
            "at least one seat is required".to_string(),
        ));
    }

    let mut seats = BTreeSet::new();
    for token in raw {
        let seat = token.as_ref().trim();
        if seat.is_empty() {
            return Err(ReservationError::InvalidInput(
                "seat identifiers must not be blank".to_string(),
            ));
        }
        seats.insert(seat.to_uppercase());
    }

    Ok(SeatSet::from_normalized(seats))
}
