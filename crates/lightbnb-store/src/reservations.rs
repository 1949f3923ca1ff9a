//! Reservations and the reviews guests leave for them.

use lightbnb_types::{GuestReservation, NewReservation, NewReview, Reservation};
use rusqlite::{params, Connection};

use crate::begin_write;
use crate::error::{require_limit, StoreError, ValidationError};
use crate::properties::listing_from_row;
use crate::query::LISTING_COLUMNS;
use crate::users::user_exists;

/// Returns up to `limit` of a guest's reservations, earliest stay first,
/// each joined with the reserved property and its average rating.
///
/// # Errors
///
/// Returns `StoreError::Validation` for a zero limit and
/// `StoreError::Database` on SQL failure.
pub fn list_reservations_for_guest(
    conn: &Connection,
    guest_id: i64,
    limit: u32,
) -> Result<Vec<GuestReservation>, StoreError> {
    require_limit(limit)?;

    let sql = format!(
        "SELECT reservations.id, reservations.guest_id, reservations.start_date,
                reservations.end_date, {LISTING_COLUMNS}
         FROM reservations
         JOIN properties ON reservations.property_id = properties.id
         LEFT JOIN property_reviews ON properties.id = property_reviews.property_id
         WHERE reservations.guest_id = ?1
         GROUP BY reservations.id
         ORDER BY reservations.start_date ASC, reservations.id ASC
         LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![guest_id, limit], |row| {
        Ok(GuestReservation {
            id: row.get(0)?,
            guest_id: row.get(1)?,
            start_date: row.get(2)?,
            end_date: row.get(3)?,
            property: listing_from_row(row, 4)?,
        })
    })?;

    let mut reservations = Vec::new();
    for row in rows {
        reservations.push(row?);
    }
    Ok(reservations)
}

/// Books a property for a guest.
///
/// # Errors
///
/// Returns `StoreError::Validation` unless the stay ends after it starts,
/// `StoreError::NotFound` if the guest or the property does not exist, and
/// `StoreError::Database` on SQL failure.
pub fn create_reservation(
    conn: &Connection,
    reservation: &NewReservation,
) -> Result<Reservation, StoreError> {
    if reservation.end_date <= reservation.start_date {
        return Err(ValidationError::InvalidDateRange {
            start: reservation.start_date,
            end: reservation.end_date,
        }
        .into());
    }

    let tx = begin_write(conn)?;

    if !user_exists(&tx, reservation.guest_id)? {
        return Err(StoreError::NotFound {
            entity: "user",
            id: reservation.guest_id,
        });
    }
    let property_exists: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM properties WHERE id = ?1)",
        [reservation.property_id],
        |row| row.get(0),
    )?;
    if !property_exists {
        return Err(StoreError::NotFound {
            entity: "property",
            id: reservation.property_id,
        });
    }

    let id: i64 = tx.query_row(
        "INSERT INTO reservations (start_date, end_date, property_id, guest_id)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id",
        params![
            reservation.start_date,
            reservation.end_date,
            reservation.property_id,
            reservation.guest_id,
        ],
        |row| row.get(0),
    )?;
    tx.commit()?;

    tracing::info!(
        reservation_id = id,
        property_id = reservation.property_id,
        guest_id = reservation.guest_id,
        "reservation created"
    );

    Ok(Reservation {
        id,
        property_id: reservation.property_id,
        guest_id: reservation.guest_id,
        start_date: reservation.start_date,
        end_date: reservation.end_date,
    })
}

/// Records a guest's review of a stay and returns the review ID.
///
/// The reservation must belong to the reviewing guest and the reviewed
/// property.
///
/// # Errors
///
/// Returns `StoreError::Validation` for a rating outside 1–5,
/// `StoreError::NotFound` if no matching reservation exists, and
/// `StoreError::Database` on SQL failure.
pub fn add_review(conn: &Connection, review: &NewReview) -> Result<i64, StoreError> {
    if !(1..=5).contains(&review.rating) {
        return Err(ValidationError::RatingOutOfRange(review.rating).into());
    }

    let tx = begin_write(conn)?;

    let reservation_matches: bool = tx.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM reservations
            WHERE id = ?1 AND guest_id = ?2 AND property_id = ?3
        )",
        params![review.reservation_id, review.guest_id, review.property_id],
        |row| row.get(0),
    )?;
    if !reservation_matches {
        return Err(StoreError::NotFound {
            entity: "reservation",
            id: review.reservation_id,
        });
    }

    let id: i64 = tx.query_row(
        "INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating, message)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id",
        params![
            review.guest_id,
            review.property_id,
            review.reservation_id,
            review.rating,
            review.message,
        ],
        |row| row.get(0),
    )?;
    tx.commit()?;

    Ok(id)
}
