//! Shared record types for the LightBnB data-access layer.
//!
//! This crate defines the rows the store hands back (users, property
//! listings, reservations) and the parameter structs callers build to insert
//! new rows or search listings. It carries no database code, so the web layer
//! can depend on it without pulling in SQLite.
//!
//! Monetary amounts are integer minor units (cents) everywhere.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

mod property;
mod search;

pub use property::{NewProperty, PropertyListing};
pub use search::{SearchOptions, DEFAULT_RESULT_LIMIT};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal database ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login email, unique across users.
    pub email: String,
    /// Stored password hash. Hashing is the caller's responsibility.
    #[serde(skip_serializing)]
    pub password: String,
}

/// Parameters for registering a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A stored reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Internal database ID.
    pub id: i64,
    /// The reserved property.
    pub property_id: i64,
    /// The user who made the reservation.
    pub guest_id: i64,
    /// First night of the stay.
    pub start_date: NaiveDate,
    /// Checkout day. Always after `start_date`.
    pub end_date: NaiveDate,
}

/// Parameters for booking a property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    pub property_id: i64,
    pub guest_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A guest's reservation joined with the property it books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestReservation {
    /// Reservation ID.
    pub id: i64,
    pub guest_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// The reserved property, with its current average rating.
    pub property: PropertyListing,
}

/// Parameters for reviewing a stay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub guest_id: i64,
    pub property_id: i64,
    pub reservation_id: i64,
    /// Score from 1 to 5.
    pub rating: u8,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_password_is_not_serialized() {
        let user = User {
            id: 7,
            name: "Devin Sanders".to_string(),
            email: "tristanjacobs@gmail.com".to_string(),
            password: "$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.".to_string(),
        };

        let json = serde_json::to_value(&user).expect("user should serialize");
        assert_eq!(json["email"], "tristanjacobs@gmail.com");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn reservation_dates_serialize_as_iso_8601() {
        let reservation = Reservation {
            id: 1,
            property_id: 2,
            guest_id: 3,
            start_date: NaiveDate::from_ymd_opt(2018, 9, 11).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2018, 9, 26).expect("valid date"),
        };

        let json = serde_json::to_value(&reservation).expect("reservation should serialize");
        assert_eq!(json["start_date"], "2018-09-11");
        assert_eq!(json["end_date"], "2018-09-26");
    }
}
