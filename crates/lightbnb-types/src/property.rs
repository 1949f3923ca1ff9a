//! Property listing records.

use serde::{Deserialize, Serialize};

/// A property as returned by searches and reservation listings.
///
/// `average_rating` is not stored; the store computes it from
/// `property_reviews` at query time and leaves it `None` for properties
/// nobody has reviewed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListing {
    /// Internal database ID.
    pub id: i64,
    /// The user who lists the property.
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly price in minor units.
    pub cost_per_night: i64,
    pub parking_spaces: u32,
    pub number_of_bathrooms: u32,
    pub number_of_bedrooms: u32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    /// Inactive listings are kept for existing reservations.
    pub active: bool,
    pub average_rating: Option<f64>,
}

/// Parameters for listing a new property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly price in minor units.
    pub cost_per_night: i64,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: u32,
    pub number_of_bathrooms: u32,
    pub number_of_bedrooms: u32,
}
