//! Property listings: search, lookup and creation.

use lightbnb_types::{NewProperty, PropertyListing, SearchOptions};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::begin_write;
use crate::error::{require, require_limit, StoreError, ValidationError};
use crate::query::{SearchQuery, LISTING_COLUMNS};
use crate::users::user_exists;

/// Maps the [`LISTING_COLUMNS`] of `row`, starting at column `offset`.
pub(crate) fn listing_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<PropertyListing> {
    Ok(PropertyListing {
        id: row.get(offset)?,
        owner_id: row.get(offset + 1)?,
        title: row.get(offset + 2)?,
        description: row.get(offset + 3)?,
        thumbnail_photo_url: row.get(offset + 4)?,
        cover_photo_url: row.get(offset + 5)?,
        cost_per_night: row.get(offset + 6)?,
        parking_spaces: row.get(offset + 7)?,
        number_of_bathrooms: row.get(offset + 8)?,
        number_of_bedrooms: row.get(offset + 9)?,
        country: row.get(offset + 10)?,
        street: row.get(offset + 11)?,
        city: row.get(offset + 12)?,
        province: row.get(offset + 13)?,
        post_code: row.get(offset + 14)?,
        active: row.get(offset + 15)?,
        average_rating: row.get(offset + 16)?,
    })
}

/// Returns up to `limit` listings matching every present filter in
/// `options`, cheapest first.
///
/// # Errors
///
/// Returns `StoreError::Validation` for a zero limit and
/// `StoreError::Database` on SQL failure. No match is `Ok(vec![])`.
pub fn search_properties(
    conn: &Connection,
    options: &SearchOptions,
    limit: u32,
) -> Result<Vec<PropertyListing>, StoreError> {
    require_limit(limit)?;

    let query = SearchQuery::new(options, limit).render();
    tracing::debug!(sql = %query.sql, params = ?query.params, "searching properties");

    let mut stmt = conn.prepare(&query.sql)?;
    let rows = stmt.query_map(params_from_iter(query.params.iter()), |row| {
        listing_from_row(row, 0)
    })?;

    let mut listings = Vec::new();
    for row in rows {
        listings.push(row?);
    }
    Ok(listings)
}

/// Looks up one listing by ID, with its average rating.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn get_property(conn: &Connection, id: i64) -> Result<Option<PropertyListing>, StoreError> {
    let sql = format!(
        "SELECT {LISTING_COLUMNS}
         FROM properties
         LEFT JOIN property_reviews ON properties.id = property_reviews.property_id
         WHERE properties.id = ?1
         GROUP BY properties.id"
    );
    let listing = conn
        .query_row(&sql, [id], |row| listing_from_row(row, 0))
        .optional()?;
    Ok(listing)
}

/// Lists a new property for an existing owner and returns it as stored.
///
/// The owner check, the insert and the read-back run in one transaction.
///
/// # Errors
///
/// Returns `StoreError::Validation` for blank required fields or a
/// non-positive price, `StoreError::NotFound` if the owner does not exist,
/// and `StoreError::Database` on SQL failure.
pub fn create_property(
    conn: &Connection,
    property: &NewProperty,
) -> Result<PropertyListing, StoreError> {
    validate_property(property)?;

    let tx = begin_write(conn)?;

    if !user_exists(&tx, property.owner_id)? {
        return Err(StoreError::NotFound {
            entity: "user",
            id: property.owner_id,
        });
    }

    let id: i64 = tx.query_row(
        "INSERT INTO properties (
            owner_id, title, description, thumbnail_photo_url, cover_photo_url,
            cost_per_night, street, city, province, post_code, country,
            parking_spaces, number_of_bathrooms, number_of_bedrooms
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        RETURNING id",
        params![
            property.owner_id,
            property.title,
            property.description,
            property.thumbnail_photo_url,
            property.cover_photo_url,
            property.cost_per_night,
            property.street,
            property.city,
            property.province,
            property.post_code,
            property.country,
            property.parking_spaces,
            property.number_of_bathrooms,
            property.number_of_bedrooms,
        ],
        |row| row.get(0),
    )?;

    let listing = get_property(&tx, id)?.ok_or(StoreError::NotFound {
        entity: "property",
        id,
    })?;
    tx.commit()?;

    tracing::info!(property_id = id, owner_id = property.owner_id, "property created");
    Ok(listing)
}

fn validate_property(property: &NewProperty) -> Result<(), ValidationError> {
    require("title", &property.title)?;
    require("thumbnail_photo_url", &property.thumbnail_photo_url)?;
    require("cover_photo_url", &property.cover_photo_url)?;
    require("street", &property.street)?;
    require("city", &property.city)?;
    require("province", &property.province)?;
    require("post_code", &property.post_code)?;
    require("country", &property.country)?;
    if property.cost_per_night <= 0 {
        return Err(ValidationError::NotPositive {
            field: "cost_per_night",
            value: property.cost_per_night,
        });
    }
    Ok(())
}
