//! Search filters for property listings.

use serde::{Deserialize, Serialize};

/// Number of rows returned when the caller does not ask for a limit.
pub const DEFAULT_RESULT_LIMIT: u32 = 10;

/// Optional filters for a property search.
///
/// Every field is optional; `None` means "no constraint". Present filters
/// are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Substring of the property's city. Blank strings are ignored.
    #[serde(default)]
    pub city: Option<String>,
    /// Only properties listed by this owner.
    #[serde(default)]
    pub owner_id: Option<i64>,
    /// Lowest acceptable nightly price, in minor units.
    #[serde(default)]
    pub minimum_price_per_night: Option<i64>,
    /// Highest acceptable nightly price, in minor units.
    #[serde(default)]
    pub maximum_price_per_night: Option<i64>,
    /// Lowest acceptable average review rating.
    #[serde(default)]
    pub minimum_rating: Option<f64>,
}

impl SearchOptions {
    /// Restricts results to cities containing `city`.
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn owner_id(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn minimum_price_per_night(mut self, cents: i64) -> Self {
        self.minimum_price_per_night = Some(cents);
        self
    }

    pub fn maximum_price_per_night(mut self, cents: i64) -> Self {
        self.maximum_price_per_night = Some(cents);
        self
    }

    pub fn minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// Returns the city filter if it is present and not blank.
    pub fn city_filter(&self) -> Option<&str> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_city_is_no_filter() {
        assert_eq!(SearchOptions::default().city("   ").city_filter(), None);
        assert_eq!(
            SearchOptions::default().city(" Vancouver ").city_filter(),
            Some("Vancouver")
        );
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let options: SearchOptions =
            serde_json::from_str(r#"{"minimum_rating": 4}"#).expect("should deserialize");
        assert_eq!(options, SearchOptions::default().minimum_rating(4.0));
    }
}
