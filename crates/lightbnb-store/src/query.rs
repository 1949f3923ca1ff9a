//! Parametrized SQL for property searches.
//!
//! [`SearchQuery`] collects the present filters of a [`SearchOptions`] as an
//! ordered list of predicates, each carrying its own bind value. Rendering
//! walks that list once, so the N-th `?N` placeholder in the SQL always lines
//! up with the N-th entry of [`RenderedQuery::params`]. No caller value is
//! ever interpolated into the SQL text.

use lightbnb_types::SearchOptions;
use rusqlite::types::{ToSql, ToSqlOutput};

/// Columns selected for a [`PropertyListing`](lightbnb_types::PropertyListing),
/// ending with the aggregated rating. Requires `property_reviews` joined and
/// a `GROUP BY`.
pub(crate) const LISTING_COLUMNS: &str = "properties.id, properties.owner_id, properties.title, \
     properties.description, properties.thumbnail_photo_url, properties.cover_photo_url, \
     properties.cost_per_night, properties.parking_spaces, properties.number_of_bathrooms, \
     properties.number_of_bedrooms, properties.country, properties.street, properties.city, \
     properties.province, properties.post_code, properties.active, \
     avg(property_reviews.rating) AS average_rating";

/// A value bound to a numbered placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::Text(s) => ToSqlOutput::from(s.as_str()),
            SqlParam::Integer(i) => ToSqlOutput::from(*i),
            SqlParam::Real(f) => ToSqlOutput::from(*f),
        })
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        SqlParam::Text(s)
    }
}

impl From<i64> for SqlParam {
    fn from(i: i64) -> Self {
        SqlParam::Integer(i)
    }
}

impl From<u32> for SqlParam {
    fn from(i: u32) -> Self {
        SqlParam::Integer(i64::from(i))
    }
}

impl From<f64> for SqlParam {
    fn from(f: f64) -> Self {
        SqlParam::Real(f)
    }
}

/// SQL text plus its bind values, ready for `Connection::prepare`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    pub sql: String,
    /// `params[i]` binds to placeholder `?{i + 1}`.
    pub params: Vec<SqlParam>,
}

/// One `column operator ?N` comparison in the `WHERE` clause.
#[derive(Debug, Clone, PartialEq)]
struct Predicate {
    column: &'static str,
    operator: &'static str,
    value: SqlParam,
}

impl Predicate {
    fn render(&self, keyword: &str, placeholder: usize) -> String {
        let mut clause = format!("{keyword} {} {} ?{placeholder}", self.column, self.operator);
        if self.operator == "LIKE" {
            clause.push_str(&format!(" ESCAPE '{LIKE_ESCAPE}'"));
        }
        clause
    }
}

const LIKE_ESCAPE: char = '\\';

/// Wraps `text` as a `LIKE` pattern matching any value that contains it.
///
/// `%`, `_` and the escape character itself are escaped, so they match
/// literally.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// A property search waiting to be rendered.
///
/// Filters are taken in a fixed order: city, owner, minimum price, maximum
/// price. The rating filter compares against the aggregate, so it renders as
/// `HAVING` after the `GROUP BY`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    predicates: Vec<Predicate>,
    minimum_rating: Option<SqlParam>,
    limit: u32,
}

impl SearchQuery {
    pub fn new(options: &SearchOptions, limit: u32) -> Self {
        let mut predicates = Vec::new();

        if let Some(city) = options.city_filter() {
            predicates.push(Predicate {
                column: "properties.city",
                operator: "LIKE",
                value: SqlParam::Text(contains_pattern(city)),
            });
        }
        if let Some(owner_id) = options.owner_id {
            predicates.push(Predicate {
                column: "properties.owner_id",
                operator: "=",
                value: owner_id.into(),
            });
        }
        if let Some(cents) = options.minimum_price_per_night {
            predicates.push(Predicate {
                column: "properties.cost_per_night",
                operator: ">=",
                value: cents.into(),
            });
        }
        if let Some(cents) = options.maximum_price_per_night {
            predicates.push(Predicate {
                column: "properties.cost_per_night",
                operator: "<=",
                value: cents.into(),
            });
        }

        Self {
            predicates,
            minimum_rating: options.minimum_rating.map(SqlParam::from),
            limit,
        }
    }

    pub fn render(&self) -> RenderedQuery {
        let mut sql = format!(
            "SELECT {LISTING_COLUMNS}\n\
             FROM properties\n\
             LEFT JOIN property_reviews ON properties.id = property_reviews.property_id"
        );
        let mut params = Vec::with_capacity(self.predicates.len() + 2);

        for predicate in &self.predicates {
            let keyword = join_keyword(params.len());
            params.push(predicate.value.clone());
            push_clause(&mut sql, &predicate.render(keyword, params.len()));
        }

        push_clause(&mut sql, "GROUP BY properties.id");

        if let Some(rating) = &self.minimum_rating {
            params.push(rating.clone());
            push_clause(
                &mut sql,
                &format!("HAVING avg(property_reviews.rating) >= ?{}", params.len()),
            );
        }

        params.push(self.limit.into());
        push_clause(&mut sql, "ORDER BY properties.cost_per_night ASC, properties.id ASC");
        push_clause(&mut sql, &format!("LIMIT ?{}", params.len()));

        RenderedQuery { sql, params }
    }
}

/// `WHERE` opens the predicate list; everything bound after it joins with `AND`.
fn join_keyword(bound: usize) -> &'static str {
    if bound == 0 {
        "WHERE"
    } else {
        "AND"
    }
}

fn push_clause(sql: &mut String, clause: &str) {
    sql.push('\n');
    sql.push_str(clause);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Placeholder indexes in order of appearance.
    fn placeholders(sql: &str) -> Vec<usize> {
        let bytes = sql.as_bytes();
        let mut found = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'?' {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                found.push(sql[start..end].parse().expect("placeholder should be numbered"));
                i = end;
            } else {
                i += 1;
            }
        }
        found
    }

    fn clause_lines(sql: &str) -> Vec<&str> {
        sql.lines()
            .filter(|line| line.starts_with("WHERE ") || line.starts_with("AND "))
            .collect()
    }

    #[test]
    fn no_filters_binds_only_the_limit() {
        let rendered = SearchQuery::new(&SearchOptions::default(), 10).render();

        assert!(!rendered.sql.contains("WHERE"));
        assert!(!rendered.sql.contains("HAVING"));
        assert!(rendered.sql.contains("GROUP BY properties.id"));
        assert!(rendered.sql.ends_with("LIMIT ?1"));
        assert_eq!(rendered.params, vec![SqlParam::Integer(10)]);
    }

    #[test]
    fn city_filter_is_a_wildcard_match() {
        let options = SearchOptions::default().city("Vancouver");
        let rendered = SearchQuery::new(&options, 5).render();

        assert!(rendered
            .sql
            .contains("WHERE properties.city LIKE ?1 ESCAPE '\\'"));
        assert_eq!(
            rendered.params,
            vec![
                SqlParam::Text("%Vancouver%".to_string()),
                SqlParam::Integer(5)
            ]
        );
    }

    #[test]
    fn rating_filter_is_having_not_where() {
        let options = SearchOptions::default().minimum_rating(4.0);
        let rendered = SearchQuery::new(&options, 10).render();

        assert!(!rendered.sql.contains("WHERE"));
        assert!(rendered
            .sql
            .contains("GROUP BY properties.id\nHAVING avg(property_reviews.rating) >= ?1"));
        assert_eq!(
            rendered.params,
            vec![SqlParam::Real(4.0), SqlParam::Integer(10)]
        );
    }

    #[test]
    fn single_filter_uses_where() {
        let cases = [
            SearchOptions::default().city("Banff"),
            SearchOptions::default().owner_id(3),
            SearchOptions::default().minimum_price_per_night(5_000),
            SearchOptions::default().maximum_price_per_night(20_000),
        ];

        for options in cases {
            let rendered = SearchQuery::new(&options, 10).render();
            let clauses = clause_lines(&rendered.sql);
            assert_eq!(clauses.len(), 1, "{options:?}");
            assert!(clauses[0].starts_with("WHERE "), "{options:?}");
            assert!(clauses[0].contains(" ?1"), "{options:?}");
            assert_eq!(placeholders(&rendered.sql), vec![1, 2], "{options:?}");
        }
    }

    #[test]
    fn later_filters_join_with_and_in_fixed_order() {
        let options = SearchOptions::default()
            .maximum_price_per_night(30_000)
            .minimum_price_per_night(10_000)
            .owner_id(42)
            .city("Toronto");
        let rendered = SearchQuery::new(&options, 20).render();

        assert_eq!(
            clause_lines(&rendered.sql),
            vec![
                "WHERE properties.city LIKE ?1 ESCAPE '\\'",
                "AND properties.owner_id = ?2",
                "AND properties.cost_per_night >= ?3",
                "AND properties.cost_per_night <= ?4",
            ]
        );
        assert_eq!(
            rendered.params,
            vec![
                SqlParam::Text("%Toronto%".to_string()),
                SqlParam::Integer(42),
                SqlParam::Integer(10_000),
                SqlParam::Integer(30_000),
                SqlParam::Integer(20),
            ]
        );
    }

    #[test]
    fn numeric_filters_bind_plain_values() {
        let options = SearchOptions::default()
            .owner_id(1)
            .minimum_price_per_night(100)
            .minimum_rating(3.5);
        let rendered = SearchQuery::new(&options, 10).render();

        assert!(rendered
            .params
            .iter()
            .all(|param| !matches!(param, SqlParam::Text(_))));
    }

    #[test]
    fn placeholders_match_parameters_for_every_filter_combination() {
        for mask in 0u8..32 {
            let mut options = SearchOptions::default();
            if mask & 1 != 0 {
                options = options.city("Calgary");
            }
            if mask & 2 != 0 {
                options = options.owner_id(7);
            }
            if mask & 4 != 0 {
                options = options.minimum_price_per_night(1_000);
            }
            if mask & 8 != 0 {
                options = options.maximum_price_per_night(90_000);
            }
            if mask & 16 != 0 {
                options = options.minimum_rating(2.0);
            }

            let rendered = SearchQuery::new(&options, 10).render();
            let expected: Vec<usize> = (1..=rendered.params.len()).collect();
            assert_eq!(placeholders(&rendered.sql), expected, "mask {mask:#07b}");
        }
    }

    #[test]
    fn every_clause_starts_on_its_own_line() {
        let options = SearchOptions::default()
            .city("Whistler")
            .maximum_price_per_night(50_000)
            .minimum_rating(4.5);
        let rendered = SearchQuery::new(&options, 3).render();

        for keyword in ["FROM", "LEFT JOIN", "WHERE", "AND", "GROUP BY", "HAVING", "ORDER BY", "LIMIT"] {
            assert!(
                rendered.sql.contains(&format!("\n{keyword} ")),
                "{keyword} should start a new line in:\n{}",
                rendered.sql
            );
        }
    }

    #[test]
    fn rendering_is_repeatable() {
        let options = SearchOptions::default().city("Montreal").minimum_rating(3.0);
        let query = SearchQuery::new(&options, 10);

        assert_eq!(query.render(), query.render());
        assert_eq!(SearchQuery::new(&options, 10).render(), query.render());
    }

    #[test]
    fn blank_city_adds_no_predicate() {
        let rendered = SearchQuery::new(&SearchOptions::default().city("  "), 10).render();

        assert!(!rendered.sql.contains("WHERE"));
        assert_eq!(rendered.params, vec![SqlParam::Integer(10)]);
    }

    #[test]
    fn city_wildcards_are_escaped() {
        let cases = [
            ("%", r"%\%%"),
            ("B_nff", r"%B\_nff%"),
            (r"C:\cabins", r"%C:\\cabins%"),
            ("Vancouver", "%Vancouver%"),
        ];

        for (city, pattern) in cases {
            let rendered = SearchQuery::new(&SearchOptions::default().city(city), 10).render();
            assert_eq!(rendered.params[0], SqlParam::Text(pattern.to_string()), "{city}");
        }
    }
}
