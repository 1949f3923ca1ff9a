//! Data-access layer for LightBnB.
//!
//! Looks up and inserts users, properties, reservations and reviews, and
//! searches property listings with optional filters. Every operation exists
//! in two forms:
//!
//! - a free function taking a borrowed [`rusqlite::Connection`], for callers
//!   that already hold a connection or a transaction;
//! - a method on [`Store`], which checks a connection out of the pool for the
//!   duration of the call and logs failures.
//!
//! Failures are always returned as [`StoreError`]. "Nothing matched" is an
//! `Ok` value (`None` or an empty `Vec`), never an error.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lightbnb_store::Store;
//! use lightbnb_types::SearchOptions;
//!
//! let store = Store::new(pool);
//! let listings = store.search_properties(
//!     &SearchOptions::default().city("Vancouver").minimum_rating(4.0),
//!     Some(5),
//! )?;
//! ```

mod error;
mod properties;
mod query;
mod reservations;
mod store;
mod users;

pub use error::{StoreError, ValidationError};
pub use properties::{create_property, get_property, search_properties};
pub use query::{RenderedQuery, SearchQuery, SqlParam};
pub use reservations::{add_review, create_reservation, list_reservations_for_guest};
pub use store::Store;
pub use users::{create_user, get_user_by_email, get_user_by_id};

/// Opens a transaction that holds the write lock from `BEGIN`.
///
/// Read-then-write transactions must start this way: a deferred one cannot
/// upgrade its read lock while another writer is active and fails with
/// `SQLITE_BUSY` without honoring the busy timeout.
pub(crate) fn begin_write(
    conn: &rusqlite::Connection,
) -> rusqlite::Result<rusqlite::Transaction<'_>> {
    rusqlite::Transaction::new_unchecked(conn, rusqlite::TransactionBehavior::Immediate)
}
