//! Pool-backed handle over the data-access functions.

use lightbnb_db::DbPool;
use lightbnb_types::{
    GuestReservation, NewProperty, NewReservation, NewReview, NewUser, PropertyListing,
    Reservation, SearchOptions, User, DEFAULT_RESULT_LIMIT,
};
use rusqlite::Connection;

use crate::error::StoreError;
use crate::{properties, reservations, users};

/// The store client handed to request handlers.
///
/// Every method checks out one pooled connection for the duration of the
/// call and returns it on drop. Cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct Store {
    pool: DbPool,
}

impl Store {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Runs `f` on a pooled connection, logging failures under `operation`.
    fn with_conn<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let result = self
            .pool
            .get()
            .map_err(StoreError::from)
            .and_then(|conn| f(&conn));

        match &result {
            Err(StoreError::Validation(e)) => {
                tracing::debug!(operation, error = %e, "store input rejected");
            }
            Err(StoreError::NotFound { entity, id }) => {
                tracing::debug!(operation, entity, id, "referenced row missing");
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "store operation failed");
            }
            Ok(_) => {}
        }
        result
    }

    /// Checks that a connection can be checked out and used.
    pub fn ping(&self) -> Result<(), StoreError> {
        self.with_conn("ping", |conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.with_conn("get_user_by_email", |conn| {
            users::get_user_by_email(conn, email)
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.with_conn("get_user_by_id", |conn| users::get_user_by_id(conn, id))
    }

    pub fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        self.with_conn("create_user", |conn| users::create_user(conn, user))
    }

    /// Lists a guest's reservations. `limit` defaults to
    /// [`DEFAULT_RESULT_LIMIT`].
    pub fn list_reservations_for_guest(
        &self,
        guest_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<GuestReservation>, StoreError> {
        let limit = limit.unwrap_or(DEFAULT_RESULT_LIMIT);
        self.with_conn("list_reservations_for_guest", |conn| {
            reservations::list_reservations_for_guest(conn, guest_id, limit)
        })
    }

    pub fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Reservation, StoreError> {
        self.with_conn("create_reservation", |conn| {
            reservations::create_reservation(conn, reservation)
        })
    }

    pub fn add_review(&self, review: &NewReview) -> Result<i64, StoreError> {
        self.with_conn("add_review", |conn| reservations::add_review(conn, review))
    }

    /// Searches listings. `limit` defaults to [`DEFAULT_RESULT_LIMIT`].
    pub fn search_properties(
        &self,
        options: &SearchOptions,
        limit: Option<u32>,
    ) -> Result<Vec<PropertyListing>, StoreError> {
        let limit = limit.unwrap_or(DEFAULT_RESULT_LIMIT);
        self.with_conn("search_properties", |conn| {
            properties::search_properties(conn, options, limit)
        })
    }

    pub fn get_property(&self, id: i64) -> Result<Option<PropertyListing>, StoreError> {
        self.with_conn("get_property", |conn| properties::get_property(conn, id))
    }

    pub fn create_property(&self, property: &NewProperty) -> Result<PropertyListing, StoreError> {
        self.with_conn("create_property", |conn| {
            properties::create_property(conn, property)
        })
    }
}
