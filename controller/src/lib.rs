// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod error;
pub mod filter;
#[cfg(any(test, feature = "test-controller"))]
pub mod memory;
pub mod rating;
pub mod record;

use anyhow::Error;

pub use error::ErrorKind;
pub use filter::MovieFilter;
pub use rating::{parse_rating, update_rating, validate_rating, RATING_RANGE};
pub use record::{NewRatingRecord, RatingRecord};

pub type Result<T> = std::result::Result<T, Error>;

/// Number of records returned by the top rated queries
pub const TOP_LIMIT: usize = 5;

/// A session over the table of rating events.
///
/// Implementors report store failures as [`ErrorKind::StoreConnectivity`] or
/// [`ErrorKind::StoreSchema`] wrapped in the returned error.
pub trait Controller {
    /// Get every record that matches all the filters present in `filter`
    fn movies_by(&mut self, filter: &MovieFilter) -> Result<Vec<RatingRecord>>;

    /// Mean of `rating` over records whose title contains `title`, `None` if there's none
    fn average_rating(&mut self, title: &str) -> Result<Option<f64>>;

    /// Records ordered by `avr_rating` descending, optionally only those of one user
    fn top_rated(&mut self, user_id: Option<i32>, limit: usize) -> Result<Vec<RatingRecord>>;

    /// Get the record with id `movie_id` rated by `user_id`
    fn rating_for(&mut self, movie_id: i32, user_id: i32) -> Result<Option<RatingRecord>>;

    /// Overwrite the rating of an existing record
    fn set_rating(&mut self, id: i32, rating: i32) -> Result<RatingRecord>;

    /// Append a new rating event
    fn insert_rating(&mut self, record: &NewRatingRecord) -> Result<RatingRecord>;

    /// Store `avr_rating` on every record titled `title` (ignoring case), returns the affected count
    fn refresh_average(&mut self, title: &str, avr_rating: f64) -> Result<usize>;

    /// Run `f` atomically, changes are discarded if it fails
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>;
}

/// Hands out one [`Controller`] session per unit of work, the session is
/// released when dropped.
pub trait Store: Send + Sync + 'static {
    type Controller: Controller;

    fn open(&self) -> Result<Self::Controller>;
}
