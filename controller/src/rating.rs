// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use crate::record::{NewRatingRecord, RatingRecord};
use crate::{Controller, Result};
use std::ops::RangeInclusive;

pub const RATING_RANGE: RangeInclusive<i32> = 1..=5;

pub fn validate_rating(rating: i64) -> std::result::Result<i32, ErrorKind> {
    let (min, max) = (*RATING_RANGE.start(), *RATING_RANGE.end());
    if (i64::from(min)..=i64::from(max)).contains(&rating) {
        Ok(rating as i32)
    } else {
        Err(ErrorKind::InvalidRating {
            value: rating.to_string(),
            min,
            max,
        })
    }
}

/// Read a rating as given in a request path. Anything that is not an integer
/// in [`RATING_RANGE`], however large, is an `InvalidRating`.
pub fn parse_rating(raw: &str) -> std::result::Result<i32, ErrorKind> {
    let rating = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ErrorKind::InvalidRating {
            value: raw.to_string(),
            min: *RATING_RANGE.start(),
            max: *RATING_RANGE.end(),
        })?;
    validate_rating(rating)
}

/// Record a new rating of `movie_id` by `user_id`.
///
/// The existing record takes the new rating and a copy of it is appended as a
/// new event, then the average of the title is recomputed over the updated
/// rows and written back to every row of that title. Returns the appended
/// record.
///
/// Concurrent updates of the same title are not serialized here, the average
/// is only as consistent as the store's isolation level makes it.
pub fn update_rating<C: Controller>(
    controller: &mut C,
    movie_id: i32,
    user_id: i32,
    rating: i32,
) -> Result<RatingRecord> {
    let rating = validate_rating(i64::from(rating))?;

    controller.transaction(|controller| {
        let existing = controller
            .rating_for(movie_id, user_id)?
            .ok_or(ErrorKind::NotFoundRating(movie_id, user_id))?;

        let existing = controller.set_rating(existing.id, rating)?;
        let mut inserted =
            controller.insert_rating(&NewRatingRecord::from_template(&existing, user_id, rating))?;

        let avr_rating = controller
            .average_rating(&existing.title)?
            .unwrap_or(rating as f64);
        let refreshed = controller.refresh_average(&existing.title, avr_rating)?;

        log::debug!(
            "Rating of movie({}) for user({}) is now {}, average of '{}' is {} over {} rows",
            movie_id,
            user_id,
            rating,
            existing.title,
            avr_rating,
            refreshed
        );

        inserted.avr_rating = avr_rating;
        Ok(inserted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::{MovieFilter, Store};
    use anyhow::Error;
    use assert_approx_eq::assert_approx_eq;

    fn seeded() -> Result<MemoryStore> {
        let store = MemoryStore::new();
        let mut controller = store.open()?;
        controller.insert_rating(&new_record(1, "Inception", 4))?;
        controller.insert_rating(&new_record(2, "Inception", 2))?;
        controller.insert_rating(&new_record(2, "Heat", 5))?;
        Ok(store)
    }

    fn new_record(user_id: i32, title: &str, rating: i32) -> NewRatingRecord {
        NewRatingRecord {
            user_id,
            title: title.into(),
            genre: "Drama".into(),
            rating,
            year: "2010".into(),
            runtime: "120 min".into(),
            avr_rating: rating as f64,
        }
    }

    #[test]
    fn valid_ratings_are_accepted() {
        for rating in RATING_RANGE {
            assert_eq!(validate_rating(i64::from(rating)), Ok(rating));
        }
    }

    #[test]
    fn out_of_range_ratings_are_rejected() {
        for rating in [-3, 0, 6, 100, 99_999_999_999].iter() {
            assert_eq!(
                validate_rating(*rating),
                Err(ErrorKind::InvalidRating {
                    value: rating.to_string(),
                    min: 1,
                    max: 5
                })
            );
        }
    }

    #[test]
    fn path_ratings_are_parsed_before_narrowing() {
        assert_eq!(parse_rating("3"), Ok(3));
        assert_eq!(parse_rating(" 5"), Ok(5));
        for raw in ["0", "6", "-1", "99999999999", "99999999999999999999", "four", ""].iter() {
            assert_eq!(
                parse_rating(raw),
                Err(ErrorKind::InvalidRating {
                    value: raw.to_string(),
                    min: 1,
                    max: 5
                })
            );
        }
    }

    #[test]
    fn update_returns_the_requested_rating() -> std::result::Result<(), Error> {
        for rating in RATING_RANGE {
            let store = seeded()?;
            let mut controller = store.open()?;

            let updated = update_rating(&mut controller, 1, 1, rating)?;
            assert_eq!(updated.rating, rating);
            assert_eq!(updated.user_id, 1);
            assert_eq!(updated.title, "Inception");
        }

        Ok(())
    }

    #[test]
    fn update_appends_a_copy_and_mutates_the_original() -> std::result::Result<(), Error> {
        let store = seeded()?;
        let mut controller = store.open()?;

        let updated = update_rating(&mut controller, 1, 1, 1)?;
        assert_eq!(updated.id, 4);
        assert_eq!(updated.genre, "Drama");
        assert_eq!(updated.year, "2010");
        assert_eq!(updated.runtime, "120 min");

        let original = controller.rating_for(1, 1)?.expect("original row is kept");
        assert_eq!(original.rating, 1);

        let rows = controller.movies_by(&MovieFilter::title("inception"))?;
        assert_eq!(rows.len(), 3);

        Ok(())
    }

    #[test]
    fn average_is_recomputed_after_the_writes() -> std::result::Result<(), Error> {
        let store = seeded()?;
        let mut controller = store.open()?;

        // Inception ratings become 5 (mutated), 2 and 5 (appended)
        let updated = update_rating(&mut controller, 1, 1, 5)?;
        assert_approx_eq!(updated.avr_rating, 4.0);

        for row in controller.movies_by(&MovieFilter::title("Inception"))? {
            assert_approx_eq!(row.avr_rating, 4.0);
        }

        let heat = controller.movies_by(&MovieFilter::title("heat"))?;
        assert_approx_eq!(heat[0].avr_rating, 5.0);

        Ok(())
    }

    #[test]
    fn refresh_leaves_titles_containing_the_updated_one_alone() -> std::result::Result<(), Error> {
        let store = MemoryStore::new();
        let mut controller = store.open()?;
        controller.insert_rating(&new_record(1, "Alien", 1))?;
        controller.insert_rating(&new_record(2, "Aliens", 5))?;

        // The average still spans "Aliens", the write-back does not
        let updated = update_rating(&mut controller, 1, 1, 1)?;
        assert_approx_eq!(updated.avr_rating, 7.0 / 3.0);

        for row in store.records() {
            if row.title == "Aliens" {
                assert_eq!(row.rating, 5);
                assert_approx_eq!(row.avr_rating, 5.0);
            } else {
                assert_approx_eq!(row.avr_rating, 7.0 / 3.0);
            }
        }

        Ok(())
    }

    #[test]
    fn missing_record_is_not_found_and_nothing_changes() -> std::result::Result<(), Error> {
        let store = seeded()?;
        let mut controller = store.open()?;

        let err = update_rating(&mut controller, 1, 0, 4).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErrorKind>(),
            Some(&ErrorKind::NotFoundRating(1, 0))
        );
        assert_eq!(controller.movies_by(&MovieFilter::default())?.len(), 3);

        Ok(())
    }

    #[test]
    fn invalid_rating_leaves_the_store_untouched() -> std::result::Result<(), Error> {
        let store = seeded()?;
        let mut controller = store.open()?;
        let before = controller.movies_by(&MovieFilter::default())?;

        let err = update_rating(&mut controller, 1, 1, 0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ErrorKind>(),
            Some(ErrorKind::InvalidRating { value, .. }) if value == "0"
        ));
        assert_eq!(controller.movies_by(&MovieFilter::default())?, before);

        Ok(())
    }
}
