// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use serde::{Deserialize, Serialize};

/// One rating event: a user's rating of a titled movie.
///
/// `avr_rating` is denormalized, it holds the mean of every `rating` whose
/// title contains this record's title (case-insensitive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub genre: String,
    pub rating: i32,
    pub year: String,
    pub runtime: String,
    pub avr_rating: f64,
}

// To insert a new rating event, the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewRatingRecord {
    pub user_id: i32,
    pub title: String,
    pub genre: String,
    pub rating: i32,
    pub year: String,
    pub runtime: String,
    pub avr_rating: f64,
}

impl NewRatingRecord {
    /// Copy the movie description of `template` for a new rating by `user_id`.
    pub fn from_template(template: &RatingRecord, user_id: i32, rating: i32) -> Self {
        Self {
            user_id,
            title: template.title.clone(),
            genre: template.genre.clone(),
            rating,
            year: template.year.clone(),
            runtime: template.runtime.clone(),
            avr_rating: template.avr_rating,
        }
    }

    pub fn with_id(self, id: i32) -> RatingRecord {
        RatingRecord {
            id,
            user_id: self.user_id,
            title: self.title,
            genre: self.genre,
            rating: self.rating,
            year: self.year,
            runtime: self.runtime,
            avr_rating: self.avr_rating,
        }
    }
}
