// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use controller::RatingRecord;
use serde::{Deserialize, Serialize};

/// Round to one decimal place, halves go away from zero
pub fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSchema {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub genre: String,
    pub year: String,
    pub runtime: String,
    pub rating: i32,
    pub avr_rating: f64,
}

impl From<RatingRecord> for MovieSchema {
    fn from(record: RatingRecord) -> Self {
        MovieSchema {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            genre: record.genre,
            year: record.year,
            runtime: record.runtime,
            rating: record.rating,
            avr_rating: round_rating(record.avr_rating),
        }
    }
}

/// Order formatted records by `(avr_rating, lowercase title)` ascending and
/// reverse the result, so equal averages list titles from last to first.
pub fn rank_top_five(mut movies: Vec<MovieSchema>) -> Vec<MovieSchema> {
    movies.sort_by(|a, b| {
        a.avr_rating
            .total_cmp(&b.avr_rating)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
    movies.reverse();
    movies
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieResponse {
    pub message: String,
    pub data: Vec<MovieSchema>,
}

impl MovieResponse {
    pub fn new(message: impl Into<String>, records: Vec<RatingRecord>) -> Self {
        Self {
            message: message.into(),
            data: records.into_iter().map(MovieSchema::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRatingResponse {
    pub message: String,
    pub data: MovieSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}
