// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::schema::movies;
use controller::{NewRatingRecord, RatingRecord};
use diesel::prelude::*;

// To query data from the database
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = movies)]
pub struct Movie {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub genre: String,
    pub rating: i32,
    pub year: String,
    pub runtime: String,
    pub avr_rating: f64,
}

impl From<Movie> for RatingRecord {
    fn from(movie: Movie) -> Self {
        RatingRecord {
            id: movie.id,
            user_id: movie.user_id,
            title: movie.title,
            genre: movie.genre,
            rating: movie.rating,
            year: movie.year,
            runtime: movie.runtime,
            avr_rating: movie.avr_rating,
        }
    }
}

// To insert a new rating event into the database
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = movies)]
pub struct NewMovie<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub genre: &'a str,
    pub rating: i32,
    pub year: &'a str,
    pub runtime: &'a str,
    pub avr_rating: f64,
}

impl<'a> From<&'a NewRatingRecord> for NewMovie<'a> {
    fn from(record: &'a NewRatingRecord) -> Self {
        NewMovie {
            user_id: record.user_id,
            title: &record.title,
            genre: &record.genre,
            rating: record.rating,
            year: &record.year,
            runtime: &record.runtime,
            avr_rating: record.avr_rating,
        }
    }
}
