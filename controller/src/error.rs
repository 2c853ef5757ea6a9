// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use thiserror::Error as DError;

#[derive(Debug, Clone, PartialEq, DError)]
pub enum ErrorKind {
    #[error("Couldn't found rating of movie({0}) for user({1})")]
    NotFoundRating(i32, i32),

    #[error("Rating must be between {min} and {max}, got {value}")]
    InvalidRating { value: String, min: i32, max: i32 },

    #[error("Couldn't reach the store ({0})")]
    StoreConnectivity(String),

    #[error("Store schema is missing or invalid ({0})")]
    StoreSchema(String),
}
