// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::response::ErrorDetail;
use anyhow::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use controller::ErrorKind;

pub const RATING_OUT_OF_RANGE: &str = "Rating must be between 1 and 5";
pub const NO_MOVIE_MATCH: &str = "Not Found: Unable to find movie in Database";
pub const NO_MOVIE_FOUND: &str = "Not Found: No movie found in Database";
pub const NO_USER_FOUND: &str = "No user found in Database";

/// Leading words of store failure messages, they differ between route families
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Prefix {
    BadRequest,
    InternalServerError,
}

impl Prefix {
    fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::InternalServerError => "Internal Server Error",
        }
    }

    pub fn connectivity(self) -> String {
        format!(
            "{}: Connection to Database could not be established",
            self.as_str()
        )
    }

    pub fn schema(self) -> String {
        format!("{}: Movies table does not exist in Database", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    /// Translate a failed store call, `not_found` is the message for missing records
    pub fn from_store(err: Error, prefix: Prefix, not_found: &str) -> Self {
        match err.downcast_ref::<ErrorKind>() {
            Some(ErrorKind::NotFoundRating(..)) => Self::not_found(not_found),

            Some(ErrorKind::InvalidRating { .. }) => {
                Self::new(StatusCode::BAD_REQUEST, RATING_OUT_OF_RANGE)
            }

            Some(ErrorKind::StoreConnectivity(reason)) => {
                log::error!("Store unreachable: {}", reason);
                Self::new(StatusCode::BAD_REQUEST, prefix.connectivity())
            }

            Some(ErrorKind::StoreSchema(reason)) => {
                log::error!("Store schema error: {}", reason);
                Self::new(StatusCode::BAD_REQUEST, prefix.schema())
            }

            None => {
                log::error!("Unexpected failure: {:#}", err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorDetail {
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}
