// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::{
    ApiError, Prefix, NO_MOVIE_FOUND, NO_MOVIE_MATCH, NO_USER_FOUND, RATING_OUT_OF_RANGE,
};
use crate::response::{rank_top_five, MovieResponse, MovieSchema, UpdateRatingResponse};
use crate::{AppState, API_PREFIX};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use controller::{parse_rating, update_rating, Controller, MovieFilter, Store, TOP_LIMIT};

pub fn router<S: Store>(state: AppState<S>) -> Router {
    Router::new()
        .route("/movies", get(list_movies::<S>))
        .route("/movies/top_five/total_user", get(top_five_all_users::<S>))
        .route("/movies/top_five/:user_id", get(top_five_for_user::<S>))
        .route(
            "/movies/user_rating/:movie_id/:user_id/:rating",
            put(update_user_rating::<S>),
        )
        .with_state(state)
}

/// The whole service, mounted under [`API_PREFIX`]
pub fn app<S: Store>(store: S) -> Router {
    Router::new().nest(API_PREFIX, router(AppState::new(store)))
}

async fn list_movies<S: Store>(
    State(state): State<AppState<S>>,
    Query(filter): Query<MovieFilter>,
) -> Result<Json<MovieResponse>, ApiError> {
    log::info!("Listing movies for {}", filter);

    let movies = state
        .with_controller(move |c| c.movies_by(&filter))
        .await
        .map_err(|e| ApiError::from_store(e, Prefix::BadRequest, NO_MOVIE_MATCH))?;

    if movies.is_empty() {
        return Err(ApiError::not_found(NO_MOVIE_MATCH));
    }

    Ok(Json(MovieResponse::new(
        "Movie data retrieved from database",
        movies,
    )))
}

async fn top_five_all_users<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<MovieResponse>, ApiError> {
    log::info!("Top five movies for all users");

    let movies = state
        .with_controller(|c| c.top_rated(None, TOP_LIMIT))
        .await
        .map_err(|e| ApiError::from_store(e, Prefix::BadRequest, NO_MOVIE_FOUND))?;

    if movies.is_empty() {
        return Err(ApiError::not_found(NO_MOVIE_FOUND));
    }

    Ok(Json(MovieResponse {
        message: "Top five average rated movies for all users retrieved from database".into(),
        data: rank_top_five(movies.into_iter().map(MovieSchema::from).collect()),
    }))
}

async fn top_five_for_user<S: Store>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<i32>,
) -> Result<Json<MovieResponse>, ApiError> {
    log::info!("Top five movies for user({})", user_id);

    let movies = state
        .with_controller(move |c| c.top_rated(Some(user_id), TOP_LIMIT))
        .await
        .map_err(|e| ApiError::from_store(e, Prefix::InternalServerError, NO_USER_FOUND))?;

    if movies.is_empty() {
        return Err(ApiError::not_found(NO_USER_FOUND));
    }

    Ok(Json(MovieResponse {
        message: format!(
            "Top five average rated movies for {} retrieved from database",
            user_id
        ),
        data: rank_top_five(movies.into_iter().map(MovieSchema::from).collect()),
    }))
}

async fn update_user_rating<S: Store>(
    State(state): State<AppState<S>>,
    Path((movie_id, user_id, rating)): Path<(i32, i32, String)>,
) -> Result<Json<UpdateRatingResponse>, ApiError> {
    let rating = match parse_rating(&rating) {
        Ok(rating) => rating,
        Err(e) => {
            log::warn!("Rejected rating of movie({}) for user({}): {}", movie_id, user_id, e);
            return Err(ApiError::new(StatusCode::BAD_REQUEST, RATING_OUT_OF_RANGE));
        }
    };

    log::info!(
        "Updating rating of movie({}) for user({}) to {}",
        movie_id,
        user_id,
        rating
    );

    let record = state
        .with_controller(move |c| update_rating(c, movie_id, user_id, rating))
        .await
        .map_err(|e| ApiError::from_store(e, Prefix::InternalServerError, NO_USER_FOUND))?;

    Ok(Json(UpdateRatingResponse {
        message: format!(
            "Rating value has changed for USER-ID: {} and MOVIE-ID: {}",
            user_id, movie_id
        ),
        data: record.into(),
    }))
}
