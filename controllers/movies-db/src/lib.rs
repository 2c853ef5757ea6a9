// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod error;
pub mod models;
pub mod schema;

use crate::error::{pool_error, store_error};
use crate::models::{Movie, NewMovie};
use crate::schema::movies;
use config::DatabaseConfig;
use controller::{Controller, MovieFilter, NewRatingRecord, RatingRecord, Result, Store};
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::dsl::sql;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sql_types::{Double, Nullable, Text};
use std::time::Duration;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

diesel::define_sql_function!(fn lower(x: Text) -> Text);

/// `ILIKE` pattern matching any value that contains `value`
fn contains_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    /// Build the pool without connecting, sessions fail individually while the
    /// database is unreachable.
    pub fn connect(config: &DatabaseConfig) -> Self {
        let manager = ConnectionManager::<PgConnection>::new(config.url.as_str());
        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .build_unchecked(manager);

        log::info!(
            "Database pool for {} with max_size: {}",
            config.url.split('@').last().unwrap_or("unknown_host"),
            config.pool_size
        );

        Self { pool }
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create the movies table and its indexes when they don't exist
    pub fn ensure_schema(&self) -> Result<()> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        diesel::sql_query(schema::CREATE_MOVIES_TABLE)
            .execute(&mut *conn)
            .map_err(store_error)?;
        for statement in schema::CREATE_MOVIES_INDEXES {
            diesel::sql_query(*statement)
                .execute(&mut *conn)
                .map_err(store_error)?;
        }

        Ok(())
    }
}

impl Store for PgStore {
    type Controller = PgController;

    fn open(&self) -> Result<Self::Controller> {
        let conn = self.pool.get().map_err(pool_error)?;
        Ok(PgController { conn })
    }
}

pub struct PgController {
    conn: DbConnection,
}

impl PgController {
    fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}

impl Controller for PgController {
    fn movies_by(&mut self, filter: &MovieFilter) -> Result<Vec<RatingRecord>> {
        let mut query = movies::table.into_boxed();

        if let Some(title) = &filter.title {
            query = query.filter(movies::title.ilike(contains_pattern(title)));
        }
        if let Some(genre) = &filter.genre {
            query = query.filter(movies::genre.ilike(contains_pattern(genre)));
        }
        if let Some(year) = &filter.year {
            query = query.filter(movies::year.ilike(contains_pattern(year)));
        }

        log::debug!("Loading movies matching {}", filter);
        let movies = query
            .order(movies::id.asc())
            .load::<Movie>(self.conn())
            .map_err(store_error)?;

        Ok(movies.into_iter().map(Into::into).collect())
    }

    fn average_rating(&mut self, title: &str) -> Result<Option<f64>> {
        let avg = movies::table
            .filter(movies::title.ilike(contains_pattern(title)))
            .select(sql::<Nullable<Double>>("AVG(rating)::float8"))
            .get_result::<Option<f64>>(self.conn())
            .map_err(store_error)?;

        Ok(avg)
    }

    fn top_rated(&mut self, user_id: Option<i32>, limit: usize) -> Result<Vec<RatingRecord>> {
        let mut query = movies::table.into_boxed();

        if let Some(user_id) = user_id {
            query = query.filter(movies::user_id.eq(user_id));
        }

        let movies = query
            .order((movies::avr_rating.desc(), movies::id.asc()))
            .limit(limit as i64)
            .load::<Movie>(self.conn())
            .map_err(store_error)?;

        Ok(movies.into_iter().map(Into::into).collect())
    }

    fn rating_for(&mut self, movie_id: i32, user_id: i32) -> Result<Option<RatingRecord>> {
        let movie = movies::table
            .filter(movies::id.eq(movie_id))
            .filter(movies::user_id.eq(user_id))
            .first::<Movie>(self.conn())
            .optional()
            .map_err(store_error)?;

        Ok(movie.map(Into::into))
    }

    fn set_rating(&mut self, id: i32, rating: i32) -> Result<RatingRecord> {
        let movie = diesel::update(movies::table.find(id))
            .set(movies::rating.eq(rating))
            .get_result::<Movie>(self.conn())
            .map_err(store_error)?;

        Ok(movie.into())
    }

    fn insert_rating(&mut self, record: &NewRatingRecord) -> Result<RatingRecord> {
        let movie = diesel::insert_into(movies::table)
            .values(&NewMovie::from(record))
            .get_result::<Movie>(self.conn())
            .map_err(store_error)?;

        Ok(movie.into())
    }

    fn refresh_average(&mut self, title: &str, avr_rating: f64) -> Result<usize> {
        let updated = diesel::update(movies::table.filter(lower(movies::title).eq(lower(title))))
            .set(movies::avr_rating.eq(avr_rating))
            .execute(self.conn())
            .map_err(store_error)?;

        Ok(updated)
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        <AnsiTransactionManager as TransactionManager<PgConnection>>::begin_transaction(self.conn())
            .map_err(store_error)?;

        match f(self) {
            Ok(value) => {
                <AnsiTransactionManager as TransactionManager<PgConnection>>::commit_transaction(
                    self.conn(),
                )
                .map_err(store_error)?;
                Ok(value)
            }

            Err(e) => {
                if let Err(rollback) =
                    <AnsiTransactionManager as TransactionManager<PgConnection>>::rollback_transaction(
                        self.conn(),
                    )
                {
                    log::error!("Failed to roll back transaction: {}", rollback);
                }
                Err(e)
            }
        }
    }
}
