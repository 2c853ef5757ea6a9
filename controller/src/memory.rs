// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

//! A store kept in process memory, for tests of code written against
//! [`Controller`]. It follows the same matching and ordering rules as the
//! database backed controllers.

use crate::error::ErrorKind;
use crate::filter::{contains, same_title, MovieFilter};
use crate::record::{NewRatingRecord, RatingRecord};
use crate::{Controller, Result, Store};
use anyhow::anyhow;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Failure {
    Unreachable,
    MissingTable,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<RatingRecord>,
    next_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<Mutex<Table>>,
    failure: Option<Failure>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// A store whose sessions can never be opened
    pub fn unreachable() -> Self {
        Self {
            failure: Some(Failure::Unreachable),
            ..Default::default()
        }
    }

    /// A store whose sessions fail every operation as if the table didn't exist
    pub fn without_table() -> Self {
        Self {
            failure: Some(Failure::MissingTable),
            ..Default::default()
        }
    }

    /// Insert rows as they are, keeping their ids and averages
    pub fn with_records(records: Vec<RatingRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            table: Arc::new(Mutex::new(Table {
                rows: records,
                next_id,
            })),
            failure: None,
        }
    }

    pub fn records(&self) -> Vec<RatingRecord> {
        self.table
            .lock()
            .map(|table| table.rows.clone())
            .unwrap_or_default()
    }
}

impl Store for MemoryStore {
    type Controller = MemoryController;

    fn open(&self) -> Result<Self::Controller> {
        if self.failure == Some(Failure::Unreachable) {
            return Err(ErrorKind::StoreConnectivity("memory store is unreachable".into()).into());
        }

        Ok(MemoryController {
            table: Arc::clone(&self.table),
            missing_table: self.failure == Some(Failure::MissingTable),
        })
    }
}

pub struct MemoryController {
    table: Arc<Mutex<Table>>,
    missing_table: bool,
}

impl MemoryController {
    fn table(&self) -> Result<MutexGuard<'_, Table>> {
        if self.missing_table {
            return Err(ErrorKind::StoreSchema("relation \"movies\" does not exist".into()).into());
        }

        self.table
            .lock()
            .map_err(|_| anyhow!("memory table lock poisoned"))
    }
}

impl Controller for MemoryController {
    fn movies_by(&mut self, filter: &MovieFilter) -> Result<Vec<RatingRecord>> {
        let table = self.table()?;
        Ok(table
            .rows
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }

    fn average_rating(&mut self, title: &str) -> Result<Option<f64>> {
        let table = self.table()?;
        let ratings: Vec<_> = table
            .rows
            .iter()
            .filter(|row| contains(&row.title, title))
            .map(|row| row.rating as f64)
            .collect();

        if ratings.is_empty() {
            return Ok(None);
        }

        Ok(Some(ratings.iter().sum::<f64>() / ratings.len() as f64))
    }

    fn top_rated(&mut self, user_id: Option<i32>, limit: usize) -> Result<Vec<RatingRecord>> {
        let table = self.table()?;
        let mut rows: Vec<_> = table
            .rows
            .iter()
            .filter(|row| user_id.map_or(true, |id| row.user_id == id))
            .cloned()
            .collect();

        rows.sort_by(|a, b| b.avr_rating.total_cmp(&a.avr_rating).then(a.id.cmp(&b.id)));
        rows.truncate(limit);
        Ok(rows)
    }

    fn rating_for(&mut self, movie_id: i32, user_id: i32) -> Result<Option<RatingRecord>> {
        let table = self.table()?;
        Ok(table
            .rows
            .iter()
            .find(|row| row.id == movie_id && row.user_id == user_id)
            .cloned())
    }

    fn set_rating(&mut self, id: i32, rating: i32) -> Result<RatingRecord> {
        let mut table = self.table()?;
        let row = table
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| anyhow!("no row with id({}) to update", id))?;

        row.rating = rating;
        Ok(row.clone())
    }

    fn insert_rating(&mut self, record: &NewRatingRecord) -> Result<RatingRecord> {
        let mut table = self.table()?;
        table.next_id += 1;

        let row = record.clone().with_id(table.next_id);
        table.rows.push(row.clone());
        Ok(row)
    }

    fn refresh_average(&mut self, title: &str, avr_rating: f64) -> Result<usize> {
        let mut table = self.table()?;
        let mut count = 0;
        for row in table.rows.iter_mut().filter(|row| same_title(&row.title, title)) {
            row.avr_rating = avr_rating;
            count += 1;
        }

        Ok(count)
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let snapshot = {
            let table = self.table()?;
            (table.rows.clone(), table.next_id)
        };

        let result = f(self);
        if result.is_err() {
            let mut table = self.table()?;
            table.rows = snapshot.0;
            table.next_id = snapshot.1;
        }

        result
    }
}
