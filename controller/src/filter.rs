// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::record::RatingRecord;
use serde::Deserialize;
use std::fmt::{self, Display};

/// Optional filters for listing movies, every present filter must match.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
}

impl MovieFilter {
    pub fn title(title: &str) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn genre(genre: &str) -> Self {
        Self {
            genre: Some(genre.into()),
            ..Default::default()
        }
    }

    pub fn year(year: &str) -> Self {
        Self {
            year: Some(year.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.genre.is_none() && self.year.is_none()
    }

    pub fn matches(&self, record: &RatingRecord) -> bool {
        let field = |filter: &Option<String>, value: &str| match filter {
            Some(needle) => contains(value, needle),
            None => true,
        };

        field(&self.title, &record.title)
            && field(&self.genre, &record.genre)
            && field(&self.year, &record.year)
    }
}

/// Case-insensitive substring test, the matching rule for titles, genres and years.
pub fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive equality, two records with the same title describe the same movie.
pub fn same_title(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl Display for MovieFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "all");
        }

        let parts = [
            ("title", &self.title),
            ("genre", &self.genre),
            ("year", &self.year),
        ];

        let mut first = true;
        for (key, val) in parts.iter() {
            if let Some(val) = val {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{}({})", key, val)?;
                first = false;
            }
        }

        Ok(())
    }
}
