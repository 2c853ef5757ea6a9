// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod error;
pub mod response;
pub mod routes;

use controller::Store;
use std::sync::Arc;
use tokio::task;

pub use error::ApiError;
pub use routes::{app, router};

pub const API_PREFIX: &str = "/api/v1";

pub struct AppState<S> {
    store: Arc<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store> AppState<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Open a session on a blocking thread and run `f` with it, the session is
    /// released when `f` returns or fails.
    pub async fn with_controller<T, F>(&self, f: F) -> controller::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut S::Controller) -> controller::Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || {
            let mut controller = store.open()?;
            f(&mut controller)
        })
        .await?
    }
}
