pub mod config;
pub mod database;
pub mod error;
pub mod images;
pub mod models;
pub mod services;
pub mod web;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::images::ImageUrlBuilder;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub images: ImageUrlBuilder,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let images = ImageUrlBuilder::from_config(&config);
        Self {
            pool,
            config: Arc::new(config),
            images,
        }
    }
}
