use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DbConfig;

/// Builds the pool without connecting; each query acquires a connection on
/// demand and returns it when done.
pub fn connect_lazy(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_lazy(&cfg.url)
        .context("parse DATABASE_URL")
}
