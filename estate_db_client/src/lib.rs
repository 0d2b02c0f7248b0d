//! Postgres queries for the estate marketplace, one module per query.
//!
//! All dynamic WHERE composition goes through
//! [estate_filters::ListingPredicate::push_sql], which binds every value.
//! The engagement counter updates are single conditional statements so they
//! stay correct under concurrent requests; see `estate::increment_view` and
//! `estate::toggle_like`.

pub mod estate;
pub mod review;
pub mod user;

/// The schema migrations, embedded from `migrations/`.
pub static MIGRATIONS: sqlx::migrate::Migrator = sqlx::migrate!();
