//! Queries against the `"Review"` table.

pub mod delete_for_estate;
