//! Queries against the `"User"` table, limited to the columns search and
//! notifications care about.

pub mod get_contact_details;
pub mod get_push_token;
pub mod get_search_profile;
pub mod mark_opened_app;
