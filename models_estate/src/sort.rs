use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// The closed set of sort orders accepted by listing endpoints.
///
/// Parsed once at the boundary; anything unrecognized becomes [Newest]
/// rather than an error.
///
/// [Newest]: SortOption::Newest
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    EnumString,
    Display,
)]
pub enum SortOption {
    /// most recently created first (default)
    #[default]
    #[serde(rename = "newest")]
    #[strum(serialize = "newest")]
    Newest,
    /// oldest first
    #[serde(rename = "oldest")]
    #[strum(serialize = "oldest")]
    Oldest,
    /// title ascending
    #[serde(rename = "a-z")]
    #[strum(serialize = "a-z")]
    TitleAsc,
    /// title descending
    #[serde(rename = "z-a")]
    #[strum(serialize = "z-a")]
    TitleDesc,
}

impl SortOption {
    /// parse a query parameter, defaulting to [SortOption::Newest] on
    /// anything missing or unrecognized
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}
