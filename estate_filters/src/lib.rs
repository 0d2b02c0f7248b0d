#![deny(missing_docs)]
//! The filter compiler for listing queries.
//!
//! A [ListingFilters] bundle carries the optional inputs of a search
//! request; [ListingFilters::compile] turns it into a conjunctive
//! [ListingPredicate]. The discipline throughout is apply-if-present: an
//! omitted input never constrains its field, so leaving `bedrooms` unset
//! matches listings with any bedroom count, including zero.
//!
//! The predicate renders itself into a parameterized SQL fragment for the
//! store and can also be evaluated in memory, which is what the tests and
//! the mock store do.

use chrono::{DateTime, Utc};
use models_estate::{Category, Listing, ListingType, Pricing, RentFrequency};
use sqlx::{Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;


/// an unrecognized value arrived for a closed filter parameter
#[derive(Debug, Error, PartialEq)]
#[error("unknown value `{value}` for filter `{filter}`")]
pub struct UnknownFilterValue {
    /// the parameter name
    pub filter: &'static str,
    /// the offending value
    pub value: String,
}

/// Parse a `listingType` query parameter. The sentinel `all` (and absence)
/// mean "no constraint"; anything else must be a real listing type.
pub fn listing_type_filter(
    raw: Option<&str>,
) -> Result<Option<ListingType>, UnknownFilterValue> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim() == "all" || s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| UnknownFilterValue {
                filter: "listingType",
                value: s.to_string(),
            }),
    }
}

/// Parse a `category` query parameter, with the same `all` sentinel rule.
pub fn category_filter(raw: Option<&str>) -> Result<Option<Category>, UnknownFilterValue> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim() == "all" || s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| UnknownFilterValue {
                filter: "category",
                value: s.to_string(),
            }),
    }
}

/// Convert a boolean-ish query string: present means constrained, and only
/// the literal `true` counts as true.
pub fn boolish(raw: Option<&str>) -> Option<bool> {
    raw.map(|s| s == "true")
}

/// The optional inputs of a listing search, all apply-if-present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilters {
    /// constrain to sale or rent listings
    pub listing_type: Option<ListingType>,
    /// lower price bound, against the field matching `listing_type`
    pub min_price: Option<f64>,
    /// upper price bound, against the field matching `listing_type`
    pub max_price: Option<f64>,
    /// constrain the furnished flag
    pub furnished: Option<bool>,
    /// exact bedroom count
    pub bedrooms: Option<i32>,
    /// exact bathroom count
    pub bathrooms: Option<i32>,
    /// constrain the rental billing cadence
    pub rent_frequency: Option<RentFrequency>,
    /// available on or before this date
    pub available_before: Option<DateTime<Utc>>,
    /// constrain the category
    pub category: Option<Category>,
    /// case-insensitive title substring
    pub title_search: Option<String>,
    /// constrain to one owner's listings
    pub owner: Option<Uuid>,
}

impl ListingFilters {
    /// true when no input is set
    pub fn is_empty(&self) -> bool {
        let ListingFilters {
            listing_type,
            min_price,
            max_price,
            furnished,
            bedrooms,
            bathrooms,
            rent_frequency,
            available_before,
            category,
            title_search,
            owner,
        } = self;
        listing_type.is_none()
            && min_price.is_none()
            && max_price.is_none()
            && furnished.is_none()
            && bedrooms.is_none()
            && bathrooms.is_none()
            && rent_frequency.is_none()
            && available_before.is_none()
            && category.is_none()
            && title_search.is_none()
            && owner.is_none()
    }

    /// compile into a predicate that also excludes taken listings
    pub fn compile(&self) -> ListingPredicate {
        let mut clauses = vec![FilterClause::NotTaken];
        self.push_clauses(&mut clauses);
        ListingPredicate { clauses }
    }

    /// compile without the taken exclusion, used when listing a user's own
    /// ads where off-market entries still show
    pub fn compile_open(&self) -> ListingPredicate {
        let mut clauses = Vec::new();
        self.push_clauses(&mut clauses);
        ListingPredicate { clauses }
    }

    fn push_clauses(&self, clauses: &mut Vec<FilterClause>) {
        if let Some(t) = self.listing_type {
            clauses.push(FilterClause::ListingType(t));
        }
        // the bounded field follows the requested listing type: rent
        // searches bound the rent price, everything else the sale price
        let price_field = match self.listing_type {
            Some(ListingType::Rent) => PriceField::RentPrice,
            _ => PriceField::Price,
        };
        if let Some(min) = self.min_price {
            clauses.push(FilterClause::PriceAtLeast {
                field: price_field,
                min,
            });
        }
        if let Some(max) = self.max_price {
            clauses.push(FilterClause::PriceAtMost {
                field: price_field,
                max,
            });
        }
        if let Some(furnished) = self.furnished {
            clauses.push(FilterClause::Furnished(furnished));
        }
        if let Some(bedrooms) = self.bedrooms {
            clauses.push(FilterClause::Bedrooms(bedrooms));
        }
        if let Some(bathrooms) = self.bathrooms {
            clauses.push(FilterClause::Bathrooms(bathrooms));
        }
        if let Some(freq) = self.rent_frequency {
            clauses.push(FilterClause::RentFrequency(freq));
        }
        if let Some(date) = self.available_before {
            clauses.push(FilterClause::AvailableOnOrBefore(date));
        }
        if let Some(category) = self.category {
            clauses.push(FilterClause::Category(category));
        }
        if let Some(ref needle) = self.title_search {
            let trimmed = needle.trim();
            if !trimmed.is_empty() {
                clauses.push(FilterClause::TitleContains(trimmed.to_string()));
            }
        }
        if let Some(owner) = self.owner {
            clauses.push(FilterClause::Owner(owner));
        }
    }
}

/// which price column a bound applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    /// the sale asking price
    Price,
    /// the rental price
    RentPrice,
}

impl PriceField {
    fn column(self) -> &'static str {
        match self {
            PriceField::Price => r#"e."price""#,
            PriceField::RentPrice => r#"e."rentPrice""#,
        }
    }
}

/// one conjunct of a compiled predicate
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// exclude listings marked taken
    NotTaken,
    /// listing type equality
    ListingType(ListingType),
    /// lower bound on the chosen price field
    PriceAtLeast {
        /// the bounded column
        field: PriceField,
        /// inclusive lower bound
        min: f64,
    },
    /// upper bound on the chosen price field
    PriceAtMost {
        /// the bounded column
        field: PriceField,
        /// inclusive upper bound
        max: f64,
    },
    /// furnished flag equality
    Furnished(bool),
    /// exact bedroom count
    Bedrooms(i32),
    /// exact bathroom count
    Bathrooms(i32),
    /// rental billing cadence equality
    RentFrequency(RentFrequency),
    /// available on or before the given date
    AvailableOnOrBefore(DateTime<Utc>),
    /// category equality
    Category(Category),
    /// case-insensitive title substring
    TitleContains(String),
    /// owner equality
    Owner(Uuid),
}

/// A conjunction of [FilterClause]s over the listing table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPredicate {
    clauses: Vec<FilterClause>,
}

impl ListingPredicate {
    /// the compiled conjuncts, in application order
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Append this predicate to a query whose WHERE clause is already
    /// open (the base queries all start from `WHERE TRUE`). Every value
    /// is bound, never interpolated.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for clause in &self.clauses {
            qb.push(" AND ");
            match clause {
                FilterClause::NotTaken => {
                    qb.push(r#"e."taken" = FALSE"#);
                }
                FilterClause::ListingType(t) => {
                    qb.push(r#"e."listingType" = "#);
                    qb.push_bind(t.to_string());
                }
                FilterClause::PriceAtLeast { field, min } => {
                    qb.push(field.column());
                    qb.push(" >= ");
                    qb.push_bind(*min);
                }
                FilterClause::PriceAtMost { field, max } => {
                    qb.push(field.column());
                    qb.push(" <= ");
                    qb.push_bind(*max);
                }
                FilterClause::Furnished(furnished) => {
                    qb.push(r#"e."isFurnished" = "#);
                    qb.push_bind(*furnished);
                }
                FilterClause::Bedrooms(n) => {
                    qb.push(r#"e."bedrooms" = "#);
                    qb.push_bind(*n);
                }
                FilterClause::Bathrooms(n) => {
                    qb.push(r#"e."bathrooms" = "#);
                    qb.push_bind(*n);
                }
                FilterClause::RentFrequency(freq) => {
                    qb.push(r#"e."rentFrequency" = "#);
                    qb.push_bind(freq.to_string());
                }
                FilterClause::AvailableOnOrBefore(date) => {
                    qb.push(r#"e."availableFrom" <= "#);
                    qb.push_bind(*date);
                }
                FilterClause::Category(category) => {
                    qb.push(r#"e."category" = "#);
                    qb.push_bind(category.to_string());
                }
                FilterClause::TitleContains(needle) => {
                    qb.push(r#"e."title" ILIKE "#);
                    qb.push_bind(format!("%{}%", escape_like(needle)));
                }
                FilterClause::Owner(owner) => {
                    qb.push(r#"e."userId" = "#);
                    qb.push_bind(*owner);
                }
            }
        }
    }

    /// Evaluate the predicate against an in-memory listing. Mirrors the
    /// SQL semantics: a bound on a column the listing does not populate
    /// (e.g. a sale-price bound against a rental) does not match.
    pub fn matches(&self, listing: &Listing) -> bool {
        self.clauses.iter().all(|clause| match clause {
            FilterClause::NotTaken => !listing.taken,
            FilterClause::ListingType(t) => listing.pricing.listing_type() == *t,
            FilterClause::PriceAtLeast { field, min } => {
                price_of(listing, *field).is_some_and(|p| p >= *min)
            }
            FilterClause::PriceAtMost { field, max } => {
                price_of(listing, *field).is_some_and(|p| p <= *max)
            }
            FilterClause::Furnished(furnished) => listing.is_furnished == Some(*furnished),
            FilterClause::Bedrooms(n) => listing.bedrooms == *n,
            FilterClause::Bathrooms(n) => listing.bathrooms == *n,
            FilterClause::RentFrequency(freq) => matches!(
                listing.pricing,
                Pricing::Rental { rent_frequency, .. } if rent_frequency == *freq
            ),
            FilterClause::AvailableOnOrBefore(date) => {
                listing.available_from.is_some_and(|a| a <= *date)
            }
            FilterClause::Category(category) => listing.category == *category,
            FilterClause::TitleContains(needle) => listing
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            FilterClause::Owner(owner) => listing.user_id == *owner,
        })
    }
}

fn price_of(listing: &Listing, field: PriceField) -> Option<f64> {
    match (field, &listing.pricing) {
        (PriceField::Price, Pricing::Sale { price }) => Some(*price),
        (PriceField::RentPrice, Pricing::Rental { rent_price, .. }) => Some(*rent_price),
        _ => None,
    }
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
