//! The search engine service built on the domain ports.

use estate_filters::{ListingFilters, ListingPredicate};
use estate_geo::km_to_meters;
use models_estate::SortOption;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::{
    BrowsePage, BrowseQuery, FetchMode, INITIAL_RADIUS_KM, LikeToggle, MAX_RADIUS_KM, NearbyQuery,
    PageParams, RADIUS_INCREMENT_KM, SearchPage,
};
use crate::domain::ports::{EngagementStore, ListingStore, UserDirectory};

/// The errors a search invocation can surface to its caller.
///
/// Geo query failures never appear here: the engine absorbs them and
/// serves the global fallback instead.
#[derive(Debug, Error)]
pub enum SearchError {
    /// the requesting user id resolves to no user
    #[error("user not found")]
    UserNotFound,
    /// the fallback storage path itself failed
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// The listing discovery engine.
#[derive(Debug, Clone)]
pub struct SearchEngineImpl<S, U> {
    store: S,
    users: U,
}

impl<S, U> SearchEngineImpl<S, U>
where
    S: ListingStore,
    anyhow::Error: From<S::Err>,
    U: UserDirectory,
    anyhow::Error: From<U::Err>,
{
    /// create a new engine over the given collaborators
    pub fn new(store: S, users: U) -> Self {
        SearchEngineImpl { store, users }
    }

    /// The nearby search path: tight geo query around the effective
    /// location, degrading to the global fallback on zero results, geo
    /// failure, missing location, or `fetchMode=all`.
    #[tracing::instrument(skip(self, query))]
    pub async fn nearby_page(
        &self,
        user_id: Uuid,
        query: NearbyQuery,
    ) -> Result<SearchPage, SearchError> {
        let profile = self
            .users
            .search_profile(user_id)
            .await
            .map_err(anyhow::Error::from)?
            .ok_or(SearchError::UserNotFound)?;

        // a first open gets the unfiltered global feed once
        if !profile.has_opened_app {
            self.mark_opened_app(user_id).await;
            let unfiltered = ListingFilters::default().compile();
            return self.fallback_page(&unfiltered, query.page).await;
        }

        let predicate = query.filters.compile();

        if query.fetch_mode == FetchMode::All {
            return self.fallback_page(&predicate, query.page).await;
        }

        let Some(origin) = profile.effective_location(query.location_override) else {
            return self.fallback_page(&predicate, query.page).await;
        };

        let max_distance_m = km_to_meters(query.distance_km());
        let nearby = self
            .store
            .geo_nearest(
                origin,
                max_distance_m,
                &predicate,
                query.page.skip(),
                query.page.limit,
            )
            .await;

        match nearby {
            Ok((ads, total)) if !ads.is_empty() => Ok(SearchPage {
                total,
                num_of_pages: query.page.num_of_pages(total),
                page: query.page.page,
                is_nearby_data: true,
                has_more_nearby: query.page.has_more(total),
                ads,
            }),
            Ok(_) => self.fallback_page(&predicate, query.page).await,
            Err(err) => {
                let err = anyhow::Error::from(err);
                tracing::warn!(error = ?err, "geo query failed, serving global fallback");
                self.fallback_page(&predicate, query.page).await
            }
        }
    }

    /// The legacy browse path: a plain filtered list when a title search
    /// or category is given, otherwise an expanding-radius search around
    /// the stored location.
    #[tracing::instrument(skip(self, query))]
    pub async fn browse_page(
        &self,
        user_id: Uuid,
        query: BrowseQuery,
    ) -> Result<BrowsePage, SearchError> {
        let profile = self
            .users
            .search_profile(user_id)
            .await
            .map_err(anyhow::Error::from)?
            .ok_or(SearchError::UserNotFound)?;

        if !profile.has_opened_app {
            self.mark_opened_app(user_id).await;
            let unfiltered = ListingFilters::default().compile();
            return self.plain_browse(&unfiltered, SortOption::Newest, query.page).await;
        }

        let predicate = query.filters.compile();

        // a search term or category asks for the catalogue, not proximity
        let by_content =
            query.filters.title_search.is_some() || query.filters.category.is_some();
        let Some(origin) = profile.effective_location(None).filter(|_| !by_content) else {
            return self.plain_browse(&predicate, query.sort, query.page).await;
        };

        let mut radius_km = INITIAL_RADIUS_KM;
        let total = loop {
            let count = self
                .store
                .count_within(origin, radius_km, &predicate)
                .await
                .map_err(anyhow::Error::from)?;
            if count > 0 {
                break count;
            }
            radius_km += RADIUS_INCREMENT_KM;
            if radius_km > MAX_RADIUS_KM {
                break 0;
            }
        };

        if total == 0 {
            return Ok(BrowsePage {
                ads: Vec::new(),
                total_ads: 0,
                num_of_pages: 0,
                page: query.page.page,
            });
        }

        let ads = self
            .store
            .geo_within(
                origin,
                radius_km,
                &predicate,
                query.sort,
                query.page.skip(),
                query.page.limit,
            )
            .await
            .map_err(anyhow::Error::from)?;

        Ok(BrowsePage {
            ads,
            total_ads: total,
            num_of_pages: query.page.num_of_pages(total),
            page: query.page.page,
        })
    }

    /// best-effort side effect of the first unfiltered view
    async fn mark_opened_app(&self, user_id: Uuid) {
        if let Err(err) = self.users.mark_opened_app(user_id).await {
            let err = anyhow::Error::from(err);
            tracing::warn!(%user_id, error = ?err, "failed to record first app open");
        }
    }

    async fn fallback_page(
        &self,
        predicate: &ListingPredicate,
        page: PageParams,
    ) -> Result<SearchPage, SearchError> {
        let (ads, total) = self
            .store
            .list(predicate, SortOption::Newest, page.skip(), page.limit)
            .await
            .map_err(anyhow::Error::from)?;

        Ok(SearchPage {
            ads,
            total,
            num_of_pages: page.num_of_pages(total),
            page: page.page,
            is_nearby_data: false,
            has_more_nearby: false,
        })
    }

    async fn plain_browse(
        &self,
        predicate: &ListingPredicate,
        sort: SortOption,
        page: PageParams,
    ) -> Result<BrowsePage, SearchError> {
        let (ads, total) = self
            .store
            .list(predicate, sort, page.skip(), page.limit)
            .await
            .map_err(anyhow::Error::from)?;

        Ok(BrowsePage {
            ads,
            total_ads: total,
            num_of_pages: page.num_of_pages(total),
            page: page.page,
        })
    }
}

/// The engagement counter service: distinct views and like toggling.
#[derive(Debug, Clone)]
pub struct EngagementServiceImpl<E> {
    store: E,
}

impl<E> EngagementServiceImpl<E>
where
    E: EngagementStore,
    anyhow::Error: From<E::Err>,
{
    /// create a new service over the given store
    pub fn new(store: E) -> Self {
        EngagementServiceImpl { store }
    }

    /// A view of the listing. A signed-in viewer is counted once across
    /// all their views; an anonymous view only reads the count. Returns
    /// the count after the call, `None` for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn view(
        &self,
        estate_id: Uuid,
        viewer: Option<Uuid>,
    ) -> anyhow::Result<Option<i64>> {
        match viewer {
            Some(viewer) => Ok(self.store.record_view(estate_id, viewer).await?),
            None => Ok(self.store.view_count(estate_id).await?),
        }
    }

    /// Flip the user's like on the listing. Returns the resulting state,
    /// `None` for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_like(
        &self,
        estate_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<LikeToggle>> {
        Ok(self.store.toggle_like(estate_id, user_id).await?)
    }
}

#[cfg(test)]
mod tests;
