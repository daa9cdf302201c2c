//! Per-session cache of sub-category lists.

use std::sync::Arc;

use moka::future::Cache;
use tally_shared::{AppError, AppResult};
use tracing::debug;

use crate::ports::BudgetBackend;

/// Upper bound on cached categories for one session.
const MAX_CATEGORIES: u64 = 512;

/// Sub-category names keyed by category name.
///
/// Each category is fetched from the backend at most once; concurrent
/// lookups for the same category share one request.
#[derive(Clone)]
pub struct SubcategoryCache {
    cache: Cache<String, Arc<Vec<String>>>,
}

impl SubcategoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().max_capacity(MAX_CATEGORIES).build(),
        }
    }

    /// Returns the sub-categories for `category`, fetching them if needed.
    pub async fn resolve(
        &self,
        backend: &dyn BudgetBackend,
        category: &str,
    ) -> AppResult<Arc<Vec<String>>> {
        self.cache
            .try_get_with(category.to_string(), async {
                debug!(category, "Fetching sub-categories");
                backend.fetch_subcategories(category).await.map(Arc::new)
            })
            .await
            .map_err(|e: Arc<AppError>| (*e).clone())
    }

    /// Stores a list received from a peer.
    pub async fn insert(&self, category: impl Into<String>, names: Vec<String>) {
        self.cache.insert(category.into(), Arc::new(names)).await;
    }

    /// Cached list for `category`, without fetching.
    pub async fn get(&self, category: &str) -> Option<Arc<Vec<String>>> {
        self.cache.get(category).await
    }
}

impl Default for SubcategoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    #[tokio::test]
    async fn test_resolve_fetches_once() {
        let backend = FakeBackend::new().with_subcategories("Travel", &["Flights", "Hotels"]);
        let cache = SubcategoryCache::new();

        let first = cache.resolve(&backend, "Travel").await.unwrap();
        let second = cache.resolve(&backend, "Travel").await.unwrap();

        assert_eq!(first.as_slice(), ["Flights", "Hotels"]);
        assert_eq!(first, second);
        assert_eq!(backend.subcategory_calls(), 1);
    }

    #[tokio::test]
    async fn test_inserted_lists_skip_backend() {
        let backend = FakeBackend::new();
        let cache = SubcategoryCache::new();
        cache.insert("Events", vec!["Venue".into()]).await;

        let names = cache.resolve(&backend, "Events").await.unwrap();
        assert_eq!(names.as_slice(), ["Venue"]);
        assert_eq!(backend.subcategory_calls(), 0);
    }
}
