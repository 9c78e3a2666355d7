//! The category taxonomy, loaded once per session.

use std::sync::Mutex;

use storefront_catalog::{CatalogClientError, CategoryFilter, CategoryId, ClientTrait};
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use crate::status::SessionStatus;

/// Label of the sentinel option listing every category.
pub const ALL_CATEGORIES_LABEL: &str = "All Categories";

/// One entry of the category filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub filter: CategoryFilter,
    pub name: String,
}

impl CategoryOption {
    pub fn all() -> Self {
        Self {
            filter: CategoryFilter::All,
            name: ALL_CATEGORIES_LABEL.to_string(),
        }
    }
}

/// Category options, frozen after the first successful load.
///
/// Callers that ask for the categories while the first load is in flight
/// wait for that request instead of issuing their own.
/// A failed load leaves the directory empty, so the next call retries.
#[derive(Debug, Default)]
pub struct CategoryDirectory {
    options: OnceCell<Vec<CategoryOption>>,
    status: Mutex<SessionStatus>,
}

impl CategoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the categories, prefixed with the "All Categories" sentinel.
    #[instrument(skip_all)]
    pub async fn load(
        &self,
        client: &impl ClientTrait,
    ) -> Result<&[CategoryOption], CatalogClientError> {
        let result = self
            .options
            .get_or_try_init(|| async {
                self.set_status(SessionStatus::Loading);
                let categories = client.list_categories().await?;
                debug!(n_categories = categories.len(), "loaded categories");

                let options = std::iter::once(CategoryOption::all())
                    .chain(categories.into_iter().map(|category| CategoryOption {
                        filter: CategoryFilter::Category(category.id),
                        name: category.name,
                    }))
                    .collect::<Vec<_>>();
                Ok::<_, CatalogClientError>(options)
            })
            .await;

        match result {
            Ok(options) => {
                self.set_status(SessionStatus::Success(format!(
                    "Loaded {} categories",
                    options.len() - 1
                )));
                Ok(options.as_slice())
            },
            Err(err) => {
                self.set_status(SessionStatus::Error(format!(
                    "Failed to fetch categories. {err}"
                )));
                Err(err)
            },
        }
    }

    /// The frozen options, if loaded.
    pub fn get(&self) -> Option<&[CategoryOption]> {
        self.options.get().map(Vec::as_slice)
    }

    /// The options without the sentinel, i.e. the choices of a product form.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryOption> {
        self.get()
            .unwrap_or_default()
            .iter()
            .filter(|option| option.filter != CategoryFilter::All)
    }

    /// The category preselected in a new product form.
    pub fn default_category(&self) -> Option<CategoryId> {
        self.categories()
            .next()
            .and_then(|option| option.filter.category_id())
    }

    /// Name of a category, if it is known.
    pub fn name_of(&self, filter: CategoryFilter) -> Option<&str> {
        self.get()?
            .iter()
            .find(|option| option.filter == filter)
            .map(|option| option.name.as_str())
    }

    pub fn status(&self) -> SessionStatus {
        self.status
            .lock()
            .map(|status| status.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn set_status(&self, status: SessionStatus) {
        match self.status.lock() {
            Ok(mut guard) => *guard = status,
            Err(poisoned) => *poisoned.into_inner() = status,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use storefront_catalog::test_helpers::category;
    use storefront_catalog::{MockClient, MockRequest};

    use super::*;

    fn option(id: u64, name: &str) -> CategoryOption {
        CategoryOption {
            filter: CategoryFilter::Category(CategoryId::from(id)),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn sentinel_is_prepended() {
        let client = MockClient::new();
        client.push_categories(vec![category(1, "Clothes"), category(2, "Electronics")]);

        let directory = CategoryDirectory::new();
        let options = directory.load(&client).await.unwrap();
        assert_eq!(options, &[
            CategoryOption::all(),
            option(1, "Clothes"),
            option(2, "Electronics"),
        ]);
        assert_eq!(directory.default_category(), Some(CategoryId::from(1)));
        assert_eq!(
            directory.name_of(CategoryFilter::Category(CategoryId::from(2))),
            Some("Electronics")
        );
        assert_eq!(directory.name_of(CategoryFilter::All), Some(ALL_CATEGORIES_LABEL));
        assert!(matches!(directory.status(), SessionStatus::Success(_)));
    }

    #[tokio::test]
    async fn loads_only_once() {
        let client = MockClient::new();
        client.push_categories(vec![category(1, "Clothes")]);

        let directory = CategoryDirectory::new();
        let (first, second) = tokio::join!(directory.load(&client), directory.load(&client));
        assert_eq!(first.unwrap(), second.unwrap());
        directory.load(&client).await.unwrap();

        assert_eq!(client.requests(), vec![MockRequest::ListCategories]);
    }

    #[tokio::test]
    async fn failed_load_can_be_retried() {
        let client = MockClient::new();
        client.push_error_response(500);
        client.push_categories(vec![category(1, "Clothes")]);

        let directory = CategoryDirectory::new();
        assert!(directory.load(&client).await.is_err());
        assert!(directory.get().is_none());
        assert!(directory.status().is_error());
        assert_eq!(directory.categories().count(), 0);

        let options = directory.load(&client).await.unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(client.requests().len(), 2);
    }
}
