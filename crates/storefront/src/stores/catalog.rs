//! Product catalog store.
//!
//! Owns the category tree, the product list, the current-product slot,
//! and the filter/sort state. Fetch methods call the commerce API,
//! normalize the raw payloads, and replace state wholesale; subscribers
//! are notified after every mutation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;
use wildberry_core::{CategoryId, ProductKey};

use crate::commercetools::conversions::{product_from_projection, product_from_raw};
use crate::commercetools::wire::{RawCategory, RawProductProjection, pick_locale};
use crate::commercetools::{
    ApiError, Category, CommerceApi, FilterDimension, FilterQuery, Product, SortOption,
};

use super::observer::{ObserverId, ObserverSet};

/// User-facing message for any category fetch failure.
pub const CATEGORIES_ERROR: &str = "Error fetching categories";
/// User-facing message for any product fetch failure.
pub const PRODUCTS_ERROR: &str = "Error fetching products";

#[derive(Debug, Default)]
struct CatalogState {
    categories: Vec<Category>,
    /// Lowercased category name to id. Rebuilt on every category-list
    /// mutation; root entries shadow subcategory entries.
    name_index: HashMap<String, CategoryId>,
    products: Vec<Product>,
    current_product: Option<Product>,
    current_category: Option<CategoryId>,
    filters: FilterQuery,
    sort: SortOption,
    needs_refetch: bool,
    categories_loading: bool,
    products_loading: bool,
    error: Option<String>,
}

/// Observable catalog store over a commerce API.
pub struct CatalogStore<C> {
    api: C,
    state: Mutex<CatalogState>,
    observers: ObserverSet,
    /// Monotonic ticket for product-list fetches; responses whose ticket
    /// is no longer the newest are discarded.
    list_fence: AtomicU64,
    /// Same, for the current-product slot.
    product_fence: AtomicU64,
}

impl<C: CommerceApi> CatalogStore<C> {
    #[must_use]
    pub fn new(api: C) -> Self {
        Self {
            api,
            state: Mutex::new(CatalogState::default()),
            observers: ObserverSet::new(),
            list_fence: AtomicU64::new(0),
            product_fence: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> ObserverId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: ObserverId) {
        self.observers.unsubscribe(id);
    }

    // =========================================================================
    // Fetches
    // =========================================================================

    /// Fetch the category list and rebuild the tree and name index.
    ///
    /// On failure the prior category state stays untouched and the error
    /// slot is set. Overlapping calls are idempotent; last write wins.
    pub async fn fetch_categories(&self) {
        self.mutate(|state| state.categories_loading = true);

        let result = self.api.get_categories().await;

        self.mutate(|state| {
            state.categories_loading = false;
            match result {
                Ok(raw) => {
                    state.categories = build_tree(raw);
                    state.name_index = build_name_index(&state.categories);
                    state.error = None;
                }
                Err(error) => {
                    warn!(%error, "category fetch failed");
                    state.error = Some(CATEGORIES_ERROR.to_string());
                }
            }
        });
    }

    /// Fetch the products under a category subtree and replace the list.
    ///
    /// `None` is a no-op: no network call, product list unchanged.
    /// Changing to a different category resets the filter and sort state.
    pub async fn fetch_products_by_category(&self, id: Option<&CategoryId>) {
        self.mutate(|state| state.products_loading = true);

        let Some(id) = id else {
            self.mutate(|state| state.products_loading = false);
            return;
        };

        self.mutate(|state| {
            if state.current_category.as_ref() != Some(id) {
                state.current_category = Some(id.clone());
                state.filters.clear();
                state.sort = SortOption::default();
            }
        });

        let ticket = self.list_fence.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.get_products_by_category(id).await;
        self.apply_list_result(ticket, result);
    }

    /// Re-run the product search with the current category, filters and
    /// sort applied. No-op without a current category.
    pub async fn fetch_filtered_products(&self) {
        let Some((category, filters, sort)) = self.read(|state| {
            state
                .current_category
                .clone()
                .map(|category| (category, state.filters.clone(), state.sort))
        }) else {
            return;
        };

        self.mutate(|state| {
            state.products_loading = true;
            state.needs_refetch = false;
        });

        let ticket = self.list_fence.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.search_products(&category, &filters, sort).await;
        self.apply_list_result(ticket, result);
    }

    /// Fetch a single product into the current-product slot.
    ///
    /// A not-found response clears the slot without setting an error.
    pub async fn fetch_product(&self, key: &ProductKey) {
        self.mutate(|state| state.products_loading = true);

        let ticket = self.product_fence.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.get_product_by_key(key).await;

        self.mutate(|state| {
            if self.product_fence.load(Ordering::SeqCst) != ticket {
                return;
            }
            state.products_loading = false;
            match result {
                Ok(raw) => {
                    state.current_product = Some(product_from_raw(raw));
                    state.error = None;
                }
                Err(ApiError::NotFound(_)) => {
                    state.current_product = None;
                    state.error = None;
                }
                Err(error) => {
                    warn!(%error, "product fetch failed");
                    state.error = Some(PRODUCTS_ERROR.to_string());
                }
            }
        });
    }

    fn apply_list_result(&self, ticket: u64, result: Result<Vec<RawProductProjection>, ApiError>) {
        self.mutate(|state| {
            if self.list_fence.load(Ordering::SeqCst) != ticket {
                // A newer fetch superseded this one.
                return;
            }
            state.products_loading = false;
            match result {
                Ok(raw) => {
                    state.products = raw.into_iter().map(product_from_projection).collect();
                    state.error = None;
                }
                Err(error) => {
                    warn!(%error, "product list fetch failed");
                    state.error = Some(PRODUCTS_ERROR.to_string());
                }
            }
        });
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Resolve a category id from a human-readable name.
    ///
    /// Matching is case-insensitive and exact; a root category sharing a
    /// name with a subcategory wins.
    #[must_use]
    pub fn category_id_by_name(&self, name: &str) -> Option<CategoryId> {
        self.read(|state| state.name_index.get(&name.to_lowercase()).cloned())
    }

    // =========================================================================
    // Filter / Sort Setters
    // =========================================================================

    /// Select or deselect a filter value. Raises the refetch flag; the
    /// caller decides when to re-run the search.
    pub fn toggle_filter(&self, dimension: FilterDimension, value: impl Into<String>) {
        self.mutate(|state| {
            state.filters.toggle(dimension, value);
            state.needs_refetch = true;
        });
    }

    /// Drop every filter selection.
    pub fn reset_filters(&self) {
        self.mutate(|state| {
            state.filters.clear();
            state.needs_refetch = true;
        });
    }

    /// Change the sort option.
    pub fn set_sort(&self, sort: SortOption) {
        self.mutate(|state| {
            if state.sort != sort {
                state.sort = sort;
                state.needs_refetch = true;
            }
        });
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.read(|state| state.categories.clone())
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.read(|state| state.products.clone())
    }

    #[must_use]
    pub fn current_product(&self) -> Option<Product> {
        self.read(|state| state.current_product.clone())
    }

    #[must_use]
    pub fn current_category(&self) -> Option<CategoryId> {
        self.read(|state| state.current_category.clone())
    }

    #[must_use]
    pub fn filters(&self) -> FilterQuery {
        self.read(|state| state.filters.clone())
    }

    #[must_use]
    pub fn sort(&self) -> SortOption {
        self.read(|state| state.sort)
    }

    #[must_use]
    pub fn needs_refetch(&self) -> bool {
        self.read(|state| state.needs_refetch)
    }

    #[must_use]
    pub fn is_categories_loading(&self) -> bool {
        self.read(|state| state.categories_loading)
    }

    #[must_use]
    pub fn is_products_loading(&self) -> bool {
        self.read(|state| state.products_loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.read(|state| state.error.clone())
    }

    pub fn clear_error(&self) {
        self.mutate(|state| state.error = None);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<R>(&self, f: impl FnOnce(&CatalogState) -> R) -> R {
        f(&self.lock())
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut CatalogState) -> R) -> R {
        let result = f(&mut self.lock());
        self.observers.notify();
        result
    }
}

// =============================================================================
// Tree Construction
// =============================================================================

/// Build the two-level tree from the platform's flat category list.
///
/// Roots and children are each sorted by numeric order hint ascending;
/// children attach to their parent by id. A child whose parent id
/// matches no root is dropped.
fn build_tree(raw: Vec<RawCategory>) -> Vec<Category> {
    let (roots, children): (Vec<_>, Vec<_>) =
        raw.into_iter().partition(|category| category.parent.is_none());

    let mut children: Vec<(String, Category)> = children
        .into_iter()
        .filter_map(|category| {
            let parent_id = category.parent.as_ref().map(|parent| parent.id.clone())?;
            Some((parent_id, flat_category(category)))
        })
        .collect();
    children.sort_by(|a, b| compare_order_hints(&a.1.order_hint, &b.1.order_hint));

    let mut tree: Vec<Category> = roots.into_iter().map(flat_category).collect();
    tree.sort_by(|a, b| compare_order_hints(&a.order_hint, &b.order_hint));

    for (parent_id, child) in children {
        if let Some(root) = tree.iter_mut().find(|root| root.id.as_str() == parent_id) {
            root.subcategories.push(child);
        }
    }

    tree
}

fn flat_category(raw: RawCategory) -> Category {
    Category {
        id: CategoryId::new(raw.id),
        name: pick_locale(Some(&raw.name)),
        order_hint: raw.order_hint,
        subcategories: Vec::new(),
    }
}

/// Order hints are decimal strings; unparsable hints sort first.
fn compare_order_hints(a: &str, b: &str) -> std::cmp::Ordering {
    let a = a.parse::<f64>().unwrap_or(0.0);
    let b = b.parse::<f64>().unwrap_or(0.0);
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}

/// Build the lowercased name index. Root entries shadow subcategory
/// entries; among same-level duplicates the first sibling in tree order
/// wins.
fn build_name_index(categories: &[Category]) -> HashMap<String, CategoryId> {
    let mut index = HashMap::new();
    for root in categories {
        for child in &root.subcategories {
            index
                .entry(child.name.to_lowercase())
                .or_insert_with(|| child.id.clone());
        }
    }
    // Roots in reverse, so the first root lands last and wins.
    for root in categories.iter().rev() {
        index.insert(root.name.to_lowercase(), root.id.clone());
    }
    index
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commercetools::wire::{LocalizedString, RawReference};

    fn raw_category(id: &str, name: &str, parent: Option<&str>, order_hint: &str) -> RawCategory {
        let mut localized = LocalizedString::new();
        localized.insert("en".to_string(), name.to_string());
        RawCategory {
            id: id.to_string(),
            name: localized,
            parent: parent.map(|id| RawReference { id: id.to_string() }),
            order_hint: order_hint.to_string(),
        }
    }

    #[test]
    fn test_build_tree_sorts_and_attaches_children() {
        let tree = build_tree(vec![
            raw_category("c1", "Clothes", None, "2"),
            raw_category("c2", "Shoes", None, "1"),
            raw_category("c3", "Sneakers", Some("c1"), "1"),
        ]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, CategoryId::new("c2"));
        assert_eq!(tree[1].id, CategoryId::new("c1"));
        assert_eq!(tree[1].subcategories.len(), 1);
        assert_eq!(tree[1].subcategories[0].id, CategoryId::new("c3"));
        assert!(tree[0].subcategories.is_empty());
    }

    #[test]
    fn test_build_tree_sorts_siblings_numerically() {
        // "10" sorts after "9" numerically, before it lexically.
        let tree = build_tree(vec![
            raw_category("a", "A", None, "10"),
            raw_category("b", "B", None, "9"),
        ]);
        assert_eq!(tree[0].id, CategoryId::new("b"));
        assert_eq!(tree[1].id, CategoryId::new("a"));
    }

    #[test]
    fn test_build_tree_drops_orphan_children() {
        let tree = build_tree(vec![
            raw_category("c1", "Clothes", None, "1"),
            raw_category("c9", "Orphan", Some("gone"), "1"),
        ]);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].subcategories.is_empty());
    }

    #[test]
    fn test_name_index_first_sibling_wins_within_a_level() {
        let tree = build_tree(vec![
            raw_category("r1", "New", None, "1"),
            raw_category("r2", "New", None, "2"),
            raw_category("c1", "Accessories", Some("r1"), "1"),
            raw_category("c2", "Accessories", Some("r2"), "1"),
        ]);
        let index = build_name_index(&tree);

        assert_eq!(index.get("new"), Some(&CategoryId::new("r1")));
        assert_eq!(index.get("accessories"), Some(&CategoryId::new("c1")));
    }

    #[test]
    fn test_name_index_is_lowercased_with_root_priority() {
        let tree = build_tree(vec![
            raw_category("root", "Sale", None, "1"),
            raw_category("other", "Shoes", None, "2"),
            raw_category("child", "Sale", Some("other"), "1"),
        ]);
        let index = build_name_index(&tree);

        assert_eq!(index.get("sale"), Some(&CategoryId::new("root")));
        assert_eq!(index.get("shoes"), Some(&CategoryId::new("other")));
        assert_eq!(index.get("Sale"), None, "keys are lowercased");
    }
}
