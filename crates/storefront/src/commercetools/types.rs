//! Domain types for the storefront.
//!
//! These provide a clean, ergonomic shape separate from the raw wire
//! types: read-only projections the presentation layer renders directly.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use wildberry_core::{AddressId, CategoryId, CustomerId, Money, Version};

// =============================================================================
// Catalog Types
// =============================================================================

/// Product or category image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text, when the merchant set one.
    pub label: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

/// A normalized, read-only snapshot of a catalog item for display.
///
/// Derived wholesale from the platform representation on every fetch;
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Product {
    /// Merchant-assigned key (product key or URL slug, whichever the
    /// source endpoint carries).
    pub key: String,
    /// Localized display name.
    pub name: String,
    /// Localized description.
    pub description: String,
    /// Current price, absent when the variant has no price entries.
    pub price: Option<Money>,
    /// Discounted price, present only while a discount applies.
    pub discounted: Option<Money>,
    /// Images in merchant order.
    pub images: Vec<Image>,
}

impl Product {
    /// Whether a discount currently applies.
    #[must_use]
    pub const fn is_discounted(&self) -> bool {
        self.discounted.is_some()
    }
}

/// A node in the two-level product taxonomy tree.
///
/// Root categories carry their direct children, sorted by order hint;
/// deeper nesting is unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: CategoryId,
    /// Localized display name.
    pub name: String,
    /// Decimal-string sort key among siblings.
    pub order_hint: String,
    /// Direct children, sorted. Always empty on subcategories.
    pub subcategories: Vec<Category>,
}

// =============================================================================
// Filter / Sort Types
// =============================================================================

/// A filterable product attribute dimension.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Size,
    Color,
    Brand,
}

impl FilterDimension {
    /// The attribute key the search endpoint filters on.
    #[must_use]
    pub const fn attribute_key(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Color => "color",
            Self::Brand => "brand",
        }
    }
}

/// Selected filter values per dimension.
///
/// Mutated by user interaction, read when issuing a search request,
/// reset on category change or explicit reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterQuery(BTreeMap<FilterDimension, BTreeSet<String>>);

impl FilterQuery {
    /// Create an empty query.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Select or deselect a value; empty dimensions are dropped.
    pub fn toggle(&mut self, dimension: FilterDimension, value: impl Into<String>) {
        let value = value.into();
        let values = self.0.entry(dimension).or_default();
        if !values.remove(&value) {
            values.insert(value);
        }
        if values.is_empty() {
            self.0.remove(&dimension);
        }
    }

    /// Whether a value is currently selected.
    #[must_use]
    pub fn contains(&self, dimension: FilterDimension, value: &str) -> bool {
        self.0.get(&dimension).is_some_and(|v| v.contains(value))
    }

    /// Whether no value is selected at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop every selection.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate dimensions with their selected values.
    pub fn iter(&self) -> impl Iterator<Item = (FilterDimension, &BTreeSet<String>)> {
        self.0.iter().map(|(dimension, values)| (*dimension, values))
    }
}

/// Product list ordering, a closed enumeration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Platform relevance order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortOption {
    /// Sort expression for the search endpoint; `None` keeps the
    /// platform's relevance order.
    #[must_use]
    pub const fn query_param(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::PriceAsc => Some("price asc"),
            Self::PriceDesc => Some("price desc"),
            Self::NameAsc => Some("name.en asc"),
            Self::NameDesc => Some("name.en desc"),
        }
    }
}

// =============================================================================
// Customer Types
// =============================================================================

/// A customer address with its role flags resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileAddress {
    /// Platform-assigned address id.
    pub id: Option<AddressId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street_name: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2 code.
    pub country: String,
    /// Whether this is the default shipping address.
    pub is_default_shipping: bool,
    /// Whether this is the default billing address.
    pub is_default_billing: bool,
}

/// The signed-in customer's profile.
///
/// Replaced wholesale with every mutation response; [`Self::version`]
/// must accompany the next mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: CustomerId,
    /// Optimistic-concurrency version token.
    pub version: Version,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub addresses: Vec<ProfileAddress>,
}
