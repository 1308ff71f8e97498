//! Raw wire types for the commercetools HTTP+JSON API.
//!
//! These mirror the platform's JSON verbatim (camelCase fields, paged
//! envelopes, localized string maps). Display code never sees them; the
//! stores normalize them through [`super::conversions`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Locale tag to localized text, e.g. `{"en": "Shoes", "de": "Schuhe"}`.
pub type LocalizedString = BTreeMap<String, String>;

/// The locale the storefront displays.
pub const DISPLAY_LOCALE: &str = "en";

/// Pick the display locale out of a localized string, falling back to
/// any locale the platform sent, then to empty.
#[must_use]
pub fn pick_locale(localized: Option<&LocalizedString>) -> String {
    let Some(map) = localized else {
        return String::new();
    };
    map.get(DISPLAY_LOCALE)
        .or_else(|| map.values().next())
        .cloned()
        .unwrap_or_default()
}

/// Paged query envelope wrapping every list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PagedResponse<T> {
    /// Results in this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Error body the platform sends with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable message, when the platform provides one.
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Catalog
// =============================================================================

/// Reference to another resource by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReference {
    /// Referenced resource id.
    pub id: String,
}

/// A category as the platform returns it (flat; the tree is derived
/// client-side).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    pub id: String,
    pub name: LocalizedString,
    /// Present on subcategories only.
    #[serde(default)]
    pub parent: Option<RawReference>,
    /// Decimal-string sort key for siblings.
    #[serde(default)]
    pub order_hint: String,
}

/// Monetary value in the smallest currency unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMoney {
    pub cent_amount: i64,
    pub currency_code: String,
}

/// A discounted price attached to a base price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDiscountedPrice {
    pub value: RawMoney,
}

/// A price entry on a variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPrice {
    pub value: RawMoney,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted: Option<RawDiscountedPrice>,
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawImageDimensions {
    pub w: i64,
    pub h: i64,
}

/// An image on a variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<RawImageDimensions>,
}

/// The master variant carrying prices and images.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawVariant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prices: Vec<RawPrice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<RawImage>,
}

/// A product projection from the search endpoint. Every field the
/// storefront displays is optional on the wire; normalization supplies
/// safe defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawProductProjection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    #[serde(default)]
    pub master_variant: RawVariant,
}

/// A full product resource; current staged data carries the same shape
/// as a projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub master_data: RawMasterData,
}

/// Container for the published representation of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMasterData {
    pub current: RawProductProjection,
}

// =============================================================================
// Customers
// =============================================================================

/// A stored customer address.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2 code.
    #[serde(default)]
    pub country: String,
}

/// The customer resource, version token included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCustomer {
    pub id: String,
    pub version: u64,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<RawAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_shipping_address_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_billing_address_id: Option<String>,
}

/// Sign-in and sign-up endpoints both answer with this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSignInResult {
    pub customer: RawCustomer,
}

/// Credentials sent to the login endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Draft for a new address.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub country: String,
}

/// Draft for a new customer account.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Name and email changes sent as one update request.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A single customer update action, discriminated by `action`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UpdateAction<'a> {
    ChangeEmail { email: &'a str },
    SetFirstName { first_name: &'a str },
    SetLastName { last_name: &'a str },
    AddAddress { address: &'a AddressDraft },
    ChangeAddress { address_id: &'a str, address: &'a AddressDraft },
    RemoveAddress { address_id: &'a str },
}

/// Update request envelope: version guard plus the action list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdateRequest<'a> {
    pub version: u64,
    pub actions: Vec<UpdateAction<'a>>,
}

/// Body for the dedicated password-change endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest<'a> {
    pub id: &'a str,
    pub version: u64,
    pub current_password: &'a str,
    pub new_password: &'a str,
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}
