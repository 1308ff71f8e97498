//! commercetools HTTP API client.
//!
//! # Architecture
//!
//! - REST + JSON over HTTPS; raw payload shapes live in [`wire`],
//!   normalized domain types in [`types`]
//! - commercetools is source of truth - no local sync, direct API calls
//! - Client-credentials OAuth token acquired and renewed opaquely by the
//!   client; callers never see auth state
//!
//! The stores talk to the API exclusively through the [`CommerceApi`]
//! trait, so tests can substitute a scripted implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use wildberry_storefront::commercetools::CommercetoolsClient;
//!
//! let client = CommercetoolsClient::new(&config);
//!
//! // Fetch the full category list
//! let categories = client.get_categories().await?;
//!
//! // Sign a customer in
//! let result = client.login("user@example.com", "sturdy4password").await?;
//! ```

mod client;
pub mod conversions;
pub mod types;
pub mod wire;

pub use client::CommercetoolsClient;
pub use types::{
    Category, CustomerProfile, FilterDimension, FilterQuery, Image, Product, ProfileAddress,
    SortOption,
};

use thiserror::Error;
use wildberry_core::{AddressId, CategoryId, CustomerId, ProductKey, Version};

use wire::{
    AddressDraft, CustomerDraft, CustomerSignInResult, PersonalData, RawCategory, RawCustomer,
    RawProduct, RawProductProjection,
};

/// Errors that can occur when talking to the commercetools API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The platform rejected the request with a 400 and a message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Token acquisition or renewal failed.
    #[error("Auth error: {0}")]
    Auth(String),

    /// Any other non-success status.
    #[error("Unexpected response ({status}): {body}")]
    Unexpected {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
}

/// The boundary the stores call: one method per storefront operation.
///
/// Implemented by [`CommercetoolsClient`] for production and by scripted
/// mocks in tests. Methods return raw wire payloads; normalization into
/// display shapes is the stores' job.
#[allow(async_fn_in_trait)]
pub trait CommerceApi {
    /// Retrieve the full category list.
    async fn get_categories(&self) -> Result<Vec<RawCategory>, ApiError>;

    /// Search product projections under a category subtree.
    async fn get_products_by_category(
        &self,
        id: &CategoryId,
    ) -> Result<Vec<RawProductProjection>, ApiError>;

    /// Search product projections under a category with attribute
    /// filters and a sort option applied.
    async fn search_products(
        &self,
        category: &CategoryId,
        filters: &FilterQuery,
        sort: SortOption,
    ) -> Result<Vec<RawProductProjection>, ApiError>;

    /// Fetch a single product by its merchant-assigned key.
    async fn get_product_by_key(&self, key: &ProductKey) -> Result<RawProduct, ApiError>;

    /// Authenticate a customer with email and password.
    async fn login(&self, email: &str, password: &str) -> Result<CustomerSignInResult, ApiError>;

    /// Create a customer account from a draft.
    async fn sign_up(&self, draft: &CustomerDraft) -> Result<CustomerSignInResult, ApiError>;

    /// Fetch the signed-in customer's profile.
    async fn get_profile(&self) -> Result<RawCustomer, ApiError>;

    /// Remove an address from the customer.
    async fn remove_address(
        &self,
        id: &CustomerId,
        version: Version,
        address_id: &AddressId,
    ) -> Result<RawCustomer, ApiError>;

    /// Replace an existing address.
    async fn change_address(
        &self,
        id: &CustomerId,
        version: Version,
        address_id: &AddressId,
        address: &AddressDraft,
    ) -> Result<RawCustomer, ApiError>;

    /// Add a new address to the customer.
    async fn add_address(
        &self,
        id: &CustomerId,
        version: Version,
        address: &AddressDraft,
    ) -> Result<RawCustomer, ApiError>;

    /// Change name and email in one request.
    async fn change_personal_data(
        &self,
        id: &CustomerId,
        version: Version,
        data: &PersonalData,
    ) -> Result<RawCustomer, ApiError>;

    /// Change the customer's password.
    async fn change_password(
        &self,
        id: &CustomerId,
        version: Version,
        current_password: &str,
        new_password: &str,
    ) -> Result<RawCustomer, ApiError>;

    /// Drop any cached auth token. Called on logout.
    fn clear_auth(&self);
}

impl<T: CommerceApi> CommerceApi for std::sync::Arc<T> {
    async fn get_categories(&self) -> Result<Vec<RawCategory>, ApiError> {
        (**self).get_categories().await
    }

    async fn get_products_by_category(
        &self,
        id: &CategoryId,
    ) -> Result<Vec<RawProductProjection>, ApiError> {
        (**self).get_products_by_category(id).await
    }

    async fn search_products(
        &self,
        category: &CategoryId,
        filters: &FilterQuery,
        sort: SortOption,
    ) -> Result<Vec<RawProductProjection>, ApiError> {
        (**self).search_products(category, filters, sort).await
    }

    async fn get_product_by_key(&self, key: &ProductKey) -> Result<RawProduct, ApiError> {
        (**self).get_product_by_key(key).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<CustomerSignInResult, ApiError> {
        (**self).login(email, password).await
    }

    async fn sign_up(&self, draft: &CustomerDraft) -> Result<CustomerSignInResult, ApiError> {
        (**self).sign_up(draft).await
    }

    async fn get_profile(&self) -> Result<RawCustomer, ApiError> {
        (**self).get_profile().await
    }

    async fn remove_address(
        &self,
        id: &CustomerId,
        version: Version,
        address_id: &AddressId,
    ) -> Result<RawCustomer, ApiError> {
        (**self).remove_address(id, version, address_id).await
    }

    async fn change_address(
        &self,
        id: &CustomerId,
        version: Version,
        address_id: &AddressId,
        address: &AddressDraft,
    ) -> Result<RawCustomer, ApiError> {
        (**self)
            .change_address(id, version, address_id, address)
            .await
    }

    async fn add_address(
        &self,
        id: &CustomerId,
        version: Version,
        address: &AddressDraft,
    ) -> Result<RawCustomer, ApiError> {
        (**self).add_address(id, version, address).await
    }

    async fn change_personal_data(
        &self,
        id: &CustomerId,
        version: Version,
        data: &PersonalData,
    ) -> Result<RawCustomer, ApiError> {
        (**self).change_personal_data(id, version, data).await
    }

    async fn change_password(
        &self,
        id: &CustomerId,
        version: Version,
        current_password: &str,
        new_password: &str,
    ) -> Result<RawCustomer, ApiError> {
        (**self)
            .change_password(id, version, current_password, new_password)
            .await
    }

    fn clear_auth(&self) {
        (**self).clear_auth();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product wave-tee".to_string());
        assert_eq!(err.to_string(), "Not found: product wave-tee");

        let err = ApiError::BadRequest("invalid credentials".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid credentials");

        let err = ApiError::Unexpected {
            status: 502,
            body: "upstream".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected response (502): upstream");
    }
}
