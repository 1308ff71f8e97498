//! reqwest-backed implementation of the commerce API boundary.

use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};
use wildberry_core::{AddressId, CategoryId, CustomerId, ProductKey, Version};

use crate::config::CommercetoolsConfig;

use super::types::{FilterQuery, SortOption};
use super::wire::{
    AddressDraft, ApiErrorBody, ChangePasswordRequest, CustomerDraft, CustomerSignInResult,
    CustomerUpdateRequest, PagedResponse, PersonalData, RawCategory, RawCustomer, RawProduct,
    RawProductProjection, SignInBody, TokenResponse, UpdateAction,
};
use super::{ApiError, CommerceApi};

/// Renew the token this many seconds before its reported expiry.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// How many categories one fetch pulls; the full taxonomy is expected
/// to fit well below this.
const CATEGORY_PAGE_LIMIT: u32 = 500;

/// Page size for product searches.
const PRODUCT_PAGE_LIMIT: u32 = 100;

/// Client for the commercetools HTTP API.
///
/// Cheaply cloneable via `Arc`; owns nothing beyond the HTTP connection
/// pool and a transient bearer token.
#[derive(Clone)]
pub struct CommercetoolsClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    api_url: String,
    auth_url: String,
    project_key: String,
    client_id: String,
    client_secret: SecretString,
    scopes: String,
    token: Mutex<Option<BearerToken>>,
}

#[derive(Clone)]
struct BearerToken {
    access_token: String,
    expires_in: i64,
    obtained_at: i64,
}

impl BearerToken {
    fn is_fresh(&self) -> bool {
        chrono::Utc::now().timestamp()
            < self.obtained_at + self.expires_in - TOKEN_REFRESH_MARGIN_SECS
    }
}

impl CommercetoolsClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &CommercetoolsConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                api_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                auth_url: config.auth_url.as_str().trim_end_matches('/').to_string(),
                project_key: config.project_key.clone(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                scopes: config.scopes.clone(),
                token: Mutex::new(None),
            }),
        }
    }

    // =========================================================================
    // Token Management
    // =========================================================================

    /// Return a fresh bearer token, renewing through the client
    /// credentials flow when the cached one is missing or near expiry.
    async fn bearer_token(&self) -> Result<String, ApiError> {
        {
            let token = self
                .inner
                .token
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(token) = token.as_ref()
                && token.is_fresh()
            {
                return Ok(token.access_token.clone());
            }
        }

        let fetched = self.fetch_token().await?;
        let access_token = fetched.access_token.clone();

        // Overlapping renewals are harmless: last write wins.
        *self
            .inner
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(fetched);

        Ok(access_token)
    }

    async fn fetch_token(&self) -> Result<BearerToken, ApiError> {
        let url = format!("{}/oauth/token", self.inner.auth_url);
        let params = [
            ("grant_type", "client_credentials"),
            ("scope", &self.inner.scopes),
        ];

        let response = self
            .inner
            .http
            .post(&url)
            .basic_auth(
                &self.inner.client_id,
                Some(self.inner.client_secret.expose_secret()),
            )
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Auth(format!(
                "token request failed ({status}): {}",
                truncate(&body)
            )));
        }

        let token: TokenResponse = response.json().await?;
        debug!(expires_in = token.expires_in, "obtained access token");

        Ok(BearerToken {
            access_token: token.access_token,
            expires_in: token.expires_in,
            obtained_at: chrono::Utc::now().timestamp(),
        })
    }

    // =========================================================================
    // Request Helpers
    // =========================================================================

    fn project_url(&self, path: &str) -> String {
        format!("{}/{}{path}", self.inner.api_url, self.inner.project_key)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let token = self.bearer_token().await?;
        let response = self
            .inner
            .http
            .get(self.project_url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        Self::handle(path, response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let token = self.bearer_token().await?;
        let response = self
            .inner
            .http
            .post(self.project_url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::handle(path, response).await
    }

    /// Map a response onto the error taxonomy: success payload,
    /// explicit bad request, not found, or unmodeled.
    async fn handle<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        // Body as text first for better parse diagnostics.
        let text = response.text().await?;

        if status == reqwest::StatusCode::BAD_REQUEST {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| "bad request".to_string());
            return Err(ApiError::BadRequest(message));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            error!(
                status = %status,
                path = %path,
                body = %truncate(&text),
                "commercetools returned non-success status"
            );
            return Err(ApiError::Unexpected {
                status: status.as_u16(),
                body: truncate(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(
                error = %e,
                path = %path,
                body = %truncate(&text),
                "failed to parse commercetools response"
            );
            ApiError::Parse(e)
        })
    }

    async fn update_customer(
        &self,
        id: &CustomerId,
        version: Version,
        actions: Vec<UpdateAction<'_>>,
    ) -> Result<RawCustomer, ApiError> {
        let request = CustomerUpdateRequest {
            version: version.as_u64(),
            actions,
        };
        self.post_json(&format!("/customers/{id}"), &request).await
    }
}

fn subtree_clause(category: &CategoryId) -> String {
    format!("categories.id:subtree(\"{category}\")")
}

fn truncate(body: &str) -> String {
    body.chars().take(500).collect()
}

impl CommerceApi for CommercetoolsClient {
    #[instrument(skip(self))]
    async fn get_categories(&self) -> Result<Vec<RawCategory>, ApiError> {
        let page: PagedResponse<RawCategory> = self
            .get_json(
                "/categories",
                &[("limit", CATEGORY_PAGE_LIMIT.to_string())],
            )
            .await?;
        Ok(page.results)
    }

    #[instrument(skip(self), fields(category = %id))]
    async fn get_products_by_category(
        &self,
        id: &CategoryId,
    ) -> Result<Vec<RawProductProjection>, ApiError> {
        let page: PagedResponse<RawProductProjection> = self
            .get_json(
                "/product-projections/search",
                &[
                    ("filter", subtree_clause(id)),
                    ("limit", PRODUCT_PAGE_LIMIT.to_string()),
                ],
            )
            .await?;
        Ok(page.results)
    }

    #[instrument(skip(self, filters), fields(category = %category))]
    async fn search_products(
        &self,
        category: &CategoryId,
        filters: &FilterQuery,
        sort: SortOption,
    ) -> Result<Vec<RawProductProjection>, ApiError> {
        let mut query: Vec<(&str, String)> = filters
            .iter()
            .map(|(dimension, values)| {
                let quoted = values
                    .iter()
                    .map(|value| format!("\"{value}\""))
                    .collect::<Vec<_>>()
                    .join(",");
                (
                    "filter",
                    format!("variants.attributes.{}.key:{quoted}", dimension.attribute_key()),
                )
            })
            .collect();
        query.push(("filter", subtree_clause(category)));
        if let Some(sort) = sort.query_param() {
            query.push(("sort", sort.to_string()));
        }
        query.push(("limit", PRODUCT_PAGE_LIMIT.to_string()));

        let page: PagedResponse<RawProductProjection> =
            self.get_json("/product-projections/search", &query).await?;
        Ok(page.results)
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn get_product_by_key(&self, key: &ProductKey) -> Result<RawProduct, ApiError> {
        self.get_json(&format!("/products/key={key}"), &[]).await
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<CustomerSignInResult, ApiError> {
        self.post_json("/login", &SignInBody { email, password })
            .await
    }

    #[instrument(skip(self, draft))]
    async fn sign_up(&self, draft: &CustomerDraft) -> Result<CustomerSignInResult, ApiError> {
        self.post_json("/customers", draft).await
    }

    #[instrument(skip(self))]
    async fn get_profile(&self) -> Result<RawCustomer, ApiError> {
        self.get_json("/me", &[]).await
    }

    #[instrument(skip(self), fields(customer = %id))]
    async fn remove_address(
        &self,
        id: &CustomerId,
        version: Version,
        address_id: &AddressId,
    ) -> Result<RawCustomer, ApiError> {
        self.update_customer(
            id,
            version,
            vec![UpdateAction::RemoveAddress {
                address_id: address_id.as_str(),
            }],
        )
        .await
    }

    #[instrument(skip(self, address), fields(customer = %id))]
    async fn change_address(
        &self,
        id: &CustomerId,
        version: Version,
        address_id: &AddressId,
        address: &AddressDraft,
    ) -> Result<RawCustomer, ApiError> {
        self.update_customer(
            id,
            version,
            vec![UpdateAction::ChangeAddress {
                address_id: address_id.as_str(),
                address,
            }],
        )
        .await
    }

    #[instrument(skip(self, address), fields(customer = %id))]
    async fn add_address(
        &self,
        id: &CustomerId,
        version: Version,
        address: &AddressDraft,
    ) -> Result<RawCustomer, ApiError> {
        self.update_customer(id, version, vec![UpdateAction::AddAddress { address }])
            .await
    }

    #[instrument(skip(self, data), fields(customer = %id))]
    async fn change_personal_data(
        &self,
        id: &CustomerId,
        version: Version,
        data: &PersonalData,
    ) -> Result<RawCustomer, ApiError> {
        let mut actions = Vec::new();
        if let Some(first_name) = data.first_name.as_deref() {
            actions.push(UpdateAction::SetFirstName { first_name });
        }
        if let Some(last_name) = data.last_name.as_deref() {
            actions.push(UpdateAction::SetLastName { last_name });
        }
        if let Some(email) = data.email.as_deref() {
            actions.push(UpdateAction::ChangeEmail { email });
        }
        self.update_customer(id, version, actions).await
    }

    #[instrument(skip(self, current_password, new_password), fields(customer = %id))]
    async fn change_password(
        &self,
        id: &CustomerId,
        version: Version,
        current_password: &str,
        new_password: &str,
    ) -> Result<RawCustomer, ApiError> {
        let request = ChangePasswordRequest {
            id: id.as_str(),
            version: version.as_u64(),
            current_password,
            new_password,
        };
        self.post_json("/customers/password", &request).await
    }

    fn clear_auth(&self) {
        *self
            .inner
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}
