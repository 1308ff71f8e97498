//! User session store.
//!
//! Owns the authentication phase, the signed-in customer's profile, the
//! registration draft, and the single-slot error/notice messages. The
//! only durable state is the remembered login flag, written through the
//! [`LoginFlagStorage`] boundary on every logged-in transition.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;
use wildberry_core::AddressId;

use crate::commercetools::conversions::profile_from_customer;
use crate::commercetools::wire::{AddressDraft, CustomerDraft, PersonalData};
use crate::commercetools::{ApiError, CommerceApi, CustomerProfile};
use crate::storage::LoginFlagStorage;

use super::observer::{ObserverId, ObserverSet};

/// Canned message for every login failure. Backend detail is never
/// surfaced to the user.
pub const CREDENTIALS_ERROR: &str = "Customer account with the given credentials not found";
/// Canned message for every sign-up failure.
pub const DUPLICATE_ACCOUNT_ERROR: &str = "An account with this email already exists";
/// Generic message for a failed profile mutation.
pub const PROFILE_UPDATE_ERROR: &str = "Error updating profile";
/// Messages distinguishing password-change outcomes.
pub const PASSWORD_CHANGED_NOTICE: &str = "Password changed successfully";
pub const PASSWORD_CHANGE_ERROR: &str = "Error changing password";

/// The session state machine's phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
    LoggingOut,
}

/// Accumulated sign-up form data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub street_name: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl RegistrationDraft {
    fn has_address(&self) -> bool {
        !self.street_name.is_empty() || !self.city.is_empty() || !self.postal_code.is_empty()
    }

    fn address_draft(&self) -> AddressDraft {
        AddressDraft {
            first_name: non_empty(&self.first_name),
            last_name: non_empty(&self.last_name),
            street_name: non_empty(&self.street_name),
            city: non_empty(&self.city),
            postal_code: non_empty(&self.postal_code),
            country: self.country.clone(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// A profile mutation command, matched exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileUpdate {
    RemoveAddress {
        address_id: AddressId,
    },
    ChangeAddress {
        address_id: AddressId,
        address: AddressDraft,
    },
    AddAddress {
        address: AddressDraft,
    },
    ChangePersonalData {
        data: PersonalData,
    },
    ChangePassword {
        current_password: String,
        new_password: String,
    },
}

#[derive(Debug, Default)]
struct SessionState {
    phase: SessionPhase,
    profile: Option<CustomerProfile>,
    draft: RegistrationDraft,
    error: Option<String>,
    notice: Option<String>,
    /// The remembered flag from the last run, pending re-validation.
    was_logged_in: bool,
}

/// Observable session store over a commerce API.
pub struct SessionStore<C> {
    api: C,
    storage: Arc<dyn LoginFlagStorage>,
    state: Mutex<SessionState>,
    observers: ObserverSet,
}

impl<C: CommerceApi> SessionStore<C> {
    /// Create the store, reading the remembered login flag once.
    #[must_use]
    pub fn new(api: C, storage: Arc<dyn LoginFlagStorage>) -> Self {
        let was_logged_in = storage.read();
        Self {
            api,
            storage,
            state: Mutex::new(SessionState {
                was_logged_in,
                ..SessionState::default()
            }),
            observers: ObserverSet::new(),
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
    // Authentication
    // =========================================================================

    /// Re-validate the remembered login flag against the backend.
    ///
    /// Best-effort: a profile fetch that succeeds promotes straight to
    /// authenticated; only an explicit rejection demotes and clears the
    /// flag. A network failure changes nothing, absence of a
    /// contradicting signal is treated as still logged in.
    pub async fn restore(&self) {
        if !self.read(|state| state.was_logged_in) {
            return;
        }

        match self.api.get_profile().await {
            Ok(customer) => {
                self.persist_flag(true);
                self.mutate(|state| {
                    state.phase = SessionPhase::Authenticated;
                    state.profile = Some(profile_from_customer(customer));
                });
            }
            Err(
                error @ (ApiError::BadRequest(_) | ApiError::Auth(_) | ApiError::NotFound(_)),
            ) => {
                warn!(%error, "remembered session rejected by backend");
                self.persist_flag(false);
                self.mutate(|state| {
                    state.phase = SessionPhase::Anonymous;
                    state.was_logged_in = false;
                });
            }
            Err(error) => {
                warn!(%error, "session re-validation unreachable, keeping flag");
            }
        }
    }

    /// Authenticate with email and password.
    ///
    /// Every failure, explicit rejection or otherwise, collapses to the
    /// same canned credential message.
    pub async fn login(&self, email: &str, password: &str) {
        self.mutate(|state| {
            state.phase = SessionPhase::Authenticating;
            state.error = None;
        });

        match self.api.login(email, password).await {
            Ok(result) => {
                self.persist_flag(true);
                self.mutate(|state| {
                    state.phase = SessionPhase::Authenticated;
                    state.profile = Some(profile_from_customer(result.customer));
                    state.was_logged_in = true;
                });
            }
            Err(error) => {
                warn!(%error, "login failed");
                self.mutate(|state| {
                    state.phase = SessionPhase::Anonymous;
                    state.error = Some(CREDENTIALS_ERROR.to_string());
                });
            }
        }
    }

    /// Submit the accumulated registration draft.
    ///
    /// Success signs the customer in and, as a side effect, provisions a
    /// default address from the draft's address fields. Any failure
    /// yields the duplicate-account message.
    pub async fn sign_up(&self) {
        let draft = self.mutate(|state| {
            state.phase = SessionPhase::Authenticating;
            state.error = None;
            state.draft.clone()
        });

        let customer_draft = CustomerDraft {
            email: draft.email.clone(),
            password: draft.password.clone(),
            first_name: non_empty(&draft.first_name),
            last_name: non_empty(&draft.last_name),
        };

        match self.api.sign_up(&customer_draft).await {
            Ok(result) => {
                let mut profile = profile_from_customer(result.customer);

                // Best-effort: the account exists either way.
                if draft.has_address() {
                    match self
                        .api
                        .add_address(&profile.id, profile.version, &draft.address_draft())
                        .await
                    {
                        Ok(customer) => profile = profile_from_customer(customer),
                        Err(error) => {
                            warn!(%error, "default address provisioning failed");
                        }
                    }
                }

                self.persist_flag(true);
                self.mutate(|state| {
                    state.phase = SessionPhase::Authenticated;
                    state.profile = Some(profile);
                    state.draft = RegistrationDraft::default();
                    state.was_logged_in = true;
                });
            }
            Err(error) => {
                warn!(%error, "sign-up failed");
                self.mutate(|state| {
                    state.phase = SessionPhase::Anonymous;
                    state.error = Some(DUPLICATE_ACCOUNT_ERROR.to_string());
                });
            }
        }
    }

    /// Sign out: clear the persisted flag, the client's token, and all
    /// in-memory session state.
    pub fn logout(&self) {
        self.mutate(|state| state.phase = SessionPhase::LoggingOut);

        self.persist_flag(false);
        self.api.clear_auth();

        self.mutate(|state| {
            state.phase = SessionPhase::Anonymous;
            state.profile = None;
            state.draft = RegistrationDraft::default();
            state.error = None;
            state.notice = None;
            state.was_logged_in = false;
        });
    }

    // =========================================================================
    // Profile Mutations
    // =========================================================================

    /// Apply a profile mutation, forwarding the profile's current
    /// version token.
    ///
    /// On success the stored profile is replaced wholesale with the
    /// response body. Only a password change has distinct messaging;
    /// every other failure sets the generic error slot.
    pub async fn update_profile(&self, update: ProfileUpdate) {
        let Some((id, version)) =
            self.read(|state| state.profile.as_ref().map(|p| (p.id.clone(), p.version)))
        else {
            self.mutate(|state| state.error = Some(PROFILE_UPDATE_ERROR.to_string()));
            return;
        };

        let is_password_change = matches!(update, ProfileUpdate::ChangePassword { .. });

        let result = match update {
            ProfileUpdate::RemoveAddress { address_id } => {
                self.api.remove_address(&id, version, &address_id).await
            }
            ProfileUpdate::ChangeAddress {
                address_id,
                address,
            } => {
                self.api
                    .change_address(&id, version, &address_id, &address)
                    .await
            }
            ProfileUpdate::AddAddress { address } => {
                self.api.add_address(&id, version, &address).await
            }
            ProfileUpdate::ChangePersonalData { data } => {
                self.api.change_personal_data(&id, version, &data).await
            }
            ProfileUpdate::ChangePassword {
                current_password,
                new_password,
            } => {
                self.api
                    .change_password(&id, version, &current_password, &new_password)
                    .await
            }
        };

        match result {
            Ok(customer) => {
                self.mutate(|state| {
                    state.profile = Some(profile_from_customer(customer));
                    state.error = None;
                    if is_password_change {
                        state.notice = Some(PASSWORD_CHANGED_NOTICE.to_string());
                    }
                });
            }
            Err(error) => {
                warn!(%error, "profile update failed");
                self.mutate(|state| {
                    state.error = Some(if is_password_change {
                        PASSWORD_CHANGE_ERROR.to_string()
                    } else {
                        PROFILE_UPDATE_ERROR.to_string()
                    });
                });
            }
        }
    }

    // =========================================================================
    // Draft
    // =========================================================================

    /// Mutate the registration draft in place.
    pub fn update_draft(&self, f: impl FnOnce(&mut RegistrationDraft)) {
        self.mutate(|state| f(&mut state.draft));
    }

    #[must_use]
    pub fn draft(&self) -> RegistrationDraft {
        self.read(|state| state.draft.clone())
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.read(|state| state.phase)
    }

    /// Whether the customer is currently signed in.
    #[must_use]
    pub fn logged_in(&self) -> bool {
        self.phase() == SessionPhase::Authenticated
    }

    /// The remembered flag from the previous run, before re-validation.
    #[must_use]
    pub fn was_logged_in(&self) -> bool {
        self.read(|state| state.was_logged_in)
    }

    #[must_use]
    pub fn profile(&self) -> Option<CustomerProfile> {
        self.read(|state| state.profile.clone())
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.read(|state| state.error.clone())
    }

    #[must_use]
    pub fn notice(&self) -> Option<String> {
        self.read(|state| state.notice.clone())
    }

    pub fn clear_error(&self) {
        self.mutate(|state| state.error = None);
    }

    pub fn clear_notice(&self) {
        self.mutate(|state| state.notice = None);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn persist_flag(&self, logged_in: bool) {
        if let Err(error) = self.storage.write(logged_in) {
            warn!(%error, "failed to persist login flag");
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.lock())
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let result = f(&mut self.lock());
        self.observers.notify();
        result
    }
}
