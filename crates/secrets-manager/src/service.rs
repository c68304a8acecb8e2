// crates/secrets-manager/src/service.rs
// ============================================================================
// Module: Secrets Manager Service
// Description: Typed entry points for every Secrets Manager operation.
// Purpose: Bind the options types to the base service handle.
// Dependencies: secrets-manager-core, tracing
// ============================================================================

//! ## Overview
//! [`SecretsManager`] wraps a [`BaseService`] and exposes two methods per
//! operation: one running in the background context and one bounded by a
//! caller-supplied [`CallContext`]. [`SecretsManager::execute`] is the generic
//! entry point and rejects absent options before any network I/O.
//! Invariants:
//! - Clones share the authenticator and transport but own their
//!   configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use secrets_manager_core::ApiResult;
use secrets_manager_core::Authenticator;
use secrets_manager_core::BaseService;
use secrets_manager_core::CallContext;
use secrets_manager_core::HttpRoundTripper;
use secrets_manager_core::Operation;
use secrets_manager_core::RetryPolicy;
use secrets_manager_core::SdkError;
use secrets_manager_core::ServiceOptions;
use secrets_manager_core::ServiceProperties;
use secrets_manager_core::config::DEFAULT_SERVICE_NAME;
use tracing::debug;

use crate::options::ActionOnConfigElementOptions;
use crate::options::CreateConfigElementOptions;
use crate::options::CreateNotificationsRegistrationOptions;
use crate::options::CreateSecretGroupOptions;
use crate::options::CreateSecretOptions;
use crate::options::DeleteConfigElementOptions;
use crate::options::DeleteNotificationsRegistrationOptions;
use crate::options::DeleteSecretGroupOptions;
use crate::options::DeleteSecretOptions;
use crate::options::GetConfigElementOptions;
use crate::options::GetConfigElementsOptions;
use crate::options::GetConfigOptions;
use crate::options::GetLocksOptions;
use crate::options::GetNotificationsRegistrationOptions;
use crate::options::GetPolicyOptions;
use crate::options::GetSecretGroupOptions;
use crate::options::GetSecretMetadataOptions;
use crate::options::GetSecretOptions;
use crate::options::GetSecretVersionLocksOptions;
use crate::options::GetSecretVersionMetadataOptions;
use crate::options::GetSecretVersionOptions;
use crate::options::ListAllSecretsOptions;
use crate::options::ListInstanceSecretsLocksOptions;
use crate::options::ListSecretGroupsOptions;
use crate::options::ListSecretVersionsOptions;
use crate::options::ListSecretsOptions;
use crate::options::LockSecretOptions;
use crate::options::LockSecretVersionOptions;
use crate::options::PutConfigOptions;
use crate::options::PutPolicyOptions;
use crate::options::SendTestNotificationOptions;
use crate::options::UnlockSecretOptions;
use crate::options::UnlockSecretVersionOptions;
use crate::options::UpdateConfigElementOptions;
use crate::options::UpdateSecretGroupMetadataOptions;
use crate::options::UpdateSecretMetadataOptions;
use crate::options::UpdateSecretOptions;
use crate::options::UpdateSecretVersionMetadataOptions;
use crate::options::UpdateSecretVersionOptions;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Public endpoint used when no URL is configured.
pub const DEFAULT_SERVICE_URL: &str = "https://secrets-manager.cloud.ibm.com";

// ============================================================================
// SECTION: Service
// ============================================================================

/// Secrets Manager client.
#[derive(Debug, Clone)]
pub struct SecretsManager {
    /// Dispatch core.
    service: BaseService,
}

impl SecretsManager {
    /// Creates a client from resolved options.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidField`] for a malformed URL and
    /// [`SdkError::Config`] for an unusable authenticator or transport.
    pub fn new(options: ServiceOptions) -> Result<Self, SdkError> {
        let service = BaseService::new(options)?;
        debug!(service = service.service_name(), url = service.service_url(), "secrets manager client created");
        Ok(Self {
            service,
        })
    }

    /// Creates a client from the `SECRETS_MANAGER_*` environment and the
    /// credentials file.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] for missing or malformed configuration.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::from_properties(&ServiceProperties::load(DEFAULT_SERVICE_NAME)?)
    }

    /// Creates a client from loaded properties.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] for missing or malformed configuration.
    pub fn from_properties(properties: &ServiceProperties) -> Result<Self, SdkError> {
        Self::new(properties.service_options(DEFAULT_SERVICE_URL)?)
    }

    /// Returns the endpoint of `instance_id` in `region`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidField`] for unsupported regions.
    pub fn service_url_for_region(instance_id: &str, region: &str) -> Result<String, SdkError> {
        secrets_manager_core::service_url_for_region(instance_id, region)
    }

    /// Returns the dispatch core.
    #[must_use]
    pub const fn base(&self) -> &BaseService {
        &self.service
    }

    /// Returns the base URL.
    #[must_use]
    pub fn service_url(&self) -> &str {
        self.service.service_url()
    }

    /// Replaces the base URL; an empty string unsets it.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidField`] when `url` is not an absolute URL.
    pub fn set_service_url(&mut self, url: impl Into<String>) -> Result<(), SdkError> {
        self.service.set_service_url(url)
    }

    /// Returns the authenticator.
    #[must_use]
    pub const fn authenticator(&self) -> &Arc<dyn Authenticator> {
        self.service.authenticator()
    }

    /// Replaces the authenticator.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the authenticator fails validation.
    pub fn set_authenticator(&mut self, authenticator: Arc<dyn Authenticator>) -> Result<(), SdkError> {
        self.service.set_authenticator(authenticator)
    }

    /// Replaces the transport.
    pub fn set_transport(&mut self, transport: Arc<dyn HttpRoundTripper>) {
        self.service.set_transport(transport);
    }

    /// Enables retries; zero values select the defaults.
    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        self.service.enable_retries(max_retries, max_interval);
    }

    /// Installs an explicit retry policy.
    pub const fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.service.set_retry_policy(policy);
    }

    /// Disables retries.
    pub const fn disable_retries(&mut self) {
        self.service.disable_retries();
    }

    /// Replaces the default headers.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidField`] for names or values HTTP cannot carry.
    pub fn set_default_headers(&mut self, headers: &BTreeMap<String, String>) -> Result<(), SdkError> {
        self.service.set_default_headers(headers)
    }

    /// Enables or disables request compression.
    pub const fn set_enable_gzip(&mut self, enable: bool) {
        self.service.set_enable_gzip(enable);
    }

    /// Runs any operation; `None` options fail with [`SdkError::MissingOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for pre-flight, transport, HTTP, and decode failures.
    pub async fn execute<O: Operation>(&self, options: Option<&O>, ctx: &CallContext) -> ApiResult<O::Output> {
        self.service.execute(options, ctx).await
    }
}

// ============================================================================
// SECTION: Typed Operations
// ============================================================================

/// Generates the background and context-bounded method pair per operation.
macro_rules! operations {
    ($( $doc:literal $name:ident, $name_with_context:ident => $options:ty; )+) => {
        impl SecretsManager {
            $(
                #[doc = $doc]
                ///
                /// # Errors
                ///
                /// Returns [`SdkError`] for pre-flight, transport, HTTP, and
                /// decode failures.
                pub async fn $name(&self, options: &$options) -> ApiResult<<$options as Operation>::Output> {
                    self.service.execute(Some(options), &CallContext::background()).await
                }

                #[doc = $doc]
                /// Cancelled or bounded by `ctx`.
                ///
                /// # Errors
                ///
                /// Returns [`SdkError::Cancelled`] or [`SdkError::DeadlineExceeded`]
                /// when `ctx` ends the call, and the failures of the plain form.
                pub async fn $name_with_context(
                    &self,
                    options: &$options,
                    ctx: &CallContext,
                ) -> ApiResult<<$options as Operation>::Output> {
                    self.service.execute(Some(options), ctx).await
                }
            )+
        }
    };
}

operations! {
    "Creates a secret group."
    create_secret_group, create_secret_group_with_context => CreateSecretGroupOptions;
    "Lists secret groups."
    list_secret_groups, list_secret_groups_with_context => ListSecretGroupsOptions;
    "Reads a secret group."
    get_secret_group, get_secret_group_with_context => GetSecretGroupOptions;
    "Updates the name or description of a secret group."
    update_secret_group_metadata, update_secret_group_metadata_with_context => UpdateSecretGroupMetadataOptions;
    "Deletes an empty secret group."
    delete_secret_group, delete_secret_group_with_context => DeleteSecretGroupOptions;
    "Creates a secret."
    create_secret, create_secret_with_context => CreateSecretOptions;
    "Lists secrets of one type."
    list_secrets, list_secrets_with_context => ListSecretsOptions;
    "Lists secrets of every type."
    list_all_secrets, list_all_secrets_with_context => ListAllSecretsOptions;
    "Reads a secret with its payload."
    get_secret, get_secret_with_context => GetSecretOptions;
    "Runs an action such as rotate or revoke on a secret."
    update_secret, update_secret_with_context => UpdateSecretOptions;
    "Deletes a secret."
    delete_secret, delete_secret_with_context => DeleteSecretOptions;
    "Lists the versions of a secret."
    list_secret_versions, list_secret_versions_with_context => ListSecretVersionsOptions;
    "Reads one version of a secret with its payload."
    get_secret_version, get_secret_version_with_context => GetSecretVersionOptions;
    "Runs an action on one version of a secret."
    update_secret_version, update_secret_version_with_context => UpdateSecretVersionOptions;
    "Reads the metadata of one secret version."
    get_secret_version_metadata, get_secret_version_metadata_with_context => GetSecretVersionMetadataOptions;
    "Updates the metadata of one secret version."
    update_secret_version_metadata, update_secret_version_metadata_with_context => UpdateSecretVersionMetadataOptions;
    "Reads the metadata of a secret."
    get_secret_metadata, get_secret_metadata_with_context => GetSecretMetadataOptions;
    "Updates the metadata of a secret."
    update_secret_metadata, update_secret_metadata_with_context => UpdateSecretMetadataOptions;
    "Lists the locks of a secret."
    get_locks, get_locks_with_context => GetLocksOptions;
    "Locks the current version of a secret."
    lock_secret, lock_secret_with_context => LockSecretOptions;
    "Releases locks from the current version of a secret."
    unlock_secret, unlock_secret_with_context => UnlockSecretOptions;
    "Lists the locks of one secret version."
    get_secret_version_locks, get_secret_version_locks_with_context => GetSecretVersionLocksOptions;
    "Locks one version of a secret."
    lock_secret_version, lock_secret_version_with_context => LockSecretVersionOptions;
    "Releases locks from one version of a secret."
    unlock_secret_version, unlock_secret_version_with_context => UnlockSecretVersionOptions;
    "Lists locks across the instance."
    list_instance_secrets_locks, list_instance_secrets_locks_with_context => ListInstanceSecretsLocksOptions;
    "Stores the rotation policy of a secret."
    put_policy, put_policy_with_context => PutPolicyOptions;
    "Reads the rotation policy of a secret."
    get_policy, get_policy_with_context => GetPolicyOptions;
    "Writes the configuration of a secret engine."
    put_config, put_config_with_context => PutConfigOptions;
    "Reads the configuration of a secret engine."
    get_config, get_config_with_context => GetConfigOptions;
    "Adds a config element to a secret engine."
    create_config_element, create_config_element_with_context => CreateConfigElementOptions;
    "Lists the config elements of one kind."
    get_config_elements, get_config_elements_with_context => GetConfigElementsOptions;
    "Reads one config element."
    get_config_element, get_config_element_with_context => GetConfigElementOptions;
    "Replaces the payload of one config element."
    update_config_element, update_config_element_with_context => UpdateConfigElementOptions;
    "Deletes one config element."
    delete_config_element, delete_config_element_with_context => DeleteConfigElementOptions;
    "Runs an action such as sign or revoke on a config element."
    action_on_config_element, action_on_config_element_with_context => ActionOnConfigElementOptions;
    "Registers an Event Notifications instance."
    create_notifications_registration, create_notifications_registration_with_context => CreateNotificationsRegistrationOptions;
    "Reads the Event Notifications registration."
    get_notifications_registration, get_notifications_registration_with_context => GetNotificationsRegistrationOptions;
    "Removes the Event Notifications registration."
    delete_notifications_registration, delete_notifications_registration_with_context => DeleteNotificationsRegistrationOptions;
    "Sends a test event to the registered Event Notifications instance."
    send_test_notification, send_test_notification_with_context => SendTestNotificationOptions;
}
