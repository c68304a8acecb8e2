// crates/secrets-manager/src/options/notifications.rs
// ============================================================================
// Module: Notification Options
// Description: Options for the Event Notifications registration.
// Purpose: Register, read, remove, and test the notification destination.
// Dependencies: secrets-manager-core, serde_json
// ============================================================================

//! ## Overview
//! Notification operations act on the instance, so none of them take a
//! secret path.

use secrets_manager_core::CodecError;
use secrets_manager_core::Envelope;
use secrets_manager_core::HeaderBag;
use secrets_manager_core::HttpMethod;
use secrets_manager_core::Operation;
use secrets_manager_core::OperationDescriptor;
use secrets_manager_core::codec;
use secrets_manager_core::response::decode_json;
use serde_json::Value;

use crate::models::NotificationsRegistration;
use crate::models::NotificationsSettings;
use crate::options::header_setter;

/// Options for `create_notifications_registration`.
#[derive(Debug, Clone, Default)]
pub struct CreateNotificationsRegistrationOptions {
    /// Registration body.
    pub registration: NotificationsRegistration,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl CreateNotificationsRegistrationOptions {
    /// Options registering the Event Notifications instance `instance_crn`.
    #[must_use]
    pub fn new(instance_crn: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            registration: NotificationsRegistration {
                event_notifications_instance_crn: instance_crn.into(),
                event_notifications_source_name: source_name.into(),
                event_notifications_source_description: None,
            },
            headers: HeaderBag::new(),
        }
    }

    /// Sets the source description.
    #[must_use]
    pub fn with_source_description(mut self, description: impl Into<String>) -> Self {
        self.registration.event_notifications_source_description = Some(description.into());
        self
    }
}

impl Operation for CreateNotificationsRegistrationOptions {
    type Output = Envelope<NotificationsSettings>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "create_notifications_registration",
        name: "CreateNotificationsRegistration",
        method: HttpMethod::Post,
        path: "/api/v1/notifications/registration",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), CodecError> {
        codec::require_str(
            "event_notifications_instance_crn",
            &self.registration.event_notifications_instance_crn,
        )?;
        codec::require_str(
            "event_notifications_source_name",
            &self.registration.event_notifications_source_name,
        )
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        Ok(Some(serde_json::to_value(&self.registration)?))
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

/// Options for `get_notifications_registration`.
#[derive(Debug, Clone, Default)]
pub struct GetNotificationsRegistrationOptions {
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetNotificationsRegistrationOptions {
    /// Options reading the registration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Operation for GetNotificationsRegistrationOptions {
    type Output = Envelope<NotificationsSettings>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_notifications_registration",
        name: "GetNotificationsRegistration",
        method: HttpMethod::Get,
        path: "/api/v1/notifications/registration",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

/// Options for `delete_notifications_registration`.
#[derive(Debug, Clone, Default)]
pub struct DeleteNotificationsRegistrationOptions {
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl DeleteNotificationsRegistrationOptions {
    /// Options removing the registration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Operation for DeleteNotificationsRegistrationOptions {
    type Output = ();

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "delete_notifications_registration",
        name: "DeleteNotificationsRegistration",
        method: HttpMethod::Delete,
        path: "/api/v1/notifications/registration",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, _body: &[u8]) -> Result<Self::Output, CodecError> {
        Ok(())
    }
}

/// Options for `send_test_notification`.
#[derive(Debug, Clone, Default)]
pub struct SendTestNotificationOptions {
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl SendTestNotificationOptions {
    /// Options sending a test event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Operation for SendTestNotificationOptions {
    type Output = ();

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "send_test_notification",
        name: "SendTestNotification",
        method: HttpMethod::Get,
        path: "/api/v1/notifications/test",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, _body: &[u8]) -> Result<Self::Output, CodecError> {
        Ok(())
    }
}

header_setter!(
    CreateNotificationsRegistrationOptions,
    GetNotificationsRegistrationOptions,
    DeleteNotificationsRegistrationOptions,
    SendTestNotificationOptions,
);
