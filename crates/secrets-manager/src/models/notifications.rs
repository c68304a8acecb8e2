// crates/secrets-manager/src/models/notifications.rs
// ============================================================================
// Module: Notifications
// Description: Event Notifications registration records.
// Purpose: Model the instance-level notification destination.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Event Notifications registration bodies and the settings read back.

use serde::Deserialize;
use serde::Serialize;

/// Body registering an Event Notifications instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsRegistration {
    /// CRN of the Event Notifications instance.
    pub event_notifications_instance_crn: String,
    /// Source name shown in Event Notifications.
    pub event_notifications_source_name: String,
    /// Source description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_notifications_source_description: Option<String>,
}

/// Current notification registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsSettings {
    /// CRN of the registered Event Notifications instance.
    #[serde(default)]
    pub event_notifications_instance_crn: String,
}
