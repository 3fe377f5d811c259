//! Background web-push display stub.
//!
//! Mirrors the service-worker side of incident pushes: turn a raw data
//! payload into a deduplicated notification display, and decide what a
//! notification click should do with the host's open windows. Stateless
//! beyond "focus or open the single known root URL".

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "Incident Update";
pub const DEFAULT_BODY: &str = "An incident status has changed";
pub const DEFAULT_TAG: &str = "default";
pub const ROOT_URL: &str = "/";

/// Raw push payload as delivered to the background handler. Every field is
/// optional; absent ones fall back to defaults at display time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PushPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<PushNotificationFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PushData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PushNotificationFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PushData {
    #[serde(
        rename = "incidentId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub incident_id: Option<String>,
    /// Carried through to the display untouched so the click handler can
    /// hand the host whatever the sender attached.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Action button identifiers on the rendered notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushAction {
    View,
    Close,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionButton {
    pub action: PushAction,
    pub title: String,
}

/// Fully resolved notification the host should render. The tag doubles as
/// the identity slot: a second push for the same incident replaces the
/// previous display instead of stacking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PushDisplay {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub require_interaction: bool,
    pub actions: Vec<ActionButton>,
    pub data: serde_json::Map<String, Value>,
}

pub fn parse_payload(value: Value) -> Result<PushPayload> {
    serde_json::from_value(value).context("malformed push payload")
}

pub fn build_display(payload: &PushPayload) -> PushDisplay {
    let fields = payload.notification.clone().unwrap_or_default();
    let data = payload.data.clone().unwrap_or_default();
    let tag = data
        .incident_id
        .clone()
        .unwrap_or_else(|| DEFAULT_TAG.to_string());
    tracing::debug!(%tag, "building push display");
    PushDisplay {
        title: fields.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        body: fields.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
        tag,
        require_interaction: true,
        actions: vec![
            ActionButton {
                action: PushAction::View,
                title: "View Details".to_string(),
            },
            ActionButton {
                action: PushAction::Close,
                title: "Dismiss".to_string(),
            },
        ],
        data: data.extra,
    }
}

/// An already-open host window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientHandle {
    pub id: String,
    pub url: String,
}

/// What the host should do after a notification click. The notification
/// itself is always closed first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClickOutcome {
    /// Bring an existing root-URL window to the front.
    FocusExisting { client_id: String },
    /// No suitable window is open; open a fresh one at the root URL.
    OpenRoot,
    /// Dismiss only.
    None,
}

/// Click routing for the rendered notification. `action` is `None` for a
/// bare click on the notification body.
pub fn route_click(action: Option<PushAction>, clients: &[ClientHandle]) -> ClickOutcome {
    match action {
        Some(PushAction::View) | None => {}
        Some(PushAction::Close) => return ClickOutcome::None,
    }
    if let Some(client) = clients.iter().find(|client| client.url == ROOT_URL) {
        return ClickOutcome::FocusExisting {
            client_id: client.id.clone(),
        };
    }
    ClickOutcome::OpenRoot
}
