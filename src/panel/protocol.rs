//! Panel notifications exchanged with the editor.
//!
//! - `devdocs/openPanel` (server → client): create and reveal a panel
//! - `devdocs/postMessage` (server → client): forward a message to the panel page
//! - `devdocs/panelClosed` (client → server): the user closed the panel

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;

/// Identifies one panel instance for the lifetime of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPanelParams {
    pub panel_id: PanelId,
    pub title: String,
    pub url: String,
    /// Page shell to load into the webview
    pub html: String,
}

/// Message understood by the panel page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelMessage {
    pub command: String,
    pub text: String,
}

impl PanelMessage {
    /// Command re-pointing the embedded page at a new URL.
    pub const UPDATE_URL: &'static str = "UPDATE_URL";

    pub fn update_url(url: impl Into<String>) -> Self {
        Self {
            command: Self::UPDATE_URL.to_string(),
            text: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageParams {
    pub panel_id: PanelId,
    pub message: PanelMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelClosedParams {
    pub panel_id: PanelId,
}

pub enum OpenPanel {}

impl Notification for OpenPanel {
    type Params = OpenPanelParams;
    const METHOD: &'static str = "devdocs/openPanel";
}

pub enum PostMessage {}

impl Notification for PostMessage {
    type Params = PostMessageParams;
    const METHOD: &'static str = "devdocs/postMessage";
}

pub enum PanelClosed {}

impl Notification for PanelClosed {
    type Params = PanelClosedParams;
    const METHOD: &'static str = "devdocs/panelClosed";
}
