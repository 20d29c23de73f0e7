//! Panel lifecycle
//!
//! At most one panel is live. The first lookup opens it, later lookups post
//! an update to it, and a close report from the editor clears it so the next
//! lookup opens a fresh one.

use tower_lsp::Client;
use url::Url;

use super::html::render_shell;
use super::protocol::{OpenPanel, OpenPanelParams, PanelId, PanelMessage, PostMessage, PostMessageParams};
use super::PRODUCT_LABEL;

/// Surface able to display documentation panels.
#[tower_lsp::async_trait]
pub trait PanelHost: Send + Sync {
    async fn open_panel(&self, params: OpenPanelParams);
    async fn post_message(&self, params: PostMessageParams);
}

#[tower_lsp::async_trait]
impl PanelHost for Client {
    async fn open_panel(&self, params: OpenPanelParams) {
        self.send_notification::<OpenPanel>(params).await;
    }

    async fn post_message(&self, params: PostMessageParams) {
        self.send_notification::<PostMessage>(params).await;
    }
}

/// What a call to [`PanelManager::show`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Opened(PanelId),
    Updated(PanelId),
}

/// Owns the reference to the current panel, if any.
#[derive(Debug, Default)]
pub struct PanelManager {
    current: Option<PanelId>,
    last_id: u64,
}

impl PanelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live panel, if one is open.
    pub fn current(&self) -> Option<PanelId> {
        self.current
    }

    /// Display `url`, opening a panel only when none is live.
    pub async fn show<H>(&mut self, host: &H, url: &Url) -> PanelAction
    where
        H: PanelHost + ?Sized,
    {
        match self.current {
            Some(panel_id) => {
                log::debug!("Updating panel {} to {}", panel_id.0, url);
                host.post_message(PostMessageParams {
                    panel_id,
                    message: PanelMessage::update_url(url.as_str()),
                })
                .await;
                PanelAction::Updated(panel_id)
            }
            None => {
                self.last_id += 1;
                let panel_id = PanelId(self.last_id);
                log::info!("Opening panel {} at {}", panel_id.0, url);
                host.open_panel(OpenPanelParams {
                    panel_id,
                    title: PRODUCT_LABEL.to_string(),
                    url: url.to_string(),
                    html: render_shell(PRODUCT_LABEL, url),
                })
                .await;
                self.current = Some(panel_id);
                PanelAction::Opened(panel_id)
            }
        }
    }

    /// Forget the panel the editor reports as closed.
    ///
    /// Returns `false` for ids that are not the live panel.
    pub fn close(&mut self, panel_id: PanelId) -> bool {
        if self.current == Some(panel_id) {
            log::info!("Panel {} closed", panel_id.0);
            self.current = None;
            true
        } else {
            log::debug!("Ignoring close of stale panel {}", panel_id.0);
            false
        }
    }
}
