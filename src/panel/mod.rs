//! Documentation Panel
//!
//! The editor owns the actual webview. This module decides whether a lookup
//! opens a new panel or updates the existing one, and defines the
//! notifications used to tell the editor which.

pub mod html;
pub mod manager;
pub mod protocol;

pub use manager::{PanelAction, PanelHost, PanelManager};
pub use protocol::{PanelId, PanelMessage};

/// Product label used as panel title and error message prefix.
pub const PRODUCT_LABEL: &str = "DevDocs";
