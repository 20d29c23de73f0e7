//! DevDocs Language Server
//!
//! Looks up the word under the cursor (or the selected text) on a
//! documentation site and shows the result in a single reusable editor panel.
//!
//! This library provides:
//! - Selection resolution against open documents
//! - Editor language to documentation tag mapping
//! - Lookup URL construction
//! - Panel lifecycle and the panel notification protocol
//! - LSP protocol implementation
//! - Configuration management

pub mod config;
pub mod error;
pub mod language;
pub mod lookup;
pub mod lsp;
pub mod panel;
pub mod selection;

pub use config::Config;
pub use error::LookupError;
pub use language::map_language;
pub use lookup::{dispatch, LookupRequest};
pub use panel::{PanelAction, PanelHost, PanelManager};
pub use selection::resolve_selection;
