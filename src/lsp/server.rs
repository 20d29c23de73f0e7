use anyhow::Result;
use tokio::io::{stdin, stdout};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::{LspService, Server};

use crate::lsp::backend::Backend;
use crate::panel::protocol::PanelClosed;
use crate::Config;

/// Start the LSP server on stdio
pub async fn serve(config: Config) -> Result<()> {
    log::info!(
        "Starting devdocs-language-server {} (config file: {:?})",
        env!("CARGO_PKG_VERSION"),
        config.config_file
    );

    let (service, socket) = LspService::build(move |client| Backend::new(client, config))
        .custom_method(PanelClosed::METHOD, Backend::panel_closed)
        .finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
