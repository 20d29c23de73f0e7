use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::config::{Settings, SETTINGS_SECTION};
use crate::lsp::document::DocumentState;
use crate::lsp::handlers::{HandleCodeAction, HandleExecuteCommand, LOOKUP_COMMAND};
use crate::panel::protocol::PanelClosedParams;
use crate::panel::PanelManager;
use crate::Config;

/// The main LSP backend that holds state and implements the Language Server Protocol
pub struct Backend {
    pub client: Client,
    pub documents: Arc<Mutex<HashMap<Url, DocumentState>>>,
    pub panels: Arc<Mutex<PanelManager>>,
    pub config: Config,
    supports_configuration: AtomicBool,
}

impl Backend {
    pub fn new(client: Client, config: Config) -> Self {
        Self {
            client,
            documents: Arc::new(Mutex::new(HashMap::new())),
            panels: Arc::new(Mutex::new(PanelManager::new())),
            config,
            supports_configuration: AtomicBool::new(false),
        }
    }

    /// Handle `devdocs/panelClosed` from the editor.
    pub async fn panel_closed(&self, params: PanelClosedParams) {
        let mut panels = self.panels.lock().await;
        panels.close(params.panel_id);
    }

    /// Base URL for a lookup in `uri`, with workspace settings fetched fresh.
    pub async fn base_url_for(&self, uri: &Url) -> String {
        let settings = if self.supports_configuration.load(Ordering::Relaxed) {
            self.fetch_settings(uri).await
        } else {
            Settings::default()
        };
        self.config.resolve_base_url(&settings)
    }

    async fn fetch_settings(&self, uri: &Url) -> Settings {
        let items = vec![ConfigurationItem {
            scope_uri: Some(uri.clone()),
            section: Some(SETTINGS_SECTION.to_string()),
        }];
        match self.client.configuration(items).await {
            Ok(values) => values
                .into_iter()
                .next()
                .map(Settings::from_value)
                .unwrap_or_default(),
            Err(e) => {
                log::warn!("workspace/configuration failed: {}", e);
                Settings::default()
            }
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
        let supports_configuration = params
            .capabilities
            .workspace
            .as_ref()
            .and_then(|workspace| workspace.configuration)
            .unwrap_or(false);
        self.supports_configuration
            .store(supports_configuration, Ordering::Relaxed);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![LOOKUP_COMMAND.to_string()],
                    work_done_progress_options: Default::default(),
                }),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "devdocs-language-server initialized")
            .await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        Ok(())
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> LspResult<Option<serde_json::Value>> {
        self.handle_execute_command(params).await
    }

    async fn code_action(&self, params: CodeActionParams) -> LspResult<Option<CodeActionResponse>> {
        self.handle_code_action(params).await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let mut docs = self.documents.lock().await;
        docs.insert(doc.uri, DocumentState::new(doc.text, doc.language_id));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some(change) = params.content_changes.into_iter().last() {
            let mut docs = self.documents.lock().await;
            if let Some(doc) = docs.get_mut(&uri) {
                doc.content = change.text;
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let mut docs = self.documents.lock().await;
        docs.remove(&params.text_document.uri);
    }
}
