use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_lsp::jsonrpc::{Error as LspError, Result as LspResult};
use tower_lsp::lsp_types::*;

use crate::lookup::{dispatch, LookupRequest};
use crate::lsp::backend::Backend;
use crate::panel::{PanelAction, PRODUCT_LABEL};
use crate::selection::resolve_selection;

/// Command that looks up the selection in the documentation panel.
pub const LOOKUP_COMMAND: &str = "devdocs.lookup";

/// Argument of [`LOOKUP_COMMAND`]: where the editor's selection is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupArguments {
    pub text_document: TextDocumentIdentifier,
    pub selection: Range,
}

impl LookupArguments {
    /// Parse the first command argument; anything else is ignored.
    pub fn from_arguments(arguments: Vec<Value>) -> Option<Self> {
        let first = arguments.into_iter().next()?;
        match serde_json::from_value(first) {
            Ok(args) => Some(args),
            Err(e) => {
                log::debug!("Ignoring malformed {} arguments: {}", LOOKUP_COMMAND, e);
                None
            }
        }
    }
}

/// Result of a successful lookup, returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupOutcome {
    pub url: String,
    pub panel_id: u64,
    /// `true` when a new panel was opened, `false` when the live one was updated
    pub opened: bool,
}

/// Trait for handling `workspace/executeCommand`
#[tower_lsp::async_trait]
pub trait HandleExecuteCommand {
    async fn handle_execute_command(&self, params: ExecuteCommandParams)
    -> LspResult<Option<Value>>;
}

/// Trait for handling code actions
#[tower_lsp::async_trait]
pub trait HandleCodeAction {
    async fn handle_code_action(
        &self,
        params: CodeActionParams,
    ) -> LspResult<Option<CodeActionResponse>>;
}

#[tower_lsp::async_trait]
impl HandleExecuteCommand for Backend {
    async fn handle_execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> LspResult<Option<Value>> {
        if params.command != LOOKUP_COMMAND {
            return Err(LspError::invalid_params(format!(
                "unknown command '{}'",
                params.command
            )));
        }

        let args = match LookupArguments::from_arguments(params.arguments) {
            Some(args) => args,
            None => return Ok(None),
        };
        let uri = args.text_document.uri;

        // Resolve against a snapshot so the document lock is not held while
        // talking to the client.
        let (resolved, language_id) = {
            let docs = self.documents.lock().await;
            let doc = match docs.get(&uri) {
                Some(doc) => doc,
                None => {
                    log::debug!("Lookup in unknown document {}", uri);
                    return Ok(None);
                }
            };
            (
                resolve_selection(&doc.content, args.selection),
                doc.language().map(str::to_string),
            )
        };

        let text = match resolved {
            Ok(text) => text,
            Err(e) if e.is_user_facing() => {
                self.client
                    .show_message(MessageType::ERROR, format!("[{}]: {}", PRODUCT_LABEL, e))
                    .await;
                return Ok(None);
            }
            Err(e) => {
                log::warn!("Lookup in {} aborted: {}", uri, e);
                return Ok(None);
            }
        };

        let request = LookupRequest::new(text, language_id.as_deref());
        let base_url = self.base_url_for(&uri).await;

        let mut panels = self.panels.lock().await;
        let (url, action) = dispatch(&mut panels, &self.client, &request, &base_url).await;
        drop(panels);

        let outcome = match action {
            PanelAction::Opened(id) => LookupOutcome {
                url: url.to_string(),
                panel_id: id.0,
                opened: true,
            },
            PanelAction::Updated(id) => LookupOutcome {
                url: url.to_string(),
                panel_id: id.0,
                opened: false,
            },
        };
        Ok(serde_json::to_value(outcome).ok())
    }
}

#[tower_lsp::async_trait]
impl HandleCodeAction for Backend {
    async fn handle_code_action(
        &self,
        params: CodeActionParams,
    ) -> LspResult<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;
        let range = params.range;

        let docs = self.documents.lock().await;
        let doc = match docs.get(&uri) {
            Some(doc) => doc,
            None => return Ok(None),
        };

        // Offer the action only where the lookup would succeed.
        let text = match resolve_selection(&doc.content, range) {
            Ok(text) => text,
            Err(_) => return Ok(None),
        };

        let args = LookupArguments {
            text_document: TextDocumentIdentifier { uri },
            selection: range,
        };
        let title = format!("Look up \"{}\" in {}", text, PRODUCT_LABEL);
        let action = CodeAction {
            title: title.clone(),
            command: Some(Command {
                title,
                command: LOOKUP_COMMAND.to_string(),
                arguments: serde_json::to_value(args).ok().map(|arg| vec![arg]),
            }),
            ..Default::default()
        };

        Ok(Some(vec![CodeActionOrCommand::CodeAction(action)]))
    }
}
