//! Drives the `devdocs-ls` binary over stdio through the lookup command and
//! the panel notifications.
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdout, Command, Stdio};

use serde_json::{json, Value};

const DOC_URI: &str = "file:///tmp/devdocs-ls-test/run.sh";
const DOC_TEXT: &str = "#!/bin/sh\nps aux | grep sshd\nfind . -name '*.log'\n";

struct TestServer {
    child: Child,
    reader: BufReader<ChildStdout>,
    /// Messages read while waiting for something else
    backlog: Vec<Value>,
    next_id: i64,
}

impl TestServer {
    fn spawn() -> Self {
        let bin_path = std::env::var("CARGO_BIN_EXE_devdocs-ls")
            .unwrap_or_else(|_| "target/debug/devdocs-ls".to_string());

        let mut child = Command::new(bin_path)
            .args(["--config", "/nonexistent/devdocs-ls/config.toml"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn language server");
        let stdout = child.stdout.take().expect("Child stdout should be available");

        Self {
            child,
            reader: BufReader::new(stdout),
            backlog: Vec::new(),
            next_id: 1,
        }
    }

    fn send(&mut self, message: Value) {
        let body = message.to_string();
        let frame = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);
        let stdin = self.child.stdin.as_mut().expect("Child stdin should be available");
        stdin.write_all(frame.as_bytes()).expect("Failed to write message");
        stdin.flush().expect("Failed to flush stdin");
    }

    fn notify(&mut self, method: &str, params: Value) {
        self.send(json!({ "jsonrpc": "2.0", "method": method, "params": params }));
    }

    fn request(&mut self, method: &str, params: Value) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        self.send(json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }));
        id
    }

    fn read_message(&mut self) -> Value {
        let mut content_length = None;
        loop {
            let mut line = String::new();
            let read = self.reader.read_line(&mut line).expect("Error reading headers");
            assert!(read > 0, "Unexpected EOF while reading headers");
            if line.trim().is_empty() {
                break;
            }
            if let Some(length) = line.strip_prefix("Content-Length:") {
                content_length = Some(length.trim().parse::<usize>().expect("Invalid Content-Length"));
            }
        }

        let mut body = vec![0u8; content_length.expect("Missing Content-Length header")];
        self.reader.read_exact(&mut body).expect("Failed to read body");
        serde_json::from_slice(&body).expect("Body should be valid JSON")
    }

    /// Read until a message matching `pred` arrives, keeping the others.
    fn wait_for(&mut self, pred: impl Fn(&Value) -> bool) -> Value {
        if let Some(pos) = self.backlog.iter().position(&pred) {
            return self.backlog.remove(pos);
        }
        loop {
            let message = self.read_message();
            if pred(&message) {
                return message;
            }
            self.backlog.push(message);
        }
    }

    fn wait_for_response(&mut self, id: i64) -> Value {
        self.wait_for(|m| m.get("id").and_then(Value::as_i64) == Some(id) && m.get("method").is_none())
    }

    fn wait_for_notification(&mut self, method: &str) -> Value {
        self.wait_for(|m| m.get("method").and_then(Value::as_str) == Some(method))
    }

    fn has_pending(&self, method: &str) -> bool {
        self.backlog
            .iter()
            .any(|m| m.get("method").and_then(Value::as_str) == Some(method))
    }

    fn initialize(&mut self, capabilities: Value) -> Value {
        let id = self.request(
            "initialize",
            json!({
                "processId": null,
                "rootUri": null,
                "capabilities": capabilities,
                "clientInfo": { "name": "test-client", "version": "1.0" }
            }),
        );
        let response = self.wait_for_response(id);
        self.notify("initialized", json!({}));
        self.notify(
            "textDocument/didOpen",
            json!({
                "textDocument": {
                    "uri": DOC_URI,
                    "languageId": "shellscript",
                    "version": 1,
                    "text": DOC_TEXT
                }
            }),
        );
        response
    }

    fn execute(&mut self, arguments: Value) -> i64 {
        self.request(
            "workspace/executeCommand",
            json!({ "command": "devdocs.lookup", "arguments": arguments }),
        )
    }

    fn lookup_in(&mut self, uri: &str, start: (u32, u32), end: (u32, u32)) -> i64 {
        self.execute(json!([{
            "textDocument": { "uri": uri },
            "selection": {
                "start": { "line": start.0, "character": start.1 },
                "end": { "line": end.0, "character": end.1 }
            }
        }]))
    }

    fn lookup(&mut self, start: (u32, u32), end: (u32, u32)) -> i64 {
        self.lookup_in(DOC_URI, start, end)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn initialize_advertises_lookup_capabilities() {
    let mut server = TestServer::spawn();
    let response = server.initialize(json!({
        "textDocument": { "codeAction": { "dynamicRegistration": false } }
    }));

    assert_eq!(response["jsonrpc"], "2.0");
    let result = &response["result"];
    let capabilities = &result["capabilities"];
    assert!(capabilities.is_object(), "Capabilities should be an object");

    let commands = capabilities["executeCommandProvider"]["commands"]
        .as_array()
        .expect("Should advertise executeCommandProvider");
    assert!(commands.iter().any(|c| c == "devdocs.lookup"));
    assert_eq!(capabilities["codeActionProvider"], true);
    assert_eq!(capabilities["textDocumentSync"], 1);
    assert_eq!(result["serverInfo"]["name"], "devdocs-language-server");
    assert_eq!(result["serverInfo"]["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn lookups_without_usable_target_do_nothing() {
    let mut server = TestServer::spawn();
    server.initialize(json!({}));

    let unknown = server.lookup_in("file:///tmp/devdocs-ls-test/never-opened.sh", (0, 0), (0, 0));
    assert_eq!(server.wait_for_response(unknown)["result"], Value::Null);

    let no_arguments = server.execute(json!([]));
    assert_eq!(server.wait_for_response(no_arguments)["result"], Value::Null);

    let malformed = server.execute(json!(["grep"]));
    assert_eq!(server.wait_for_response(malformed)["result"], Value::Null);

    // The panel is still closed: the next valid lookup opens the first one.
    let id = server.lookup((1, 10), (1, 10));
    let open = server.wait_for_notification("devdocs/openPanel");
    let response = server.wait_for_response(id);

    assert_eq!(open["params"]["panelId"], 1);
    assert_eq!(response["result"]["opened"], true);
    assert_eq!(response["result"]["panelId"], 1);
    assert!(!server.has_pending("devdocs/openPanel"));
    assert!(!server.has_pending("devdocs/postMessage"));
    assert!(!server.has_pending("window/showMessage"));
}

#[test]
fn lookup_opens_then_updates_then_reopens_panel() {
    let mut server = TestServer::spawn();
    server.initialize(json!({}));

    // Cursor inside "grep" on a shell script.
    let id = server.lookup((1, 10), (1, 10));
    let open = server.wait_for_notification("devdocs/openPanel");
    let response = server.wait_for_response(id);

    assert_eq!(open["params"]["url"], "https://devdocs.io/#q=bash%20grep");
    assert_eq!(open["params"]["title"], "DevDocs");
    assert!(
        open["params"]["html"]
            .as_str()
            .expect("html shell")
            .contains("https://devdocs.io/#q=bash%20grep")
    );
    let first_panel = open["params"]["panelId"].clone();
    assert_eq!(response["result"]["opened"], true);
    assert_eq!(response["result"]["panelId"], first_panel);

    // Explicit selection of "find" while the panel is open.
    let id = server.lookup((2, 0), (2, 4));
    let update = server.wait_for_notification("devdocs/postMessage");
    let response = server.wait_for_response(id);

    assert_eq!(update["params"]["panelId"], first_panel);
    assert_eq!(update["params"]["message"]["command"], "UPDATE_URL");
    assert_eq!(update["params"]["message"]["text"], "https://devdocs.io/#q=bash%20find");
    assert_eq!(response["result"]["opened"], false);
    assert!(!server.has_pending("devdocs/openPanel"));

    // The user closes the panel; the next lookup opens a fresh one.
    server.notify("devdocs/panelClosed", json!({ "panelId": first_panel }));
    let id = server.lookup((1, 0), (1, 0));
    let reopen = server.wait_for_notification("devdocs/openPanel");
    let response = server.wait_for_response(id);

    assert_eq!(reopen["params"]["url"], "https://devdocs.io/#q=bash%20ps");
    assert_ne!(reopen["params"]["panelId"], first_panel);
    assert_eq!(response["result"]["opened"], true);
}

#[test]
fn multi_line_selection_shows_error() {
    let mut server = TestServer::spawn();
    server.initialize(json!({}));

    let id = server.lookup((1, 0), (2, 4));
    let message = server.wait_for_notification("window/showMessage");
    let response = server.wait_for_response(id);

    assert_eq!(message["params"]["type"], 1);
    assert_eq!(message["params"]["message"], "[DevDocs]: Invalid selection.");
    assert_eq!(response["result"], Value::Null);
    assert!(!server.has_pending("devdocs/openPanel"));
}

#[test]
fn workspace_setting_is_read_for_each_lookup() {
    let mut server = TestServer::spawn();
    server.initialize(json!({ "workspace": { "configuration": true } }));

    let id = server.lookup((1, 10), (1, 10));
    let config_request = server.wait_for_notification("workspace/configuration");
    assert_eq!(config_request["params"]["items"][0]["section"], "devdocs");
    server.send(json!({
        "jsonrpc": "2.0",
        "id": config_request["id"].clone(),
        "result": [{ "url": "http://localhost:9292" }]
    }));

    let open = server.wait_for_notification("devdocs/openPanel");
    server.wait_for_response(id);
    assert_eq!(open["params"]["url"], "http://localhost:9292/#q=bash%20grep");

    // Setting cleared: back to the default site, same panel.
    let id = server.lookup((1, 10), (1, 10));
    let config_request = server.wait_for_notification("workspace/configuration");
    server.send(json!({
        "jsonrpc": "2.0",
        "id": config_request["id"].clone(),
        "result": [{ "url": "" }]
    }));

    let update = server.wait_for_notification("devdocs/postMessage");
    server.wait_for_response(id);
    assert_eq!(update["params"]["message"]["text"], "https://devdocs.io/#q=bash%20grep");
}

#[test]
fn code_action_offers_lookup_command() {
    let mut server = TestServer::spawn();
    server.initialize(json!({}));

    let id = server.request(
        "textDocument/codeAction",
        json!({
            "textDocument": { "uri": DOC_URI },
            "range": {
                "start": { "line": 1, "character": 10 },
                "end": { "line": 1, "character": 10 }
            },
            "context": { "diagnostics": [] }
        }),
    );
    let response = server.wait_for_response(id);
    let actions = response["result"].as_array().expect("code actions");

    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0]["title"], "Look up \"grep\" in DevDocs");
    assert_eq!(actions[0]["command"]["command"], "devdocs.lookup");
    assert_eq!(actions[0]["command"]["arguments"][0]["textDocument"]["uri"], DOC_URI);
}
