use std::io::{BufRead, Write};

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::domain::EnrichmentRequest;
use crate::error::PantherError;
use crate::panther::PantherClient;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "panther";

/// MCP server speaking JSON-RPC 2.0 over stdio, one message per line.
///
/// Dispatch is generic over [`PantherClient`] so it can be exercised without
/// touching the network.
pub struct McpServer<P> {
    panther: P,
}

impl<P: PantherClient> McpServer<P> {
    pub fn new(panther: P) -> Self {
        Self { panther }
    }

    pub fn panther(&self) -> &P {
        &self.panther
    }

    /// Serves requests until the input stream closes.
    pub fn serve(&self, input: impl BufRead, mut output: impl Write) -> std::io::Result<()> {
        for line in input.lines() {
            let line = line?;
            if let Some(response) = self.handle_line(&line) {
                writeln!(output, "{response}")?;
                output.flush()?;
            }
        }
        Ok(())
    }

    pub fn handle_line(&self, line: &str) -> Option<Value> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(err) => {
                warn!("skipping undecodable message: {err}");
                return None;
            }
        };
        self.handle_message(&message)
    }

    pub fn handle_message(&self, message: &Value) -> Option<Value> {
        let method = message.get("method").and_then(Value::as_str)?;

        // Notifications carry no id and get no response.
        let id = message.get("id")?.clone();

        debug!(method, "handling request");

        let response = match method {
            "initialize" => jsonrpc_ok(&id, initialize_result(message)),
            "resources/list" => jsonrpc_ok(&id, json!({ "resources": [] })),
            "prompts/list" => jsonrpc_ok(&id, json!({ "prompts": [] })),
            "tools/list" => jsonrpc_ok(&id, json!({ "tools": tool_definitions() })),
            "tools/call" => match self.tools_call(message) {
                Ok(result) => jsonrpc_ok(&id, result),
                Err(error) => jsonrpc_err(&id, error),
            },
            _ => jsonrpc_err(&id, json!({ "code": -32601, "message": "method not found" })),
        };
        Some(response)
    }

    fn tools_call(&self, message: &Value) -> Result<Value, Value> {
        let params = message.get("params").cloned().unwrap_or(Value::Null);
        let name = params.get("name").and_then(Value::as_str).unwrap_or("");
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let outcome = match name {
            "get_organisms" => self.panther.supported_genomes(),
            "get_datasets" => self.panther.supported_annot_datasets(),
            "get_enrichment" => {
                let request: EnrichmentRequest =
                    serde_json::from_value(arguments).map_err(|err| {
                        json!({ "code": -32602, "message": format!("invalid arguments: {err}") })
                    })?;
                self.panther.enrich_overrep(&request)
            }
            _ => {
                return Err(json!({
                    "code": -32601,
                    "message": format!("unknown tool: {name}")
                }));
            }
        };
        Ok(tool_result(outcome))
    }
}

// Operation failures are tool results, not protocol errors: the caller asked
// a valid question and gets the failure back as content.
fn tool_result(outcome: Result<Vec<Value>, PantherError>) -> Value {
    match outcome {
        Ok(records) => json!({
            "content": [{ "type": "text", "text": Value::Array(records).to_string() }]
        }),
        Err(err) => json!({
            "content": [{ "type": "text", "text": err.to_string() }],
            "isError": true
        }),
    }
}

fn initialize_result(message: &Value) -> Value {
    let protocol_version = message
        .get("params")
        .and_then(|params| params.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": { "tools": {} },
        "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") }
    })
}

pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "get_organisms",
            "description": "Retrieve the list of supported genomes and taxon ids from the Panther services",
            "inputSchema": { "type": "object", "properties": {} }
        }),
        json!({
            "name": "get_datasets",
            "description": "Retrieve the list of supported annotation datasets from the Panther services",
            "inputSchema": { "type": "object", "properties": {} }
        }),
        json!({
            "name": "get_enrichment",
            "description": "Identify whether a pathway is overrepresented or enriched in a given list of genes using the Panther services",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "gene_input_list": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Experimentally identified genes"
                    },
                    "organism": {
                        "type": ["string", "integer"],
                        "description": "Taxon id from the supported organisms list (9606 = human)"
                    },
                    "annot_data_set": {
                        "type": "string",
                        "description": "Annotation dataset to compare the gene list against, from the supported datasets list"
                    }
                },
                "required": ["gene_input_list", "organism", "annot_data_set"]
            }
        }),
    ]
}

fn jsonrpc_ok(id: &Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn jsonrpc_err(id: &Value, error: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": error })
}
