/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Processes tool calls against the kennel records
/// 3. Sends JSON-RPC responses to stdout

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp::protocol::*;
use crate::tools;
use crate::{KennelServer, ServerError};

/// MCP server that handles communication with clients
pub struct McpServer {
    /// The underlying kennel server
    kennel: KennelServer,
    /// Whether the server has been initialized
    initialized: bool,
}

/// Deserialize tool arguments into a typed params struct
fn parse_args<T: DeserializeOwned>(args: HashMap<String, Value>) -> Result<T, String> {
    serde_json::from_value(Value::Object(args.into_iter().collect()))
        .map_err(|e| format!("Invalid arguments: {}", e))
}

/// Render a serializable listing as pretty JSON for the tool result
fn render_json<T: serde::Serialize>(value: &T) -> ToolCallResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => ToolCallResult::success(text),
        Err(e) => ToolCallResult::error(format!("Failed to render result: {}", e)),
    }
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(kennel: KennelServer) -> Self {
        Self {
            kennel,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        Some(self.handle_request(request))
    }

    /// Handle a JSON-RPC request
    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(request.id, json!(null))
            }
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Kennel Manager MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(
                request.id,
                error_codes::INTERNAL_ERROR,
                format!("Failed to serialize initialize result: {}", e),
                None,
            ),
        }
    }

    /// Handle tools/list request
    fn handle_tools_list(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            ToolDefinition {
                name: "dog_add".to_string(),
                description: "Add an adult dog to the kennel records".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "Call name of the dog"},
                        "breed": {"type": "string", "description": "Breed"},
                        "sex": {"type": "string", "description": "female or male"},
                        "role": {"type": "string", "description": "breeding, retired or companion (default: breeding)"},
                        "birth_date": {"type": "string", "description": "Birth date (YYYY-MM-DD)"},
                        "color": {"type": "string", "description": "Coat color (optional)"},
                        "weight_kg": {"type": "number", "description": "Weight in kilograms (optional)"},
                        "notes": {"type": "string", "description": "Free-form notes (optional)"}
                    },
                    "required": ["name", "breed", "sex", "birth_date"]
                }),
            },
            ToolDefinition {
                name: "dog_update".to_string(),
                description: "Update a dog's details, role or active flag".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "dog_id": {"type": "string", "description": "ID of the dog"},
                        "name": {"type": "string"},
                        "role": {"type": "string", "description": "breeding, retired or companion"},
                        "color": {"type": "string"},
                        "weight_kg": {"type": "number"},
                        "notes": {"type": "string"},
                        "is_active": {"type": "boolean", "description": "false archives the dog"}
                    },
                    "required": ["dog_id"]
                }),
            },
            ToolDefinition {
                name: "dog_list".to_string(),
                description: "List dogs, optionally filtered by sex and role".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "sex": {"type": "string", "description": "female or male (optional)"},
                        "role": {"type": "string", "description": "breeding, retired or companion (optional)"},
                        "include_inactive": {"type": "boolean", "description": "Include archived dogs (default: false)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "litter_add".to_string(),
                description: "Record a planned or whelped litter".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "Litter name, e.g. 'A-litter'"},
                        "dam_id": {"type": "string", "description": "ID of the mother"},
                        "sire_id": {"type": "string", "description": "ID of the father (optional)"},
                        "expected_on": {"type": "string", "description": "Expected whelp date (YYYY-MM-DD, optional)"},
                        "whelped_on": {"type": "string", "description": "Actual whelp date (YYYY-MM-DD, optional)"},
                        "notes": {"type": "string"}
                    },
                    "required": ["name", "dam_id"]
                }),
            },
            ToolDefinition {
                name: "litter_update".to_string(),
                description: "Update a litter, e.g. set its whelp date".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "litter_id": {"type": "string"},
                        "name": {"type": "string"},
                        "sire_id": {"type": "string"},
                        "expected_on": {"type": "string", "description": "YYYY-MM-DD"},
                        "whelped_on": {"type": "string", "description": "YYYY-MM-DD"},
                        "notes": {"type": "string"},
                        "is_active": {"type": "boolean"}
                    },
                    "required": ["litter_id"]
                }),
            },
            ToolDefinition {
                name: "litter_list".to_string(),
                description: "List litters with dam, sire and puppy counts".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "include_inactive": {"type": "boolean", "description": "Include archived litters (default: false)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "puppy_add".to_string(),
                description: "Add a puppy to a litter".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "litter_id": {"type": "string"},
                        "name": {"type": "string", "description": "Working name, e.g. 'Green collar boy'"},
                        "sex": {"type": "string", "description": "female or male"},
                        "collar_color": {"type": "string", "description": "Identification collar (optional)"},
                        "birth_date": {"type": "string", "description": "YYYY-MM-DD, defaults to the litter's whelp date"},
                        "notes": {"type": "string"}
                    },
                    "required": ["litter_id", "name", "sex"]
                }),
            },
            ToolDefinition {
                name: "puppy_update".to_string(),
                description: "Update a puppy; reserve or place it with a customer".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "puppy_id": {"type": "string"},
                        "name": {"type": "string"},
                        "collar_color": {"type": "string"},
                        "status": {"type": "string", "description": "available, reserved or placed"},
                        "reserved_for": {"type": "string", "description": "Customer ID (required for reserved/placed)"},
                        "notes": {"type": "string"}
                    },
                    "required": ["puppy_id"]
                }),
            },
            ToolDefinition {
                name: "puppy_list".to_string(),
                description: "List a litter's puppies".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "litter_id": {"type": "string"}
                    },
                    "required": ["litter_id"]
                }),
            },
            ToolDefinition {
                name: "customer_add".to_string(),
                description: "Add a prospective puppy buyer".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "email": {"type": "string"},
                        "phone": {"type": "string"},
                        "city": {"type": "string"},
                        "notes": {"type": "string"}
                    },
                    "required": ["name"]
                }),
            },
            ToolDefinition {
                name: "customer_update".to_string(),
                description: "Update or archive a customer".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "customer_id": {"type": "string"},
                        "name": {"type": "string"},
                        "email": {"type": "string"},
                        "phone": {"type": "string"},
                        "city": {"type": "string"},
                        "notes": {"type": "string"},
                        "is_active": {"type": "boolean"}
                    },
                    "required": ["customer_id"]
                }),
            },
            ToolDefinition {
                name: "customer_list".to_string(),
                description: "List customers".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "include_inactive": {"type": "boolean", "description": "Include archived customers (default: false)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "waitlist_add".to_string(),
                description: "Add a customer to the waitlist (general or per litter)".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "customer_id": {"type": "string"},
                        "litter_id": {"type": "string", "description": "Omit for the general waitlist"},
                        "sex_preference": {"type": "string", "description": "female or male (optional)"},
                        "color_preference": {"type": "string"},
                        "notes": {"type": "string"}
                    },
                    "required": ["customer_id"]
                }),
            },
            ToolDefinition {
                name: "waitlist_update".to_string(),
                description: "Advance a waitlist entry: offer, accept, remove, record a deposit".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "entry_id": {"type": "string"},
                        "litter_id": {"type": "string"},
                        "status": {"type": "string", "description": "waiting, offered, accepted or removed"},
                        "deposit_paid": {"type": "boolean"},
                        "sex_preference": {"type": "string"},
                        "color_preference": {"type": "string"},
                        "notes": {"type": "string"}
                    },
                    "required": ["entry_id"]
                }),
            },
            ToolDefinition {
                name: "waitlist_list".to_string(),
                description: "Show the waitlist in queue order".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "litter_id": {"type": "string", "description": "Filter by litter (optional)"},
                        "status": {"type": "string", "description": "Filter by status (optional)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "care_log".to_string(),
                description: "Log a daily care action for a dog".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "dog_id": {"type": "string"},
                        "action": {"type": "string", "description": "feeding, potty_break, medication, grooming, exercise, weight_check, or custom:name"},
                        "performed_on": {"type": "string", "description": "YYYY-MM-DD, defaults to today"},
                        "quantity": {"type": "number", "description": "Amount, e.g. 2 (optional)"},
                        "unit": {"type": "string", "description": "Unit for the amount, e.g. 'cups' (optional)"},
                        "notes": {"type": "string"}
                    },
                    "required": ["dog_id", "action"]
                }),
            },
            ToolDefinition {
                name: "care_history".to_string(),
                description: "Read care history for one dog, or a day sheet across the kennel".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "dog_id": {"type": "string", "description": "Omit for a kennel-wide day sheet"},
                        "start_date": {"type": "string", "description": "YYYY-MM-DD (optional)"},
                        "end_date": {"type": "string", "description": "YYYY-MM-DD (optional)"},
                        "limit": {"type": "number", "description": "Max entries to return (optional)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "milestone_record".to_string(),
                description: "Record a developmental milestone for a puppy, graded against the typical age range".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "puppy_id": {"type": "string"},
                        "kind": {"type": "string", "description": "eyes_open, ears_open, first_walk, first_bark, weaned, first_vaccine, or custom:name"},
                        "achieved_on": {"type": "string", "description": "YYYY-MM-DD"},
                        "notes": {"type": "string"}
                    },
                    "required": ["puppy_id", "kind", "achieved_on"]
                }),
            },
            ToolDefinition {
                name: "milestone_list".to_string(),
                description: "List a puppy's milestones with age assessments".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "puppy_id": {"type": "string"}
                    },
                    "required": ["puppy_id"]
                }),
            },
            ToolDefinition {
                name: "heat_record".to_string(),
                description: "Record a heat start for a female dog, or close the latest cycle with its end date".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "dog_id": {"type": "string"},
                        "started_on": {"type": "string", "description": "YYYY-MM-DD, defaults to today when opening a cycle"},
                        "ended_on": {"type": "string", "description": "YYYY-MM-DD; alone, closes the latest cycle"},
                        "cycle_length_days": {"type": "number", "description": "Per-dog days between heats, 90-365 (optional)"},
                        "notes": {"type": "string"}
                    },
                    "required": ["dog_id"]
                }),
            },
            ToolDefinition {
                name: "heat_status".to_string(),
                description: "Heat projection report: stage, fertile and breeding windows, next heat, vaccination conflicts".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "dog_id": {"type": "string", "description": "One dog, or every active breeding female if omitted"},
                        "as_of": {"type": "string", "description": "Report date (YYYY-MM-DD, defaults to today)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "vaccination_add".to_string(),
                description: "Record a vaccination given to a dog, or one coming due".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "dog_id": {"type": "string"},
                        "vaccine": {"type": "string", "description": "Vaccine name, e.g. 'Rabies'"},
                        "administered_on": {"type": "string", "description": "YYYY-MM-DD (optional)"},
                        "due_on": {"type": "string", "description": "YYYY-MM-DD (optional; at least one date is required)"},
                        "notes": {"type": "string"}
                    },
                    "required": ["dog_id", "vaccine"]
                }),
            },
            ToolDefinition {
                name: "vaccination_list".to_string(),
                description: "List a dog's vaccination records".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "dog_id": {"type": "string"},
                        "upcoming_only": {"type": "boolean", "description": "Only shots still due (default: false)"}
                    },
                    "required": ["dog_id"]
                }),
            },
        ];

        JsonRpcResponse::success(request.id, json!({"tools": tools}))
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let result = self.dispatch_tool(&tool_params.name, tool_params.arguments);

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(
                request.id,
                error_codes::INTERNAL_ERROR,
                format!("Failed to serialize tool result: {}", e),
                None,
            ),
        }
    }

    /// Route a tool call to its implementation
    fn dispatch_tool(&self, name: &str, args: HashMap<String, Value>) -> ToolCallResult {
        match name {
            "dog_add" => self.call_with_id(args, tools::add_dog, |r: &tools::AddDogResponse| {
                (r.message.clone(), r.dog_id.clone())
            }),
            "dog_update" => self.call_message(args, tools::update_dog, |r: tools::UpdateDogResponse| r.message),
            "dog_list" => self.call_json(args, tools::list_dogs::<crate::storage::SqliteStorage>),
            "litter_add" => self.call_with_id(args, tools::add_litter, |r: &tools::AddLitterResponse| {
                (r.message.clone(), r.litter_id.clone())
            }),
            "litter_update" => {
                self.call_message(args, tools::update_litter, |r: tools::UpdateLitterResponse| r.message)
            }
            "litter_list" => self.call_json(args, tools::list_litters::<crate::storage::SqliteStorage>),
            "puppy_add" => self.call_with_id(args, tools::add_puppy, |r: &tools::AddPuppyResponse| {
                (r.message.clone(), r.puppy_id.clone())
            }),
            "puppy_update" => {
                self.call_message(args, tools::update_puppy, |r: tools::UpdatePuppyResponse| r.message)
            }
            "puppy_list" => self.call_json(args, tools::list_puppies::<crate::storage::SqliteStorage>),
            "customer_add" => self.call_with_id(args, tools::add_customer, |r: &tools::AddCustomerResponse| {
                (r.message.clone(), r.customer_id.clone())
            }),
            "customer_update" => {
                self.call_message(args, tools::update_customer, |r: tools::UpdateCustomerResponse| r.message)
            }
            "customer_list" => self.call_json(args, tools::list_customers::<crate::storage::SqliteStorage>),
            "waitlist_add" => self.call_with_id(args, tools::add_waitlist_entry, |r: &tools::AddWaitlistResponse| {
                (r.message.clone(), r.entry_id.clone())
            }),
            "waitlist_update" => {
                self.call_message(args, tools::update_waitlist_entry, |r: tools::UpdateWaitlistResponse| r.message)
            }
            "waitlist_list" => self.call_json(args, tools::list_waitlist::<crate::storage::SqliteStorage>),
            "care_log" => self.call_with_id(args, tools::log_care, |r: &tools::LogCareResponse| {
                (r.message.clone(), r.log_id.clone())
            }),
            "care_history" => self.call_json(args, tools::care_history::<crate::storage::SqliteStorage>),
            "milestone_record" => {
                self.call_message(args, tools::record_milestone, |r: tools::RecordMilestoneResponse| r.message)
            }
            "milestone_list" => self.call_json(args, tools::list_milestones::<crate::storage::SqliteStorage>),
            "heat_record" => self.call_message(args, tools::record_heat, |r: tools::RecordHeatResponse| r.message),
            "heat_status" => self.call_heat_status(args),
            "vaccination_add" => {
                self.call_with_id(args, tools::add_vaccination, |r: &tools::AddVaccinationResponse| {
                    (r.message.clone(), r.vaccination_id.clone())
                })
            }
            "vaccination_list" => self.call_json(args, tools::list_vaccinations::<crate::storage::SqliteStorage>),
            _ => ToolCallResult::error(format!("Unknown tool: {}", name)),
        }
    }

    /// Run a tool whose response is a message plus the created record's id
    fn call_with_id<P, R>(
        &self,
        args: HashMap<String, Value>,
        tool: impl Fn(&crate::storage::SqliteStorage, P) -> Result<R, crate::storage::StorageError>,
        extract: impl Fn(&R) -> (String, Option<String>),
    ) -> ToolCallResult
    where
        P: DeserializeOwned,
    {
        let params = match parse_args(args) {
            Ok(p) => p,
            Err(e) => return ToolCallResult::error(e),
        };
        match tool(self.kennel.storage(), params) {
            Ok(response) => {
                let (message, id) = extract(&response);
                let text = match id {
                    Some(id) => format!("{}\nID: {}", message, id),
                    None => message,
                };
                ToolCallResult::success(text)
            }
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }

    /// Run a tool whose response reduces to a message
    fn call_message<P, R>(
        &self,
        args: HashMap<String, Value>,
        tool: impl Fn(&crate::storage::SqliteStorage, P) -> Result<R, crate::storage::StorageError>,
        extract: impl Fn(R) -> String,
    ) -> ToolCallResult
    where
        P: DeserializeOwned,
    {
        let params = match parse_args(args) {
            Ok(p) => p,
            Err(e) => return ToolCallResult::error(e),
        };
        match tool(self.kennel.storage(), params) {
            Ok(response) => ToolCallResult::success(extract(response)),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }

    /// Run a listing tool and return its response as pretty JSON
    fn call_json<P, R>(
        &self,
        args: HashMap<String, Value>,
        tool: impl Fn(&crate::storage::SqliteStorage, P) -> Result<R, crate::storage::StorageError>,
    ) -> ToolCallResult
    where
        P: DeserializeOwned,
        R: serde::Serialize,
    {
        let params = match parse_args(args) {
            Ok(p) => p,
            Err(e) => return ToolCallResult::error(e),
        };
        match tool(self.kennel.storage(), params) {
            Ok(response) => render_json(&response),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }

    /// Call the heat_status tool
    ///
    /// Rendered as text: one summary line per dog, with projection details
    /// and conflicts underneath.
    fn call_heat_status(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params: tools::HeatStatusParams = match parse_args(args) {
            Ok(p) => p,
            Err(e) => return ToolCallResult::error(e),
        };

        let status = match tools::heat_status(self.kennel.storage(), self.kennel.engine(), params) {
            Ok(status) => status,
            Err(e) => return ToolCallResult::error(e.to_string()),
        };

        if status.reports.is_empty() {
            return ToolCallResult::success(
                "No active breeding females on record.".to_string(),
            );
        }

        let mut lines = vec![format!("Heat status as of {}:", status.as_of)];
        for report in &status.reports {
            lines.push(format!("- {}", report.summary));
            if let Some(projection) = &report.projection {
                lines.push(format!(
                    "    fertile {} to {}, breed {} to {}, next heat {}",
                    projection.fertile_window.start,
                    projection.fertile_window.end,
                    projection.breeding_window.start,
                    projection.breeding_window.end,
                    projection.next_heat_on
                ));
            }
            for conflict in &report.conflicts {
                lines.push(format!(
                    "    conflict: {} due {} falls near the projected heat",
                    conflict.vaccine, conflict.due_on
                ));
            }
        }

        ToolCallResult::success(lines.join("\n"))
    }
}
