//! MCP (Model Context Protocol) server for the Ba Zhai calculator.

use crate::relation::Relation;
use crate::session::{self, DoorPlacement, SelectionState};
use crate::trigram::{Direction, FLOORS, Trigram};
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::schemars;
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

pub fn cmd_mcp() -> i32 {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    rt.block_on(run_mcp_server())
}

async fn run_mcp_server() -> i32 {
    let service = BaZhaiService::new();
    let transport = rmcp::transport::io::stdio();

    let running_service = match service.serve(transport).await {
        Ok(service) => service,
        Err(e) => {
            eprintln!("MCP server error: {}", e);
            return 1;
        }
    };

    if let Err(e) = running_service.waiting().await {
        eprintln!("MCP server task error: {}", e);
        return 1;
    }

    0
}

#[derive(Clone)]
struct BaZhaiService {
    _marker: Arc<()>,
}

impl BaZhaiService {
    fn new() -> Self {
        Self {
            _marker: Arc::new(()),
        }
    }

    fn evaluate_impl(&self, params: EvaluateParams) -> Result<String, String> {
        let mut state = SelectionState::default();

        if let Some(door) = params.door {
            state.door_placement =
                Some(door.parse::<DoorPlacement>().map_err(|e| e.to_string())?);
        }
        if let Some(base) = params.base {
            state.base_direction = Some(base.parse::<Direction>().map_err(|e| e.to_string())?);
        }
        if let Some(facing) = params.facing {
            state.facing_direction =
                Some(facing.parse::<Direction>().map_err(|e| e.to_string())?);
        }
        if let Some(floor) = params.floor {
            if !FLOORS.contains(&floor) {
                return Err(format!(
                    "floor must be between {} and {}, got {}",
                    FLOORS.start(),
                    FLOORS.end(),
                    floor
                ));
            }
            state.floor = Some(floor);
        }
        if let Some(unit) = params.unit {
            state.unit_direction = Some(unit.parse::<Direction>().map_err(|e| e.to_string())?);
        }

        let derived = session::derive(&state);
        let report = serde_json::json!({
            "selection": state,
            "transform_seed": derived.transform.map(|seed| seed.detail()),
            "floor_hexagram": derived.floor_hexagram.map(|hexagram| hexagram.detail()),
            "verdict": derived.relation.map(|relation| serde_json::json!({
                "relation": relation.glyph(),
                "severity": relation.severity(),
                "color": relation.severity().color(),
                "description": relation.describe(),
            })),
        });
        Ok(serde_json::to_string_pretty(&report).unwrap_or_default())
    }

    fn classify_impl(&self, params: ClassifyParams) -> Result<String, String> {
        let a = params.a.parse::<Trigram>().map_err(|e| e.to_string())?;
        let b = params.b.parse::<Trigram>().map_err(|e| e.to_string())?;
        let relation = Relation::classify(a, b);

        let report = serde_json::json!({
            "a": a.glyph(),
            "b": b.glyph(),
            "relation": relation.glyph(),
            "severity": relation.severity(),
            "color": relation.severity().color(),
            "transform_trigram": relation.transform_trigram().map(|t| t.glyph()),
            "description": relation.describe(),
        });
        Ok(serde_json::to_string_pretty(&report).unwrap_or_default())
    }

    fn advance_impl(&self, params: AdvanceParams) -> Result<String, String> {
        let start = params
            .trigram
            .parse::<Trigram>()
            .map_err(|e| e.to_string())?;
        let result = start.advance(params.floor).map_err(|e| e.to_string())?;

        let report = serde_json::json!({
            "start": start.glyph(),
            "floor": params.floor,
            "hexagram": result.glyph(),
            "element": result.element(),
            "polarity": result.polarity(),
        });
        Ok(serde_json::to_string_pretty(&report).unwrap_or_default())
    }

    fn directions_impl(&self) -> Result<String, String> {
        let rows: Vec<_> = Direction::ALL
            .iter()
            .map(|direction| {
                let trigram = direction.trigram();
                serde_json::json!({
                    "direction": direction.glyph(),
                    "hexagram": trigram.glyph(),
                    "element": trigram.element(),
                    "polarity": trigram.polarity(),
                })
            })
            .collect();

        let modes: Vec<_> = DoorPlacement::ALL
            .iter()
            .map(|mode| {
                serde_json::json!({
                    "mode": mode.glyph(),
                    "description": mode.description(),
                    "base_prompt": mode.base_prompt(),
                })
            })
            .collect();

        let report = serde_json::json!({
            "directions": rows,
            "door_placements": modes,
            "floors": { "min": FLOORS.start(), "max": FLOORS.end() },
        });
        Ok(serde_json::to_string_pretty(&report).unwrap_or_default())
    }
}

// === Parameter structs ===

#[derive(Debug, Deserialize, JsonSchema)]
struct EvaluateParams {
    /// Door placement mode: "centered" or "not-centered" (大門置中 / 大門不置中)
    door: Option<String>,
    /// Base (sitting or door) direction, e.g. "north" or 北
    base: Option<String>,
    /// Facing direction, e.g. "south" or 南
    facing: Option<String>,
    /// Unit floor number (1-30)
    floor: Option<u32>,
    /// Unit door direction, e.g. "east" or 東
    unit: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ClassifyParams {
    /// First trigram, e.g. "kan" or 坎
    a: String,
    /// Second trigram, e.g. "li" or 離
    b: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AdvanceParams {
    /// Starting trigram, e.g. "qian" or 乾
    trigram: String,
    /// Floor number, counting the start as floor 1
    floor: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct DirectionsParams {}

impl ServerHandler for BaZhaiService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bazhai".to_string(),
                title: Some("Ba Zhai".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Ba Zhai (Eight Mansions) compatibility tools. Use 'evaluate' to run the \
                 full building/floor/unit pipeline from any subset of selections, \
                 'classify' for the relation between two trigrams, 'advance' to walk a \
                 trigram up to a floor, and 'directions' for the static lookup tables."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send {
        async move {
            Ok(ListToolsResult {
                tools: vec![
                    Tool::new(
                        "evaluate",
                        "Run the full compatibility pipeline from building and unit selections",
                        cached_schema_for_type::<EvaluateParams>(),
                    ),
                    Tool::new(
                        "classify",
                        "Classify the relation between two trigrams",
                        cached_schema_for_type::<ClassifyParams>(),
                    ),
                    Tool::new(
                        "advance",
                        "Advance a trigram along the element cycle to a floor",
                        cached_schema_for_type::<AdvanceParams>(),
                    ),
                    Tool::new(
                        "directions",
                        "List the direction, trigram, and door-placement tables",
                        cached_schema_for_type::<DirectionsParams>(),
                    ),
                ],
                next_cursor: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send {
        let this = self.clone();
        async move {
            let args_value = request
                .arguments
                .map(serde_json::Value::Object)
                .unwrap_or(serde_json::Value::Null);

            match request.name.as_ref() {
                "evaluate" => {
                    let params: EvaluateParams =
                        serde_json::from_value(args_value).unwrap_or(EvaluateParams {
                            door: None,
                            base: None,
                            facing: None,
                            floor: None,
                            unit: None,
                        });

                    match this.evaluate_impl(params) {
                        Ok(output) => Ok(CallToolResult::success(vec![Content::text(output)])),
                        Err(e) => Ok(CallToolResult::error(vec![Content::text(e)])),
                    }
                }
                "classify" => {
                    let params: ClassifyParams =
                        serde_json::from_value(args_value).map_err(|e| {
                            McpError::invalid_params(format!("Invalid parameters: {}", e), None)
                        })?;

                    match this.classify_impl(params) {
                        Ok(output) => Ok(CallToolResult::success(vec![Content::text(output)])),
                        Err(e) => Ok(CallToolResult::error(vec![Content::text(e)])),
                    }
                }
                "advance" => {
                    let params: AdvanceParams =
                        serde_json::from_value(args_value).map_err(|e| {
                            McpError::invalid_params(format!("Invalid parameters: {}", e), None)
                        })?;

                    match this.advance_impl(params) {
                        Ok(output) => Ok(CallToolResult::success(vec![Content::text(output)])),
                        Err(e) => Ok(CallToolResult::error(vec![Content::text(e)])),
                    }
                }
                "directions" => {
                    let _params: DirectionsParams =
                        serde_json::from_value(args_value).unwrap_or(DirectionsParams {});

                    match this.directions_impl() {
                        Ok(output) => Ok(CallToolResult::success(vec![Content::text(output)])),
                        Err(e) => Ok(CallToolResult::error(vec![Content::text(e)])),
                    }
                }
                _ => Err(McpError::invalid_params(
                    format!("Unknown tool: {}", request.name),
                    None,
                )),
            }
        }
    }
}
