use rmcp::{
    RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext, wrapper::Parameters},
    model::*,
    service::RequestContext,
    tool, tool_router,
};

use crate::auth::{Admission, AuthorizationGate};
use crate::core::{
    models::{ConvertTimeRequest, GetCurrentTimeRequest},
    provider::TimeServer,
};
use crate::errors::{GatewayError, GatewayResult, McpError, McpResult};

/// Time MCP server exposing the two timezone tools.
///
/// The same service backs both transports. Tool calls pass through the
/// [`AuthorizationGate`] before reaching the router.
#[derive(Clone)]
pub struct TimeService {
    time_server: TimeServer,
    gate: AuthorizationGate,
    tool_router: ToolRouter<TimeService>,
}

impl TimeService {
    pub fn new(time_server: TimeServer, gate: AuthorizationGate) -> Self {
        Self {
            time_server,
            gate,
            tool_router: Self::tool_router(),
        }
    }

    /// Tool descriptors with their input schemas.
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    fn fallback_timezone_name(&self) -> &'static str {
        self.time_server.fallback_timezone().name()
    }
}

impl Default for TimeService {
    fn default() -> Self {
        Self::new(TimeServer::default(), AuthorizationGate::new(false))
    }
}

fn json_content<T: serde::Serialize>(value: &T) -> McpResult<CallToolResult> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization failed: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[tool_router]
impl TimeService {
    #[tool(
        description = "Get current time in a specific timezone. Omit the timezone to use the server default"
    )]
    pub(crate) async fn get_current_time(
        &self,
        Parameters(req): Parameters<GetCurrentTimeRequest>,
    ) -> McpResult<CallToolResult> {
        let result = self.time_server.get_current_time(req.timezone.as_deref())?;
        json_content(&result)
    }

    #[tool(
        description = "Convert a HH:MM time between timezones. Omit source_timezone to use the server default and time to use the current time"
    )]
    pub(crate) async fn convert_time(
        &self,
        Parameters(req): Parameters<ConvertTimeRequest>,
    ) -> McpResult<CallToolResult> {
        let result = self.time_server.convert_time(
            req.source_timezone.as_deref(),
            req.time.as_deref(),
            &req.target_timezone,
        )?;
        json_content(&result)
    }
}

impl ServerHandler for TimeService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "Time MCP Server for timezone operations. Tools: get_current_time, convert_time. Default timezone: {}. Use IANA timezone names.",
                self.fallback_timezone_name()
            )),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> McpResult<ListToolsResult> {
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        mut context: RequestContext<RoleServer>,
    ) -> McpResult<CallToolResult> {
        match self.gate.admit(&context.extensions) {
            Ok(Admission::Trusted) => {}
            Ok(Admission::Authenticated(identity)) => {
                tracing::info!(
                    tool = %request.name,
                    user_id = %identity.user_id,
                    username = %identity.username,
                    role = %identity.role,
                    "Authorized tool call"
                );
                context.extensions.insert(identity);
            }
            Err(denied) => {
                tracing::warn!(tool = %request.name, "Tool call refused: {}", denied);
                return Ok(denied.into_tool_result());
            }
        }

        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> McpResult<InitializeResult> {
        tracing::info!("Time MCP Server initialized successfully");
        Ok(self.get_info())
    }
}

/// Serves `service` over stdin/stdout until the client disconnects.
pub async fn run_stdio(service: TimeService) -> GatewayResult<()> {
    use rmcp::{ServiceExt, transport::stdio};

    let running = service.serve(stdio()).await.map_err(|e| {
        tracing::error!("serving error: {:?}", e);
        GatewayError::Stdio(e.to_string())
    })?;

    running
        .waiting()
        .await
        .map_err(|e| GatewayError::Stdio(e.to_string()))?;
    Ok(())
}
