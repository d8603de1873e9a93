//! Tool registry - central routing for MCP tools.
//!
//! Provides `list_tools()` and `call_tool()` as MCP clients expect.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::{AppState, StoreError};
use crate::mcp::content::ToolResult;

use super::execute_sql::{self, ExecuteSqlRequest};
use super::income::{self, IncomeRequest};
use super::location::{self, LocationRequest};
use super::population::{self, PopulationRequest};
use super::target_customers::{self, TargetCustomersRequest};
use super::timing::{self, TimingRequest};
use super::ToolError;

/// Tool descriptor as listed by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Central registry for all MCP tools.
pub struct ToolRegistry {
    descriptors: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: vec![
                // Lookups
                population::descriptor(),
                income::descriptor(),
                execute_sql::descriptor(),
                // Analysis
                target_customers::descriptor(),
                location::descriptor(),
                timing::descriptor(),
            ],
        }
    }

    /// List all available tools as MCP clients expect.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.descriptors.clone()
    }

    /// Call a tool by name with the given arguments.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
        state: &AppState,
    ) -> ToolResult {
        log::info!("Calling tool: {}", name);

        match name {
            population::TOOL_NAME => self.call_population(arguments, state).await,
            income::TOOL_NAME => self.call_income(arguments, state).await,
            execute_sql::TOOL_NAME => self.call_execute_sql(arguments, state).await,
            target_customers::TOOL_NAME => self.call_target_customers(arguments, state).await,
            location::TOOL_NAME => self.call_location(arguments, state).await,
            timing::TOOL_NAME => self.call_timing(arguments, state).await,
            _ => {
                let available: Vec<&str> =
                    self.descriptors.iter().map(|d| d.name.as_str()).collect();
                ToolResult::error(format!(
                    "'{}' 도구를 찾을 수 없습니다. 사용 가능한 도구: {}",
                    name,
                    available.join(", ")
                ))
            }
        }
    }

    async fn call_population(&self, arguments: Option<Value>, state: &AppState) -> ToolResult {
        let request = match parse_arguments::<PopulationRequest>(arguments) {
            Ok(req) => req,
            Err(err) => return ToolResult::error(err),
        };

        let query = match request.validate() {
            Ok(query) => query,
            Err(validation_error) => return ToolResult::error(validation_error),
        };

        match population::execute(state, query).await {
            Ok(response) => ToolResult::json(&response),
            Err(err) => failure("인구 통계 조회", err.into()),
        }
    }

    async fn call_income(&self, arguments: Option<Value>, state: &AppState) -> ToolResult {
        let request = match parse_arguments::<IncomeRequest>(arguments) {
            Ok(req) => req,
            Err(err) => return ToolResult::error(err),
        };

        let filter = match request.validate() {
            Ok(filter) => filter,
            Err(validation_error) => return ToolResult::error(validation_error),
        };

        match income::execute(state, filter).await {
            Ok(response) => ToolResult::json(&response),
            Err(err) => failure("소득 분포 조회", err.into()),
        }
    }

    async fn call_execute_sql(&self, arguments: Option<Value>, state: &AppState) -> ToolResult {
        let request = match parse_arguments::<ExecuteSqlRequest>(arguments) {
            Ok(req) => req,
            Err(err) => return ToolResult::error(err),
        };

        let query = match request.validate(state.sql_row_limit) {
            Ok(query) => query,
            Err(validation_error) => return ToolResult::error(validation_error),
        };

        match execute_sql::execute(state, query).await {
            Ok(response) => ToolResult::json(&response),
            Err(err) => failure("SQL 실행", err.into()),
        }
    }

    async fn call_target_customers(
        &self,
        arguments: Option<Value>,
        state: &AppState,
    ) -> ToolResult {
        let request = match parse_arguments::<TargetCustomersRequest>(arguments) {
            Ok(req) => req,
            Err(err) => return ToolResult::error(err),
        };

        let query = match request.validate() {
            Ok(query) => query,
            Err(validation_error) => return ToolResult::error(validation_error),
        };

        match target_customers::execute(state, query).await {
            Ok(analysis) => ToolResult::json(&analysis),
            Err(err) => failure("타깃 고객 분석", err),
        }
    }

    async fn call_location(&self, arguments: Option<Value>, state: &AppState) -> ToolResult {
        let request = match parse_arguments::<LocationRequest>(arguments) {
            Ok(req) => req,
            Err(err) => return ToolResult::error(err),
        };

        let query = match request.validate() {
            Ok(query) => query,
            Err(validation_error) => return ToolResult::error(validation_error),
        };

        match location::execute(state, query).await {
            Ok(response) => ToolResult::json(&response),
            Err(err) => failure("입지 추천", err),
        }
    }

    async fn call_timing(&self, arguments: Option<Value>, state: &AppState) -> ToolResult {
        let request = match parse_arguments::<TimingRequest>(arguments) {
            Ok(req) => req,
            Err(err) => return ToolResult::error(err),
        };

        let query = match request.validate() {
            Ok(query) => query,
            Err(validation_error) => return ToolResult::error(validation_error),
        };

        match timing::execute(state, query).await {
            Ok(response) => ToolResult::json(&response),
            Err(err) => failure("마케팅 시기 추천", err),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn failure(action: &str, err: ToolError) -> ToolResult {
    match err {
        ToolError::NoData(message) => ToolResult::error(message),
        ToolError::Store(StoreError::Timeout) => ToolResult::error(format!(
            "{} 실패: 쿼리 실행 시간이 제한을 초과했습니다",
            action
        )),
        ToolError::Store(err) => {
            log::error!("{} failed: {}", action, err);
            ToolResult::error(format!("{} 실패: {}", action, err))
        }
    }
}

fn parse_arguments<T: for<'de> Deserialize<'de>>(arguments: Option<Value>) -> Result<T, String> {
    let value = match arguments {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(value) => value,
    };
    serde_json::from_value(value).map_err(|err| format!("인자가 올바르지 않습니다: {}", err))
}
