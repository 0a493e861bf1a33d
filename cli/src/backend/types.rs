// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Request and response shapes of the swarm backend

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConsoleError;

/// Task text submitted to the swarm. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive(String);

impl Directive {
    pub fn new(text: impl Into<String>) -> Result<Self, ConsoleError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ConsoleError::InvalidInput(
                "directive must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Append a named attachment below the directive text
    pub fn attach(mut self, name: &str, contents: &str) -> Self {
        self.0.push_str(&format!("\n\n--- {} ---\n{}", name, contents.trim_end()));
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TaskRequest<'a> {
    pub description: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LaunchRequest<'a> {
    pub signature: &'a str,
}

/// `GET /health`
///
/// Only the canonical field names are read; the legacy `swarm` / `rag` aliases
/// are ignored. A field that is null or of the wrong type falls back to its
/// default so a 2xx reply always reads as online.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    #[serde(default, deserialize_with = "lenient")]
    pub agents: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub swarm_active: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub rag_docs: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// `GET /api/diagnostics`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Diagnostics {
    #[serde(default)]
    pub db: Option<String>,
}

/// Normalised task outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub status: String,
    pub summary: Option<String>,
    pub results: Vec<ToolOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub tool_id: String,
    pub output: Option<String>,
}

// Wire shape of `POST /api/tasks`

#[derive(Debug, Deserialize)]
pub(crate) struct TaskResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    result: Option<TaskBody>,
}

#[derive(Debug, Deserialize)]
struct TaskBody {
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    results: Vec<WireToolResult>,
}

#[derive(Debug, Deserialize)]
struct WireToolResult {
    tool_id: String,
    #[serde(default)]
    output_data: Option<WireOutputData>,
}

#[derive(Debug, Deserialize)]
struct WireOutputData {
    #[serde(default)]
    result: Option<String>,
}

impl From<TaskResponse> for TaskResult {
    fn from(resp: TaskResponse) -> Self {
        let (summary, results) = match resp.result {
            Some(body) => (
                body.reasoning,
                body.results
                    .into_iter()
                    .map(|r| ToolOutput {
                        tool_id: r.tool_id,
                        output: r.output_data.and_then(|d| d.result),
                    })
                    .collect(),
            ),
            None => (None, Vec::new()),
        };

        TaskResult {
            status: resp.status.unwrap_or_else(|| "unknown".to_string()),
            summary,
            results,
        }
    }
}

/// Error body shape used by the backend for rejected requests
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_trims_and_rejects_blank() {
        assert_eq!(Directive::new("  build it \n").unwrap().as_str(), "build it");
        assert!(matches!(
            Directive::new(" \t "),
            Err(ConsoleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_directive_attachment() {
        let directive = Directive::new("fix this").unwrap().attach("trace.log", "line 1\n");
        assert_eq!(directive.as_str(), "fix this\n\n--- trace.log ---\nline 1");
    }

    #[test]
    fn test_task_response_with_results() {
        let resp: TaskResponse = serde_json::from_str(
            r#"{"status":"completed","result":{"reasoning":"Shipped.","results":[
                {"tool_id":"git","output_data":{"result":"pushed"}},
                {"tool_id":"lint"}
            ]}}"#,
        )
        .unwrap();
        let result = TaskResult::from(resp);
        assert_eq!(result.status, "completed");
        assert_eq!(result.summary.as_deref(), Some("Shipped."));
        assert_eq!(result.results.len(), 2);
        assert_eq!(result.results[0].output.as_deref(), Some("pushed"));
        assert_eq!(result.results[1].tool_id, "lint");
        assert!(result.results[1].output.is_none());
    }

    #[test]
    fn test_task_response_without_result() {
        let resp: TaskResponse = serde_json::from_str(r#"{"status":"queued"}"#).unwrap();
        let result = TaskResult::from(resp);
        assert!(result.summary.is_none());
        assert!(result.results.is_empty());
    }

    #[test]
    fn test_health_tolerates_null_and_wrong_types() {
        let health: HealthReport = serde_json::from_str(
            r#"{"agents":null,"swarm_active":"yes","rag_docs":7,"version":3}"#,
        )
        .unwrap();
        assert_eq!(health.agents, 0);
        assert!(!health.swarm_active);
        assert_eq!(health.rag_docs, 7);
        assert!(health.version.is_none());
    }

    #[test]
    fn test_health_ignores_legacy_aliases() {
        let health: HealthReport =
            serde_json::from_str(r#"{"agents":3,"swarm":"active","rag":9}"#).unwrap();
        assert_eq!(health.agents, 3);
        assert!(!health.swarm_active);
        assert_eq!(health.rag_docs, 0);
    }
}
