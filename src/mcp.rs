use std::sync::Arc;

use rmcp::{
    ServerHandler,
    ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult,
        Content,
        Implementation,
        ServerCapabilities,
        ServerInfo,
    },
    tool,
    tool_handler,
    tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    cli::SearchArgs,
    error,
    root_dir::RootDir,
    search::{self, SearchHit},
    walker::GroupSummary,
};

const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Clone)]
pub struct DocsiftMcpServer {
    root: Arc<RootDir>,
    tool_router: ToolRouter<Self>,
}

impl DocsiftMcpServer {
    fn new(root: RootDir) -> Self {
        Self {
            root: Arc::new(root),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router(router = tool_router)]
impl DocsiftMcpServer {
    /// Rank artifacts against a keyword query with BM25.
    #[tool(
        name = "docsift_search",
        description = "Keyword search over agent artifacts with BM25 ranking. Supports group filtering and score thresholds."
    )]
    pub async fn docsift_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;

        let mut args = SearchArgs::new(params.query);
        args.count = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        args.group = params.group;
        args.all = params.all.unwrap_or(false);
        args.min_score = params.min_score;

        let documents = self.root.load(args.group.as_deref());
        let mut results = search::execute_search(&args, &documents)
            .map_err(|e| mcp_error("search failed", e))?;

        if !params.include_snippet.unwrap_or(true) {
            for r in &mut results {
                r.snippet.clear();
            }
        }

        let summary = format_search_summary(&results, &args.query);
        let structured = serde_json::to_value(search::SearchResponse {
            query: &args.query,
            result_count: results.len(),
            results: &results,
        })
        .map_err(|e| mcp_error("failed to serialize search results", e))?;

        let mut result = CallToolResult::success(vec![Content::text(summary)]);
        result.structured_content = Some(structured);
        Ok(result)
    }

    /// List the artifact groups under the configured root.
    #[tool(
        name = "docsift_groups",
        description = "List artifact groups and the number of documents in each."
    )]
    pub async fn docsift_groups(
        &self,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let groups = self.root.groups();
        let summary = format_groups_summary(&groups);
        let structured = serde_json::to_value(GroupsResponse { groups })
            .map_err(|e| mcp_error("failed to serialize groups", e))?;

        let mut result = CallToolResult::success(vec![Content::text(summary)]);
        result.structured_content = Some(structured);
        Ok(result)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for DocsiftMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_server_info(
                Implementation::new("docsift", env!("CARGO_PKG_VERSION"))
                    .with_title("docsift MCP"),
            )
            .with_instructions(
                "Use docsift_search to find artifacts by keyword. Use docsift_groups to see which groups exist and filter by group when possible.",
            )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Search query string.
    pub query: String,
    /// Maximum number of results (default: 10).
    pub limit: Option<usize>,
    /// Restrict to a single group (subdirectory name).
    pub group: Option<String>,
    /// Minimum score threshold.
    pub min_score: Option<f64>,
    /// Return every document regardless of limit.
    pub all: Option<bool>,
    /// Include a snippet preview (default: true).
    pub include_snippet: Option<bool>,
}

#[derive(Debug, Serialize)]
struct GroupsResponse {
    groups: Vec<GroupSummary>,
}

fn format_search_summary(results: &[SearchHit], query: &str) -> String {
    if results.is_empty() {
        return format!("No results found for \"{query}\"");
    }

    let mut lines = Vec::with_capacity(results.len() + 1);
    let suffix = if results.len() == 1 { "" } else { "s" };
    lines.push(format!(
        "Found {} result{} for \"{query}\":",
        results.len(),
        suffix
    ));

    for r in results {
        lines.push(format!("{:.3} [{}] {}", r.score, r.group, r.path.display()));
    }

    lines.join("\n")
}

fn format_groups_summary(groups: &[GroupSummary]) -> String {
    if groups.is_empty() {
        return "No groups found.".to_string();
    }
    groups
        .iter()
        .map(|g| format!("{}\t{}", g.name, g.documents))
        .collect::<Vec<_>>()
        .join("\n")
}

fn mcp_error(message: &str, error: impl std::fmt::Display) -> rmcp::ErrorData {
    rmcp::ErrorData::internal_error(
        message.to_string(),
        Some(json!({ "error": error.to_string() })),
    )
}

pub fn run_mcp(root: RootDir) -> error::Result<()> {
    tracing::info!(root = %root.path().display(), "starting MCP server");
    let server = DocsiftMcpServer::new(root);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            error::Error::Config(format!("failed to start tokio runtime: {e}"))
        })?;

    runtime.block_on(async move {
        let transport = rmcp::transport::stdio();
        let running = server.serve(transport).await.map_err(|e| {
            error::Error::Config(format!(
                "MCP server initialization failed: {e}"
            ))
        })?;
        running.waiting().await.map_err(|e| {
            error::Error::Config(format!("MCP server error: {e}"))
        })?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_root() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for (group, name, body) in [
            ("librarian", "catalog.md", "---\ntitle: Catalog\n---\nRust books"),
            ("scribe", "log.md", "Meeting notes about pasta"),
        ] {
            let dir = tmp.path().join(group);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(name), body).unwrap();
        }
        tmp
    }

    fn params(query: &str) -> SearchParams {
        SearchParams {
            query: query.to_string(),
            limit: Some(5),
            group: None,
            min_score: None,
            all: Some(false),
            include_snippet: Some(true),
        }
    }

    #[tokio::test]
    async fn search_tool_returns_structured_results() {
        let tmp = setup_root();
        let server = DocsiftMcpServer::new(RootDir::resolve(Some(tmp.path())));

        let result = server
            .docsift_search(Parameters(params("rust")))
            .await
            .unwrap();

        let structured = result.structured_content.expect("structured");
        let results = structured
            .get("results")
            .and_then(|v| v.as_array())
            .expect("results array");

        assert_eq!(results.len(), 2);
        let first = &results[0];
        assert_eq!(
            first.get("group").and_then(|v| v.as_str()),
            Some("librarian")
        );
        assert_eq!(
            first.pointer("/metadata/title").and_then(|v| v.as_str()),
            Some("Catalog")
        );
        let snippet =
            first.get("snippet").and_then(|v| v.as_str()).unwrap_or("");
        assert!(snippet.contains("Rust books"));

        let summary = result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default();
        assert!(summary.contains("Found 2 results"));
    }

    #[tokio::test]
    async fn search_tool_respects_group_and_snippet_flags() {
        let tmp = setup_root();
        let server = DocsiftMcpServer::new(RootDir::resolve(Some(tmp.path())));

        let mut p = params("pasta");
        p.group = Some("scribe".to_string());
        p.include_snippet = Some(false);
        let result = server.docsift_search(Parameters(p)).await.unwrap();

        let structured = result.structured_content.expect("structured");
        let results = structured["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["group"], "scribe");
        assert_eq!(results[0]["snippet"], "");
    }

    #[tokio::test]
    async fn search_tool_on_missing_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing");
        let server =
            DocsiftMcpServer::new(RootDir::resolve(Some(missing.as_path())));

        let result = server
            .docsift_search(Parameters(params("anything")))
            .await
            .unwrap();

        let structured = result.structured_content.expect("structured");
        assert_eq!(structured["resultCount"], 0);
    }

    #[tokio::test]
    async fn groups_tool_lists_groups() {
        let tmp = setup_root();
        let server = DocsiftMcpServer::new(RootDir::resolve(Some(tmp.path())));

        let result = server.docsift_groups().await.unwrap();

        let structured = result.structured_content.expect("structured");
        let groups = structured["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["name"], "librarian");
        assert_eq!(groups[0]["documents"], 1);
    }
}
