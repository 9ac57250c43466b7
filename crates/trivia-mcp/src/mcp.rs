use rmcp::{
    handler::server::router::tool::ToolRouter as RmcpToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::stdio,
    ErrorData as McpError, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use trivia::TriviaTools;

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct ResearchArgs {
    /// Topic to research, e.g. "Roman Empire".
    #[serde(default)]
    topic: String,
    /// "normal" (2 lookups) or "deep" (4 lookups).
    #[serde(default)]
    depth: String,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct TodayArgs {
    /// Optional MM-DD (e.g. "12-25"); empty means today.
    #[serde(default)]
    date_override: String,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct WeekArgs {
    /// Optional YYYY-MM-DD; empty means Monday of the current week.
    #[serde(default)]
    start_date: String,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct EntertainmentArgs {
    /// Optional focus: movie, tv, music, oscar (or awards), emmy.
    #[serde(default)]
    category: String,
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct SportsArgs {
    /// Optional league or sport: nfl, nba, mlb, nhl, soccer (or premier), olympics.
    #[serde(default)]
    sport: String,
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct GeographyArgs {
    #[serde(default)]
    query: String,
    /// Optional focus: capital, landmark (or wonder), country (or nation), flag.
    #[serde(default)]
    category: String,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct ScienceArgs {
    /// Optional field: space, biology, chemistry, physics, tech (or computer).
    #[serde(default)]
    field: String,
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct SearchArgs {
    /// Optional category hint; the query is classified when empty or unrecognized.
    #[serde(default)]
    category: String,
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize, JsonSchema, Default)]
struct UrlArgs {
    /// Absolute http(s) URL.
    #[serde(default)]
    url: String,
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

#[derive(Clone)]
pub(crate) struct TriviaMcp {
    tool_router: RmcpToolRouter<Self>,
    tools: TriviaTools,
}

#[tool_router]
impl TriviaMcp {
    pub(crate) fn new(tools: TriviaTools) -> Self {
        Self {
            tool_router: Self::tool_router(),
            tools,
        }
    }

    #[tool(description = "Research a trivia topic with web search and Wikipedia (depth: normal|deep)")]
    async fn research_trivia_topic(
        &self,
        params: Parameters<Option<ResearchArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0.unwrap_or_default();
        Ok(text_result(
            self.tools
                .research_trivia_topic(&args.topic, &args.depth)
                .await,
        ))
    }

    #[tool(description = "Births, events and deaths for a calendar date (MM-DD, default today)")]
    async fn trivia_for_today(
        &self,
        params: Parameters<Option<TodayArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0.unwrap_or_default();
        Ok(text_result(
            self.tools.trivia_for_today(&args.date_override).await,
        ))
    }

    #[tool(description = "Seven days of birthdays and history from a start date (YYYY-MM-DD, default this Monday)")]
    async fn trivia_for_week(
        &self,
        params: Parameters<Option<WeekArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0.unwrap_or_default();
        Ok(text_result(self.tools.trivia_for_week(&args.start_date).await))
    }

    #[tool(description = "Movie, TV, music and awards trivia")]
    async fn search_entertainment_trivia(
        &self,
        params: Parameters<Option<EntertainmentArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0.unwrap_or_default();
        Ok(text_result(
            self.tools
                .search_entertainment_trivia(&args.query, &args.category)
                .await,
        ))
    }

    #[tool(description = "Sports trivia, records and history")]
    async fn search_sports_trivia(
        &self,
        params: Parameters<Option<SportsArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0.unwrap_or_default();
        Ok(text_result(
            self.tools
                .search_sports_trivia(&args.query, &args.sport)
                .await,
        ))
    }

    #[tool(description = "Countries, capitals, landmarks and flags")]
    async fn search_geography_trivia(
        &self,
        params: Parameters<Option<GeographyArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0.unwrap_or_default();
        Ok(text_result(
            self.tools
                .search_geography_trivia(&args.query, &args.category)
                .await,
        ))
    }

    #[tool(description = "Science, space, nature and technology trivia")]
    async fn search_science_trivia(
        &self,
        params: Parameters<Option<ScienceArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0.unwrap_or_default();
        Ok(text_result(
            self.tools
                .search_science_trivia(&args.query, &args.field)
                .await,
        ))
    }

    #[tool(description = "Classify a query into a trivia category and search it")]
    async fn search_trivia(
        &self,
        params: Parameters<Option<SearchArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0.unwrap_or_default();
        Ok(text_result(
            self.tools.search_trivia(&args.category, &args.query).await,
        ))
    }

    #[tool(description = "Fetch a web page and return its readable text (first 6000 characters)")]
    async fn fetch_trivia_from_url(
        &self,
        params: Parameters<Option<UrlArgs>>,
    ) -> Result<CallToolResult, McpError> {
        let args = params.0.unwrap_or_default();
        Ok(text_result(self.tools.fetch_trivia_from_url(&args.url).await))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for TriviaMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Bar-trivia research: web search, Wikipedia on-this-day and summaries, URL text extraction. Every tool returns plain text; missing sources are noted, never fatal."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub(crate) async fn serve_stdio(tools: TriviaTools) -> Result<(), McpError> {
    let running = TriviaMcp::new(tools)
        .serve(stdio())
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    running
        .waiting()
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trivia::dates::Clock;
    use trivia_local::{SourceConfig, Sources};

    fn p<T>(v: T) -> Parameters<Option<T>> {
        Parameters(Some(v))
    }

    fn text_of(r: &CallToolResult) -> String {
        r.content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    fn offline_server() -> TriviaMcp {
        // Nothing listens on the discard port; any request fails fast.
        let cfg = SourceConfig::with_base_url("http://127.0.0.1:9");
        let sources = Sources::local(&cfg).expect("sources");
        TriviaMcp::new(TriviaTools::new(sources, Clock::System))
    }

    #[tokio::test]
    async fn bad_url_is_a_successful_text_result() {
        let svc = offline_server();
        let r = svc
            .fetch_trivia_from_url(p(UrlArgs {
                url: "not-a-url".into(),
            }))
            .await
            .expect("tool result");
        assert!(text_of(&r).starts_with("❌ Error:"));
    }

    #[tokio::test]
    async fn missing_params_default_to_empty_strings() {
        let svc = offline_server();
        let r = svc
            .search_sports_trivia(Parameters(None))
            .await
            .expect("tool result");
        assert!(text_of(&r).contains("invalid_params"));

        let r = svc
            .research_trivia_topic(p(ResearchArgs::default()))
            .await
            .expect("tool result");
        assert!(text_of(&r).contains("invalid_params"));
    }

    #[test]
    fn info_advertises_tools() {
        let info = rmcp::ServerHandler::get_info(&offline_server());
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap_or_default().contains("trivia"));
    }
}
