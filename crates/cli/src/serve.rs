use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::State,
    http::{header, Response as HttpResponse, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use symgraph_graph::Graph;

/// Served at `/d3.js` by redirect when no local bundle is configured.
pub const D3_CDN: &str = "https://d3js.org/d3.v7.min.js";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "127.0.0.1";

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub bind: String,
    pub port: u16,
    /// Local force-layout bundle
    pub d3: Option<PathBuf>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            d3: None,
        }
    }
}

/// Everything the server hands out, rendered once at startup.
struct Assets {
    page: String,
    graph: String,
    d3: Option<String>,
}

impl Assets {
    fn load(graph: &Graph, config: &ServeConfig) -> Result<Self> {
        let d3 = match &config.d3 {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read d3 bundle {}", path.display()))?,
            ),
            None => None,
        };
        Ok(Self {
            page: symgraph_viewer::render_page(graph).context("Failed to render page")?,
            graph: graph.to_json().context("Failed to serialize graph")?,
            d3,
        })
    }
}

fn router(assets: Assets) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/d3.js", get(d3))
        .route("/graph.json", get(graph_json))
        .with_state(Arc::new(assets))
}

async fn page(State(assets): State<Arc<Assets>>) -> Result<Response, StatusCode> {
    let mut response = HttpResponse::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header("cross-origin-opener-policy", "same-origin");
    // A cross-origin script without CORP headers is blocked under require-corp.
    if assets.d3.is_some() {
        response = response.header("cross-origin-embedder-policy", "require-corp");
    }
    response
        .body(Body::from(assets.page.clone()))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn d3(State(assets): State<Arc<Assets>>) -> Result<Response, StatusCode> {
    let Some(bundle) = &assets.d3 else {
        return Ok(Redirect::temporary(D3_CDN).into_response());
    };
    HttpResponse::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/javascript; charset=utf-8")
        .header(header::CACHE_CONTROL, "max-age=604800")
        .body(Body::from(bundle.clone()))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn graph_json(State(assets): State<Arc<Assets>>) -> Result<Response, StatusCode> {
    HttpResponse::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(assets.graph.clone()))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serve the exploration page until the process is stopped.
pub async fn serve(graph: &Graph, config: &ServeConfig) -> Result<()> {
    let app = router(Assets::load(graph, config)?);

    let listener = tokio::net::TcpListener::bind((config.bind.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.bind, config.port))?;
    let local_addr = listener.local_addr()?;

    log::info!(
        "Graph has {} nodes and {} links",
        graph.nodes.len(),
        graph.links.len()
    );
    eprintln!("Serving visualization at http://{local_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
