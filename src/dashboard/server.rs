//! HTTP surface of the map: the page itself and the JSON endpoints it calls.

use axum::{extract::Query, extract::State, response::Html, routing::get, Json, Router};
use log::info;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value as JSValue;

use participation_stats::view::{update_view, ViewUpdate};

use crate::dashboard::page::PageLayout;
use crate::dashboard::*;

/// Shared, read-only state of the handlers.
pub struct AppState {
    pub table: Vec<AggregateRow>,
    pub page: String,
}

impl AppState {
    pub fn new(config: DashboardConfig, table: Vec<AggregateRow>) -> AppState {
        AppState {
            page: PageLayout::new(&config).render(),
            table,
        }
    }
}

/// The two selections of the page.
#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    #[serde(default = "default_competition")]
    pub competition: String,
    #[serde(default = "default_metric")]
    pub metric: Metric,
}

fn default_competition() -> String {
    ALL_COMPETITIONS.to_string()
}

fn default_metric() -> Metric {
    Metric::Teams
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/update", get(update))
        .route("/api/table", get(table))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn index_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn update(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UpdateQuery>,
) -> Json<ViewUpdate> {
    let res = update_view(&query.competition, query.metric, &state.table);
    if res.metric != query.metric {
        info!(
            "update: metric {:?} not available for {:?}, using {:?}",
            query.metric, query.competition, res.metric
        );
    }
    Json(res)
}

async fn table(State(state): State<Arc<AppState>>) -> Json<JSValue> {
    Json(table_to_json(&state.table))
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<JSValue> {
    Json(json!({"status": "ok", "rows": state.table.len()}))
}

pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> DashboardResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(BindingSnafu { addr })?;
    info!("Serving the participation map on http://{}", addr);
    axum::serve(listener, create_router(state))
        .await
        .context(ServingSnafu {})
}
