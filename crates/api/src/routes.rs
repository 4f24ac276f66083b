use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use dataset::{Dataset, DatasetReader, Entity};
use index::{GraphIndex, IndexStats};
use query::{NeighborhoodExtractor, Subgraph, SubgraphDiff};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::cache::SubgraphCache;
use crate::metrics::{MetricsSnapshot, TimedOperation};
use crate::state::{AppState, LoadedGraph};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/dataset", post(load_dataset))
        .route("/dataset/load", post(load_dataset_file))
        .route("/stats", get(get_stats))
        .route("/subgraph", get(get_subgraph))
        .route("/transition", get(get_transition))
        .route("/search", get(search))
        .route("/entities/:id", get(get_entity))
        .route("/metrics", get(get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    dataset_loaded: bool,
    generation: Option<Uuid>,
}

#[derive(Deserialize)]
struct LoadRequest {
    path: String,
}

#[derive(Serialize)]
struct LoadResponse {
    generation: Uuid,
    fingerprint: String,
    stats: IndexStats,
}

#[derive(Deserialize)]
struct SubgraphParams {
    center: String,
    depth: Option<usize>,
    max_nodes: Option<usize>,
}

#[derive(Serialize)]
struct SubgraphResponse {
    center: String,
    depth: usize,
    truncated: bool,
    #[serde(flatten)]
    subgraph: Subgraph,
}

#[derive(Deserialize)]
struct TransitionParams {
    from: String,
    to: String,
    depth: Option<usize>,
    max_nodes: Option<usize>,
}

#[derive(Serialize)]
struct TransitionResponse {
    diff: SubgraphDiff,
    subgraph: Subgraph,
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct EntityResponse {
    #[serde(flatten)]
    entity: Entity,
    connections: usize,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let current = state.current().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        dataset_loaded: current.is_some(),
        generation: current.map(|g| g.generation),
    })
}

async fn load_dataset(
    State(state): State<Arc<AppState>>,
    Json(dataset): Json<Dataset>,
) -> Result<Json<LoadResponse>, StatusCode> {
    let result = swap_in(&state, dataset).await;
    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn load_dataset_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoadRequest>,
) -> Result<Json<LoadResponse>, StatusCode> {
    let path = PathBuf::from(&req.path);

    let result: Result<LoadResponse, StatusCode> = async {
        if !path.is_file() {
            return Err(StatusCode::NOT_FOUND);
        }
        let dataset = DatasetReader::read_file(&path).await.map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Dataset load failed");
            StatusCode::BAD_REQUEST
        })?;
        swap_in(&state, dataset).await
    }
    .await;

    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn swap_in(state: &AppState, dataset: Dataset) -> Result<LoadResponse, StatusCode> {
    let timer = TimedOperation::start();
    let index = tokio::task::spawn_blocking(move || GraphIndex::build(&dataset))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Index build panicked");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    state.metrics.record_index(timer.elapsed());

    let loaded = state.swap(index).await;
    Ok(LoadResponse {
        generation: loaded.generation,
        fingerprint: loaded.index.fingerprint().to_string(),
        stats: loaded.index.stats().clone(),
    })
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<IndexStats>, StatusCode> {
    let result = current_graph(&state)
        .await
        .map(|graph| graph.index.stats().clone());

    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn get_subgraph(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubgraphParams>,
) -> Result<Json<SubgraphResponse>, StatusCode> {
    let result: Result<SubgraphResponse, StatusCode> = async {
        let graph = current_graph(&state).await?;
        let (depth, max_nodes) = limits(&state, params.depth, params.max_nodes)?;
        let subgraph = extract_cached(&state, &graph, &params.center, depth, max_nodes);

        Ok(SubgraphResponse {
            center: params.center,
            depth,
            truncated: subgraph.is_truncated(),
            subgraph: (*subgraph).clone(),
        })
    }
    .await;

    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn get_transition(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransitionParams>,
) -> Result<Json<TransitionResponse>, StatusCode> {
    let result: Result<TransitionResponse, StatusCode> = async {
        let graph = current_graph(&state).await?;
        let (depth, max_nodes) = limits(&state, params.depth, params.max_nodes)?;

        let previous = extract_cached(&state, &graph, &params.from, depth, max_nodes);
        let next = extract_cached(&state, &graph, &params.to, depth, max_nodes);

        Ok(TransitionResponse {
            diff: query::diff_subgraphs(&previous, &next),
            subgraph: (*next).clone(),
        })
    }
    .await;

    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Entity>>, StatusCode> {
    let result: Result<Vec<Entity>, StatusCode> = async {
        let graph = current_graph(&state).await?;
        let limit = params.limit.unwrap_or(state.config.search.max_results);

        let timer = TimedOperation::start();
        let results = query::search_entities(&params.q, graph.index.entities(), limit);
        state.metrics.record_search(timer.elapsed());
        Ok(results)
    }
    .await;

    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn get_entity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EntityResponse>, StatusCode> {
    let result: Result<EntityResponse, StatusCode> = async {
        let graph = current_graph(&state).await?;
        let entity = graph
            .index
            .entity_index()
            .get(&id)
            .cloned()
            .ok_or(StatusCode::NOT_FOUND)?;

        Ok(EntityResponse {
            connections: query::count_connections(&id, graph.index.adjacency()),
            entity,
        })
    }
    .await;

    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn current_graph(state: &AppState) -> Result<Arc<LoadedGraph>, StatusCode> {
    state.current().await.ok_or(StatusCode::CONFLICT)
}

/// Resolve and validate request limits against the configuration.
fn limits(
    state: &AppState,
    depth: Option<usize>,
    max_nodes: Option<usize>,
) -> Result<(usize, usize), StatusCode> {
    let graph = &state.config.graph;
    let depth = depth.unwrap_or(graph.default_depth);
    let max_nodes = max_nodes.unwrap_or(graph.max_nodes);

    if depth > graph.max_depth || max_nodes == 0 || max_nodes > graph.max_nodes {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok((depth, max_nodes))
}

fn extract_cached(
    state: &AppState,
    graph: &LoadedGraph,
    center_id: &str,
    depth: usize,
    max_nodes: usize,
) -> Arc<Subgraph> {
    let key = SubgraphCache::key(graph.index.fingerprint(), center_id, depth, max_nodes);
    if let Some(hit) = state.cache.get(&key) {
        state.metrics.record_cache_hit();
        return hit;
    }

    let timer = TimedOperation::start();
    let subgraph = Arc::new(NeighborhoodExtractor::new(&graph.index).extract(center_id, max_nodes, depth));
    state.metrics.record_extract(timer.elapsed(), subgraph.nodes.len());

    state.cache.insert(key, Arc::clone(&subgraph));
    subgraph
}
