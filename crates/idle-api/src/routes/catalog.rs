use axum::{
    extract::{Path, State},
    Json,
};
use idle_types::{AgentSummary, Model};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// List the agent catalog in presentation order
pub async fn list_agents(State(state): State<Arc<AppState>>) -> Json<Vec<AgentSummary>> {
    Json(state.dispatcher.agents().summaries())
}

pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(agent_name): Path<String>,
) -> ApiResult<Json<AgentSummary>> {
    state
        .dispatcher
        .agents()
        .lookup(&agent_name)
        .map(|agent| Json(agent.summary()))
        .ok_or(ApiError::AgentNotFound(agent_name))
}

pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<Vec<Model>> {
    Json(state.models.list().to_vec())
}
