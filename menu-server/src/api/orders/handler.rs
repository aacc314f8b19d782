//! Order Ticket API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Map, Value};
use shared::models::{Ticket, TicketStatusUpdate};

use crate::core::ServerState;
use crate::utils::time::now_millis;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/orders - 获取所有点单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Ticket>>> {
    Ok(Json(state.tickets.list()?))
}

/// POST /api/orders - 创建点单 (状态 in-progress，ID 自增)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<Map<String, Value>>,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    let ticket = state.tickets.create(payload, now_millis())?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// PUT /api/orders/{id} - 更新点单状态
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    Json(payload): Json<TicketStatusUpdate>,
) -> AppResult<Json<Ticket>> {
    Ok(Json(
        state.tickets.update_status(id, payload.status.as_deref())?,
    ))
}

/// DELETE /api/orders/{id} - 删除点单
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.tickets.delete(id)?;
    Ok(Json(ApiResponse::ok()))
}
