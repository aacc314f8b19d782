//! Price API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use shared::client::{PriceRow, PriceUpdateQuery, PriceUpdateSummary, PricesById, PricesByName};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::menu::PriceUpdate;
use crate::utils::validation::{validate_language_code, validate_price_inputs};
use crate::utils::{ApiResponse, AppResult};

/// GET /api/prices/{lang} - 获取价格表
pub async fn price_table(
    State(state): State<ServerState>,
    Path(lang): Path<String>,
) -> AppResult<Json<Vec<PriceRow>>> {
    validate_language_code(&lang)?;
    Ok(Json(state.menus.price_table(&lang)?))
}

/// POST /api/prices/update - 按菜品名更新所有语言的价格
pub async fn update_by_name(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PriceUpdateQuery>,
    Json(prices): Json<PricesByName>,
) -> AppResult<Json<ApiResponse<PriceUpdateSummary>>> {
    let mut update = PriceUpdate::by_name(validate_price_inputs(prices)?);
    if query.include_options {
        update = update.including_options();
    }
    run(&state, &user, update)
}

/// POST /api/prices/update-by-id - 按菜品 ID 更新所有语言的价格
pub async fn update_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(prices): Json<PricesById>,
) -> AppResult<Json<ApiResponse<PriceUpdateSummary>>> {
    run(&state, &user, PriceUpdate::by_id(validate_price_inputs(prices)?))
}

fn run(
    state: &ServerState,
    user: &CurrentUser,
    update: PriceUpdate,
) -> AppResult<Json<ApiResponse<PriceUpdateSummary>>> {
    let report = state.menus.update_prices(&update)?;
    tracing::info!(
        user = %user.username,
        keys = update.prices.len(),
        items_updated = report.items_updated(),
        "Prices updated via API"
    );

    Ok(Json(ApiResponse::success_with_message(
        "Prices updated",
        PriceUpdateSummary {
            languages: report.language_codes(),
            items_updated: report.items_updated(),
        },
    )))
}
