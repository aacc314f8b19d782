//! Menu API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use shared::client::{ContentEditRequest, EditorView, MenuSaveQuery, MenuWriteAck};
use shared::menu::LocaleInfo;
use shared::models::MenuTree;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_language_code, validate_menu_tree,
    validate_optional_text, validate_required_text,
};
use crate::utils::{ApiResponse, AppResult};

/// GET /api/menu - 获取已存储的语言代码
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.menus.languages()?))
}

/// GET /api/menu/{lang} - 获取一种语言的整份菜单
pub async fn get_by_lang(
    State(state): State<ServerState>,
    Path(lang): Path<String>,
) -> AppResult<Json<MenuTree>> {
    validate_language_code(&lang)?;
    Ok(Json(state.menus.read_menu(&lang)?))
}

/// POST /api/menu/{lang} - 保存整份菜单
///
/// 带 `expectedRevision` 时，存储中的版本号不一致则返回 409。
pub async fn save(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(lang): Path<String>,
    Query(query): Query<MenuSaveQuery>,
    Json(tree): Json<MenuTree>,
) -> AppResult<Json<ApiResponse<MenuWriteAck>>> {
    validate_language_code(&lang)?;
    validate_menu_tree(&tree)?;

    let ack = state.menus.write_menu(&lang, tree, query.expected_revision)?;
    tracing::info!(user = %user.username, lang = %lang, revision = ack.revision, "Menu saved via API");

    Ok(Json(ApiResponse::success_with_message(
        format!("Menu '{}' saved", lang),
        ack,
    )))
}

/// GET /api/menu/{lang}/editor - 内容编辑视图 (仅分类下的直接菜品)
pub async fn editor_view(
    State(state): State<ServerState>,
    Path(lang): Path<String>,
) -> AppResult<Json<EditorView>> {
    validate_language_code(&lang)?;
    Ok(Json(state.menus.editor_view(&lang)?))
}

/// PUT /api/menu/{lang}/editor - 写回名称和描述
pub async fn apply_edits(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(lang): Path<String>,
    Json(request): Json<ContentEditRequest>,
) -> AppResult<Json<ApiResponse<MenuWriteAck>>> {
    validate_language_code(&lang)?;
    for edit in &request.edits {
        validate_required_text(&edit.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&edit.description, "description", MAX_NOTE_LEN)?;
    }

    let ack = state.menus.apply_content_edits(&lang, &request)?;
    tracing::info!(
        user = %user.username,
        lang = %lang,
        edits = request.edits.len(),
        revision = ack.revision,
        "Menu content edited via API"
    );

    Ok(Json(ApiResponse::success(ack)))
}

/// GET /api/menu/{lang}/locale - 文字方向和健康提示
///
/// 不要求菜单已存在；未知语言使用西班牙语提示。
pub async fn locale(Path(lang): Path<String>) -> AppResult<Json<LocaleInfo>> {
    validate_language_code(&lang)?;
    Ok(Json(LocaleInfo::for_language(&lang)))
}
