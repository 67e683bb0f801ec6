// src/api/handlers/permission_handler.rs

use crate::api::dto::permission_dto::{
    GrantPermissionRequest, ProjectUserCountParams, UserPermissionSearchParams,
};
use crate::domain::permission_query::PermissionQuery;
use crate::domain::user_permission_model;
use crate::error::{AppError, AppResult};
use crate::repository::user_permission_repository::{
    ExtendedUserPermissionDto, UserCountPerProjectPermission,
};
use crate::service::permission_service::PermissionService;
use crate::shared::types::search_options::{define_generic_parameters, ParamDefinition};
use crate::shared::types::{Doc, SearchOptions};
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use validator::Validate;

/// 検索レスポンスで返却可能なユーザーフィールド
pub const USER_FIELDS: &[&str] = &["login", "name", "email", "permission", "project_id"];

/// 検索アクションの定義（ルート登録時に一度だけ構築される）
#[derive(Debug, Clone, Serialize)]
pub struct ActionDefinition {
    pub action: &'static str,
    pub params: Vec<ParamDefinition>,
}

// --- Handlers ---

/// クエリに一致するユーザー権限割り当てを検索
pub async fn search_user_permissions_handler(
    State(service): State<Arc<PermissionService>>,
    Query(params): Query<UserPermissionSearchParams>,
) -> AppResult<Json<Value>> {
    let options = SearchOptions::from_params(&params.search_params())?;

    let query = PermissionQuery::builder()
        .organization_id(params.organization_id)
        .project_id(params.project_id)
        .permission(params.permission.clone())
        .search_query(params.q.clone())
        .page(options.page())
        .page_size(options.page_size())
        .build();

    let logins = params.login_list();
    let page = service.search_users(&query, logins.as_deref()).await?;

    info!(
        total = page.total,
        page = options.page(),
        page_size = options.page_size(),
        "Searched user permissions"
    );

    let mut json = Map::new();
    options.write_statistics(&mut json, page.total);

    let mut users = Vec::with_capacity(page.permissions.len());
    for permission in &page.permissions {
        users.push(write_user(permission, &options)?);
    }
    json.insert("users".to_string(), Value::Array(users));

    Ok(Json(Value::Object(json)))
}

/// プロジェクトごと・権限ごとのユーザー数を取得
pub async fn project_permission_counts_handler(
    State(service): State<Arc<PermissionService>>,
    Query(params): Query<ProjectUserCountParams>,
) -> AppResult<Json<Vec<UserCountPerProjectPermission>>> {
    let project_ids = params.project_id_list()?;
    let counts = service.project_permission_counts(&project_ids).await?;
    Ok(Json(counts))
}

/// 権限割り当てを1件付与
pub async fn grant_permission_handler(
    State(service): State<Arc<PermissionService>>,
    Json(payload): Json<GrantPermissionRequest>,
) -> AppResult<(StatusCode, Json<user_permission_model::Model>)> {
    // バリデーション
    payload.validate().map_err(|validation_errors| {
        warn!("Grant permission validation failed: {}", validation_errors);
        let errors: Vec<String> = validation_errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error.message.as_ref().unwrap_or(&"Invalid value".into())
                    )
                })
            })
            .collect();
        AppError::ValidationErrors(errors)
    })?;

    let created = service
        .grant_permission(payload.user_id, &payload.permission, payload.project_id)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// ヘルスチェック
pub async fn health_check_handler() -> &'static str {
    "OK"
}

// 検索オプションで要求されたフィールドだけをレスポンスに投影する
fn write_user(
    permission: &ExtendedUserPermissionDto,
    options: &SearchOptions,
) -> AppResult<Value> {
    let serialized = serde_json::to_value(permission)
        .map_err(|e| AppError::InternalServerError(format!("Failed to serialize user: {}", e)))?;
    let Value::Object(fields) = serialized else {
        return Err(AppError::InternalServerError(
            "User did not serialize to an object".to_string(),
        ));
    };
    let doc = Doc::new(fields);

    let mut out = Map::new();
    // 識別フィールドは常に返す
    out.insert("user_id".to_string(), doc.get_field("user_id")?.clone());
    for field in USER_FIELDS {
        if options.has_field(field) {
            out.insert(field.to_string(), doc.get_field(field)?.clone());
        }
    }
    Ok(Value::Object(out))
}

// --- Router Setup ---

pub fn permission_router(service: Arc<PermissionService>) -> Router {
    // パラメータ定義はリクエストごとではなくルート登録時に構築する
    let definition = ActionDefinition {
        action: "search_users",
        params: define_generic_parameters(USER_FIELDS),
    };

    Router::new()
        .route(
            "/permissions/users",
            get(search_user_permissions_handler),
        )
        .route(
            "/permissions/users/definition",
            get(move || {
                let definition = definition.clone();
                async move { Json(definition) }
            }),
        )
        .route(
            "/permissions/projects/user_counts",
            get(project_permission_counts_handler),
        )
        .route("/permissions", post(grant_permission_handler))
        .route("/health", get(health_check_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
