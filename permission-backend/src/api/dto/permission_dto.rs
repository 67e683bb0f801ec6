// src/api/dto/permission_dto.rs

use crate::error::AppResult;
use crate::shared::types::SearchParams;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// 権限検索エンドポイントのクエリパラメータ
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPermissionSearchParams {
    pub p: Option<u64>,
    pub ps: Option<u64>,
    pub f: Option<String>,
    pub q: Option<String>,
    pub permission: Option<String>,
    pub project_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    /// カンマ区切りのログインリスト（省略時は制限なし）
    pub logins: Option<String>,
}

impl UserPermissionSearchParams {
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            p: self.p,
            ps: self.ps,
            f: self.f.clone(),
        }
    }

    /// ログインリストをパース。パラメータ自体が省略されていればNone
    pub fn login_list(&self) -> Option<Vec<String>> {
        self.logins.as_deref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|login| !login.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

/// プロジェクトごとのユーザー数カウントのクエリパラメータ
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectUserCountParams {
    /// カンマ区切りのプロジェクトIDリスト
    pub project_ids: String,
}

impl ProjectUserCountParams {
    pub fn project_id_list(&self) -> AppResult<Vec<Uuid>> {
        self.project_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Ok(Uuid::parse_str(id)?))
            .collect()
    }
}

/// 権限付与リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GrantPermissionRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, message = "Permission cannot be empty"))]
    pub permission: String,

    pub project_id: Option<Uuid>,
}
