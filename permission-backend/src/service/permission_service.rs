// src/service/permission_service.rs

use crate::db::DbPool;
use crate::domain::permission::PermissionKind;
use crate::domain::permission_query::PermissionQuery;
use crate::domain::user_permission_model;
use crate::error::{AppError, AppResult};
use crate::repository::user_permission_repository::{
    ExtendedUserPermissionDto, NewUserPermission, UserCountPerProjectPermission,
    UserPermissionRepository,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 権限検索の1ページ分の結果と総件数
#[derive(Debug)]
pub struct UserPermissionPage {
    pub permissions: Vec<ExtendedUserPermissionDto>,
    pub total: u64,
}

pub struct PermissionService {
    repo: Arc<UserPermissionRepository>,
}

impl PermissionService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            repo: Arc::new(UserPermissionRepository::new(db_pool)),
        }
    }

    /// クエリに一致する権限割り当ての1ページと総ユーザー数を取得
    pub async fn search_users(
        &self,
        query: &PermissionQuery,
        user_logins: Option<&[String]>,
    ) -> AppResult<UserPermissionPage> {
        let permissions = self.repo.select_by_query(query, user_logins).await?;
        let total = self.repo.count_users(query).await?;

        Ok(UserPermissionPage { permissions, total })
    }

    /// プロジェクトごと・権限ごとのユーザー数を取得
    pub async fn project_permission_counts(
        &self,
        project_ids: &[Uuid],
    ) -> AppResult<Vec<UserCountPerProjectPermission>> {
        self.repo.count_users_by_project_permission(project_ids).await
    }

    /// 権限割り当てを1件付与
    pub async fn grant_permission(
        &self,
        user_id: Uuid,
        permission: &str,
        project_id: Option<Uuid>,
    ) -> AppResult<user_permission_model::Model> {
        // 権限種別とスコープの整合性を検証
        let kind = PermissionKind::from_str(permission).ok_or_else(|| {
            AppError::ValidationError(format!("Unknown permission: {}", permission))
        })?;

        let valid_for_scope = match project_id {
            Some(_) => kind.is_project_permission(),
            None => kind.is_global_permission(),
        };
        if !valid_for_scope {
            return Err(AppError::ValidationError(format!(
                "Permission '{}' cannot be granted in this scope",
                kind
            )));
        }

        let created = self
            .repo
            .insert(NewUserPermission {
                user_id,
                project_id,
                permission: kind.as_str().to_string(),
            })
            .await?;

        info!(
            user_id = %user_id,
            permission = %kind,
            project_id = ?project_id,
            "Granted user permission"
        );

        Ok(created)
    }
}
