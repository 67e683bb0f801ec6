// src/repository/user_permission_repository.rs

use crate::db::{self, DbPool, IN_CLAUSE_PARTITION_SIZE};
use crate::domain::permission_query::PermissionQuery;
use crate::domain::project_model;
use crate::domain::user_model::{self, Entity as UserEntity};
use crate::domain::user_permission_model::{
    self, ActiveModel as UserPermissionActiveModel, Entity as UserPermissionEntity,
};
use crate::error::{AppError, AppResult};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    Condition, FromQueryResult, JoinType, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use serde::Serialize;
use uuid::Uuid;

/// ユーザー・権限割り当ての検索結果行（usersとのJOIN射影）
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct ExtendedUserPermissionDto {
    pub user_id: Uuid,
    pub login: String,
    pub name: String,
    pub email: Option<String>,
    pub permission: Option<String>,
    pub project_id: Option<Uuid>,
}

/// プロジェクト×権限ごとのユーザー数（グループ化クエリの結果）
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct UserCountPerProjectPermission {
    pub project_id: Uuid,
    pub permission: String,
    pub user_count: i64,
}

/// 新規の権限割り当て
#[derive(Debug, Clone)]
pub struct NewUserPermission {
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub permission: String,
}

#[derive(Debug)]
pub struct UserPermissionRepository {
    db: DbPool,
}

impl UserPermissionRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// クエリに一致する権限割り当てを1ページ分取得
    ///
    /// `user_logins` が指定されている場合はそのログイン集合に限定する。
    /// 空集合ならクエリを実行せずに空リストを返し、IN句の上限
    /// （1,000件）を超える場合はクエリ実行前に invalid-argument で失敗する。
    pub async fn select_by_query(
        &self,
        query: &PermissionQuery,
        user_logins: Option<&[String]>,
    ) -> AppResult<Vec<ExtendedUserPermissionDto>> {
        if let Some(logins) = user_logins {
            if logins.is_empty() {
                return Ok(Vec::new());
            }
            if logins.len() > IN_CLAUSE_PARTITION_SIZE {
                return Err(AppError::BadRequest(
                    "Maximum 1'000 users are accepted".to_string(),
                ));
            }
        }

        let mut select = Self::filtered_users(query)
            .select_only()
            .column_as(user_model::Column::Id, "user_id")
            .column(user_model::Column::Login)
            .column(user_model::Column::Name)
            .column(user_model::Column::Email)
            .column_as(user_permission_model::Column::Permission, "permission")
            .column_as(user_permission_model::Column::ProjectId, "project_id")
            .order_by(user_model::Column::Login, Order::Asc)
            .order_by(user_permission_model::Column::Permission, Order::Asc)
            .offset(query.offset())
            .limit(query.page_size());

        if let Some(logins) = user_logins {
            select = select.filter(user_model::Column::Login.is_in(logins.to_vec()));
        }

        let rows = select
            .into_model::<ExtendedUserPermissionDto>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// クエリに一致するユーザーの総数（ページネーションは無視する）
    pub async fn count_users(&self, query: &PermissionQuery) -> AppResult<u64> {
        let count = Self::filtered_users(query)
            .select_only()
            .column(user_model::Column::Id)
            .distinct()
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// プロジェクトごと・権限ごとのユーザー数を取得
    ///
    /// 入力のプロジェクトID集合はIN句の上限以下のバッチに自動分割され、
    /// 各バッチの結果がマージされる。空の入力は空リストを返す。
    pub async fn count_users_by_project_permission(
        &self,
        project_ids: &[Uuid],
    ) -> AppResult<Vec<UserCountPerProjectPermission>> {
        db::execute_large_inputs(project_ids, |batch| async move {
            UserPermissionEntity::find()
                .select_only()
                .column(user_permission_model::Column::ProjectId)
                .column(user_permission_model::Column::Permission)
                .column_as(user_permission_model::Column::UserId.count(), "user_count")
                .filter(user_permission_model::Column::ProjectId.is_in(batch))
                .group_by(user_permission_model::Column::ProjectId)
                .group_by(user_permission_model::Column::Permission)
                .into_model::<UserCountPerProjectPermission>()
                .all(&self.db)
                .await
                .map_err(AppError::from)
        })
        .await
    }

    /// 権限割り当てを1件永続化
    ///
    /// 重複はDBのユニーク制約に委ねる（DbErrとして表面化する）。
    pub async fn insert(
        &self,
        new_permission: NewUserPermission,
    ) -> AppResult<user_permission_model::Model> {
        let model = UserPermissionActiveModel {
            user_id: Set(new_permission.user_id),
            project_id: Set(new_permission.project_id),
            permission: Set(new_permission.permission),
            ..UserPermissionActiveModel::new()
        };

        Ok(model.insert(&self.db).await?)
    }

    // クエリ共通のJOINとフィルタを構築する（ログイン集合の絞り込みは含まない）
    fn filtered_users(query: &PermissionQuery) -> Select<UserEntity> {
        let mut select = UserEntity::find()
            .join(
                JoinType::LeftJoin,
                user_model::Relation::UserPermissions.def(),
            )
            .filter(user_model::Column::Active.eq(true));

        if let Some(project_id) = query.project_id() {
            select = select.filter(user_permission_model::Column::ProjectId.eq(project_id));
        } else if query.permission().is_some() {
            // プロジェクト指定のない権限フィルタはグローバル権限のみを対象にする
            select = select.filter(user_permission_model::Column::ProjectId.is_null());
        }

        if let Some(permission) = query.permission() {
            select = select.filter(user_permission_model::Column::Permission.eq(permission));
        }

        if let Some(organization_id) = query.organization_id() {
            // 組織スコープはプロジェクト経由で絞り込む
            select = select
                .join(
                    JoinType::LeftJoin,
                    user_permission_model::Relation::Project.def(),
                )
                .filter(project_model::Column::OrganizationId.eq(organization_id));
        }

        if let Some(search) = query.search_query() {
            // 大文字小文字を区別しない部分一致（両辺をlowerに揃える）
            let pattern = format!("%{}%", search.to_lowercase());
            let lower_like = |column: user_model::Column| {
                Expr::expr(Func::lower(Expr::col((user_model::Entity, column))))
                    .like(pattern.clone())
            };
            select = select.filter(
                Condition::any()
                    .add(lower_like(user_model::Column::Login))
                    .add(lower_like(user_model::Column::Name))
                    .add(lower_like(user_model::Column::Email)),
            );
        }

        select
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};
    use std::collections::BTreeMap;

    type MockRow = BTreeMap<&'static str, sea_orm::Value>;

    // クエリ結果を登録しないモック接続。クエリが1つでも実行されると失敗する
    fn repository_expecting_no_queries() -> UserPermissionRepository {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        UserPermissionRepository::new(db)
    }

    #[tokio::test]
    async fn test_select_with_empty_login_set_executes_no_query() {
        let repo = repository_expecting_no_queries();
        let query = PermissionQuery::builder().build();

        let rows = repo.select_by_query(&query, Some(&[])).await.unwrap();

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_select_with_oversized_login_set_fails_before_query() {
        let repo = repository_expecting_no_queries();
        let query = PermissionQuery::builder().build();
        let logins: Vec<String> = (0..1001).map(|i| format!("user-{}", i)).collect();

        let err = repo
            .select_by_query(&query, Some(&logins))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(err.to_string().contains("Maximum 1'000 users are accepted"));
    }

    #[tokio::test]
    async fn test_select_with_login_set_at_the_limit_passes_the_guard() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<MockRow>::new()])
            .into_connection();
        let repo = UserPermissionRepository::new(db);
        let query = PermissionQuery::builder().build();
        let logins: Vec<String> = (0..1000).map(|i| format!("user-{}", i)).collect();

        // ちょうど1,000件はサイズガードを通過してクエリが実行される
        let rows = repo.select_by_query(&query, Some(&logins)).await.unwrap();

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_select_maps_joined_rows() {
        let user_id = Uuid::new_v4();
        let project_id = Uuid::new_v4();

        let mut row = MockRow::new();
        row.insert("user_id", user_id.into());
        row.insert("login", "marius".into());
        row.insert("name", "Marius".into());
        row.insert(
            "email",
            sea_orm::Value::String(Some(Box::new("marius@example.com".to_string()))),
        );
        row.insert(
            "permission",
            sea_orm::Value::String(Some(Box::new("admin".to_string()))),
        );
        row.insert("project_id", project_id.into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();
        let repo = UserPermissionRepository::new(db);
        let query = PermissionQuery::builder().build();

        let rows = repo.select_by_query(&query, None).await.unwrap();

        assert_eq!(
            rows,
            vec![ExtendedUserPermissionDto {
                user_id,
                login: "marius".to_string(),
                name: "Marius".to_string(),
                email: Some("marius@example.com".to_string()),
                permission: Some("admin".to_string()),
                project_id: Some(project_id),
            }]
        );
    }

    #[test]
    fn test_search_query_filter_matches_case_insensitively() {
        let query = PermissionQuery::builder()
            .search_query(Some("Marius".to_string()))
            .build();

        let sql = UserPermissionRepository::filtered_users(&query)
            .build(DatabaseBackend::Postgres)
            .to_string();

        // "Marius" で "marius" も拾えるよう、両辺がlowerに揃っていること
        for column in ["login", "name", "email"] {
            assert!(
                sql.contains(&format!(r#"LOWER("users"."{}") LIKE '%marius%'"#, column)),
                "no case-insensitive filter on {}: {}",
                column,
                sql
            );
        }
    }

    #[tokio::test]
    async fn test_count_users_by_project_permission_empty_input_executes_no_query() {
        let repo = repository_expecting_no_queries();

        let counts = repo.count_users_by_project_permission(&[]).await.unwrap();

        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn test_count_users_by_project_permission_maps_grouped_rows() {
        let project_id = Uuid::new_v4();

        let mut row = MockRow::new();
        row.insert("project_id", project_id.into());
        row.insert("permission", "user".into());
        row.insert("user_count", 7i64.into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();
        let repo = UserPermissionRepository::new(db);

        let counts = repo
            .count_users_by_project_permission(&[project_id])
            .await
            .unwrap();

        assert_eq!(
            counts,
            vec![UserCountPerProjectPermission {
                project_id,
                permission: "user".to_string(),
                user_count: 7,
            }]
        );
    }
}
