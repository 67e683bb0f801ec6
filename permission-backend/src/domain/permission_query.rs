// src/domain/permission_query.rs

use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// 権限検索のフィルタ条件
///
/// リクエストごとに一度だけ構築されるイミュータブルな値オブジェクト。
/// 生成には `PermissionQuery::builder()` を使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionQuery {
    organization_id: Option<Uuid>,
    project_id: Option<Uuid>,
    permission: Option<String>,
    search_query: Option<String>,
    page: u64,
    page_size: u64,
}

impl PermissionQuery {
    pub fn builder() -> PermissionQueryBuilder {
        PermissionQueryBuilder::default()
    }

    pub fn organization_id(&self) -> Option<Uuid> {
        self.organization_id
    }

    pub fn project_id(&self) -> Option<Uuid> {
        self.project_id
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    /// 1始まりのページ番号
    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// ページネーション用のオフセットを計算
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

#[derive(Debug, Default)]
pub struct PermissionQueryBuilder {
    organization_id: Option<Uuid>,
    project_id: Option<Uuid>,
    permission: Option<String>,
    search_query: Option<String>,
    page: Option<u64>,
    page_size: Option<u64>,
}

impl PermissionQueryBuilder {
    pub fn organization_id(mut self, organization_id: Option<Uuid>) -> Self {
        self.organization_id = organization_id;
        self
    }

    pub fn project_id(mut self, project_id: Option<Uuid>) -> Self {
        self.project_id = project_id;
        self
    }

    pub fn permission(mut self, permission: Option<String>) -> Self {
        self.permission = permission;
        self
    }

    pub fn search_query(mut self, search_query: Option<String>) -> Self {
        self.search_query = search_query;
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn build(self) -> PermissionQuery {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        PermissionQuery {
            organization_id: self.organization_id,
            project_id: self.project_id,
            permission: self.permission,
            search_query: self.search_query,
            page,
            page_size,
        }
    }
}
