// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// マイグレーションモジュール
mod m20260820_000001_create_users_table;
mod m20260820_000002_create_projects_table;
mod m20260820_000003_create_user_permissions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20260820_000001_create_users_table::Migration),
            Box::new(m20260820_000002_create_projects_table::Migration),
            // 2. 依存テーブル作成（users / projects に依存）
            Box::new(m20260820_000003_create_user_permissions_table::Migration),
        ]
    }
}
