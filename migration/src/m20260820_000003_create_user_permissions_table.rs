use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserPermissions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserPermissions::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserPermissions::ProjectId).uuid())
                    .col(
                        ColumnDef::new(UserPermissions::Permission)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserPermissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Add foreign key constraints
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_user_permissions_user_id")
                    .from(UserPermissions::Table, UserPermissions::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_user_permissions_project_id")
                    .from(UserPermissions::Table, UserPermissions::ProjectId)
                    .to(Projects::Table, Projects::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // 同一ユーザー・同一スコープへの重複付与を禁止する
        manager
            .create_index(
                Index::create()
                    .name("idx_user_permissions_unique_assignment")
                    .table(UserPermissions::Table)
                    .col(UserPermissions::UserId)
                    .col(UserPermissions::ProjectId)
                    .col(UserPermissions::Permission)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // グループ化カウントクエリ用のインデックス
        manager
            .create_index(
                Index::create()
                    .name("idx_user_permissions_project_permission")
                    .table(UserPermissions::Table)
                    .col(UserPermissions::ProjectId)
                    .col(UserPermissions::Permission)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserPermissions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserPermissions {
    Table,
    Id,
    UserId,
    ProjectId,
    Permission,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
}
