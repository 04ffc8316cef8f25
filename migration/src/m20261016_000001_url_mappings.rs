use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 url_mappings 表，short_code 作为主键保证唯一
        manager
            .create_table(
                Table::create()
                    .table(UrlMapping::Table)
                    .if_not_exists()
                    .col(short_code_column(manager.get_database_backend()))
                    .col(ColumnDef::new(UrlMapping::LongUrl).text().not_null())
                    .col(
                        ColumnDef::new(UrlMapping::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_url_mappings_created_at")
                    .table(UrlMapping::Table)
                    .col(UrlMapping::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_url_mappings_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UrlMapping::Table).to_owned())
            .await
    }
}

/// short_code 列定义
///
/// MySQL 默认排序规则不区分大小写，短码必须按字节比较。
fn short_code_column(backend: DatabaseBackend) -> ColumnDef {
    let mut column = ColumnDef::new(UrlMapping::ShortCode);
    column.string_len(16).not_null().primary_key();
    if backend == DatabaseBackend::MySql {
        column.extra("COLLATE utf8mb4_bin");
    }
    column
}

#[derive(DeriveIden)]
enum UrlMapping {
    #[sea_orm(iden = "url_mappings")]
    Table,
    ShortCode,
    LongUrl,
    CreatedAt,
}
