use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 每个序列一行，原地递增
        manager
            .create_table(
                Table::create()
                    .table(SequenceCounter::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SequenceCounter::Name)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SequenceCounter::NextValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "INSERT INTO sequence_counters (name, next_value) VALUES ('allocator', 0)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SequenceCounter::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SequenceCounter {
    #[sea_orm(iden = "sequence_counters")]
    Table,
    Name,
    NextValue,
}
