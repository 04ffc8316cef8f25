use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, ExprTrait, QueryFilter, TransactionTrait,
    sea_query::Expr,
};
use tracing::trace;

use super::SequenceGenerator;
use crate::errors::{Result, ShortcodeError};
use migration::entities::sequence_counter::{self, ALLOCATOR_COUNTER};

/// 数据库序列
///
/// 在事务内对计数器行原地加一并读回，行锁保证多进程间不会拿到同一个值。
/// 发放值为 `base + offset`，第一次调用对应 `base`。
#[derive(Clone)]
pub struct DatabaseSequence {
    db: DatabaseConnection,
    base: u64,
}

impl DatabaseSequence {
    pub fn new(db: DatabaseConnection, base: u64) -> Self {
        Self { db, base }
    }

    /// 递增计数器，返回本次占用的偏移量
    async fn claim_offset(&self) -> std::result::Result<i64, sea_orm::DbErr> {
        let txn = self.db.begin().await?;

        let updated = sequence_counter::Entity::update_many()
            .col_expr(
                sequence_counter::Column::NextValue,
                Expr::col(sequence_counter::Column::NextValue).add(1),
            )
            .filter(sequence_counter::Column::Name.eq(ALLOCATOR_COUNTER))
            .exec(&txn)
            .await?;
        if updated.rows_affected != 1 {
            return Err(sea_orm::DbErr::RecordNotFound(format!(
                "sequence counter '{}'",
                ALLOCATOR_COUNTER
            )));
        }

        let row = sequence_counter::Entity::find_by_id(ALLOCATOR_COUNTER)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                sea_orm::DbErr::RecordNotFound(format!("sequence counter '{}'", ALLOCATOR_COUNTER))
            })?;

        txn.commit().await?;
        Ok(row.next_value - 1)
    }
}

#[async_trait]
impl SequenceGenerator for DatabaseSequence {
    async fn next_id(&self) -> Result<u64> {
        let offset = self.claim_offset().await.map_err(|e| {
            ShortcodeError::store_unavailable(format!("Failed to advance sequence counter: {}", e))
        })?;

        let offset = u64::try_from(offset).map_err(|_| {
            ShortcodeError::store_unavailable(format!("Sequence counter offset {} is negative", offset))
        })?;
        trace!("Claimed sequence offset {}", offset);

        self.base.checked_add(offset).ok_or_else(|| {
            ShortcodeError::allocation_exhausted(format!("Sequence exhausted at offset {}", offset))
        })
    }
}
