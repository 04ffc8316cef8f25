//! Counter rows backing the database sequence
//!
//! `next_value` is the offset the next caller receives. It only ever grows,
//! so offsets are never reissued.

use sea_orm::entity::prelude::*;

/// 分配器使用的计数器行
pub const ALLOCATOR_COUNTER: &str = "allocator";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "sequence_counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub next_value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
