pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20261016_000001_url_mappings;
mod m20261016_000002_sequence_counters;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_url_mappings::Migration),
            Box::new(m20261016_000002_sequence_counters::Migration),
        ]
    }
}
