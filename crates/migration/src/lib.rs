//! Migrator registering the content tables, then indexes, then seed rows.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_services;
mod m20240601_000002_create_features;
mod m20240601_000003_create_contacts;
mod m20240601_000004_create_site_content;
mod m20240601_000005_add_indexes;
mod m20240601_000006_seed_site_content;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_services::Migration),
            Box::new(m20240601_000002_create_features::Migration),
            Box::new(m20240601_000003_create_contacts::Migration),
            Box::new(m20240601_000004_create_site_content::Migration),
            Box::new(m20240601_000005_add_indexes::Migration),
            Box::new(m20240601_000006_seed_site_content::Migration),
        ]
    }
}
