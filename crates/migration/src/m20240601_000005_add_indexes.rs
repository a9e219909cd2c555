use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_services::Services;
use crate::m20240601_000002_create_features::Features;
use crate::m20240601_000003_create_contacts::Contacts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Public reads filter on is_active and order by sort_order
        manager
            .create_index(
                Index::create()
                    .name("idx_services_active_sort")
                    .table(Services::Table)
                    .col(Services::IsActive)
                    .col(Services::SortOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_features_active_sort")
                    .table(Features::Table)
                    .col(Features::IsActive)
                    .col(Features::SortOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contacts_active_sort")
                    .table(Contacts::Table)
                    .col(Contacts::IsActive)
                    .col(Contacts::SortOrder)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_services_active_sort", Services::Table.into_iden()),
            ("idx_features_active_sort", Features::Table.into_iden()),
            ("idx_contacts_active_sort", Contacts::Table.into_iden()),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}
