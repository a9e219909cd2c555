//! Create `site_content` table.
//! One row per `block_key`; `content` is a free-form JSON object.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteContent::Table)
                    .if_not_exists()
                    .col(uuid(SiteContent::Id).primary_key())
                    .col(string_len(SiteContent::BlockKey, 64).unique_key().not_null())
                    .col(json_binary(SiteContent::Content).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SiteContent::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum SiteContent {
    Table,
    Id,
    BlockKey,
    Content,
}
