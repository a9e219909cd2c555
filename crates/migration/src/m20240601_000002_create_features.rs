//! Create `features` table ("why us" items).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Features::Table)
                    .if_not_exists()
                    .col(uuid(Features::Id).primary_key())
                    .col(string_len(Features::Title, 256).not_null())
                    .col(text(Features::Description).not_null())
                    .col(string_len(Features::Icon, 64).not_null())
                    .col(integer(Features::SortOrder).not_null().default(0))
                    .col(boolean(Features::IsActive).not_null().default(true))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Features::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Features {
    Table,
    Id,
    Title,
    Description,
    Icon,
    SortOrder,
    IsActive,
}
