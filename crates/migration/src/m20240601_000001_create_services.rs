//! Create `services` table.
//! Priced services grouped by category; `is_active` hides a row from public pages.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(uuid(Services::Id).primary_key())
                    .col(string_len(Services::Title, 256).not_null())
                    .col(text(Services::Description).not_null())
                    .col(string_len(Services::Price, 128).not_null())
                    .col(string_len(Services::Icon, 64).not_null())
                    .col(text_null(Services::FullDescription))
                    .col(integer(Services::SortOrder).not_null().default(0))
                    .col(boolean(Services::IsActive).not_null().default(true))
                    .col(string_len(Services::Category, 32).not_null().default("cleaning"))
                    .col(text_null(Services::ImageUrl))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Services::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Services {
    Table,
    Id,
    Title,
    Description,
    Price,
    Icon,
    FullDescription,
    SortOrder,
    IsActive,
    Category,
    ImageUrl,
}
