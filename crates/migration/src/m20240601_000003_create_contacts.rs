//! Create `contacts` table.
//! `contact_type` is one of phone/email/address/hours; `href` is an optional link target.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(uuid(Contacts::Id).primary_key())
                    .col(string_len(Contacts::ContactType, 16).not_null())
                    .col(string_len(Contacts::Label, 128).not_null())
                    .col(string_len(Contacts::Value, 256).not_null())
                    .col(string_len_null(Contacts::Href, 512))
                    .col(string_len(Contacts::Icon, 64).not_null())
                    .col(integer(Contacts::SortOrder).not_null().default(0))
                    .col(boolean(Contacts::IsActive).not_null().default(true))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Contacts::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Contacts {
    Table,
    Id,
    ContactType,
    Label,
    Value,
    Href,
    Icon,
    SortOrder,
    IsActive,
}
