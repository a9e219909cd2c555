use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Loosely typed display copy keyed by `block_key` (`hero`, `footer`, ...).
///
/// The payload shape is not validated here; consumers read the fields they
/// know about and substitute defaults for anything missing.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_content")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub block_key: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub content: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Well-known block keys read by the public pages.
pub mod keys {
    pub const HERO: &str = "hero";
    pub const STATS: &str = "stats";
    pub const SERVICES_HEADER: &str = "services_header";
    pub const WHY_US_HEADER: &str = "why_us_header";
    pub const CONTACTS_HEADER: &str = "contacts_header";
    pub const FOOTER: &str = "footer";

    pub const ALL: [&str; 6] = [HERO, STATS, SERVICES_HEADER, WHY_US_HEADER, CONTACTS_HEADER, FOOTER];
}
