use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::patch::double_option;

/// A way to reach the business: phone line, e-mail, address or hours.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contact_type: ContactKind,
    pub label: String,
    pub value: String,
    /// Link target such as `tel:+79495015751` or `mailto:...`.
    pub href: Option<String>,
    pub icon: String,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    #[default]
    #[sea_orm(string_value = "phone")]
    Phone,
    #[sea_orm(string_value = "email")]
    Email,
    #[sea_orm(string_value = "address")]
    Address,
    #[sea_orm(string_value = "hours")]
    Hours,
}

impl ContactKind {
    pub const ALL: [ContactKind; 4] = [ContactKind::Phone, ContactKind::Email, ContactKind::Address, ContactKind::Hours];

    pub fn as_str(self) -> &'static str {
        match self {
            ContactKind::Phone => "phone",
            ContactKind::Email => "email",
            ContactKind::Address => "address",
            ContactKind::Hours => "hours",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContactKind::Phone => "Телефон",
            ContactKind::Email => "Email",
            ContactKind::Address => "Адрес",
            ContactKind::Hours => "Режим работы",
        }
    }
}

impl FromStr for ContactKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "phone" => Ok(ContactKind::Phone),
            "email" => Ok(ContactKind::Email),
            "address" => Ok(ContactKind::Address),
            "hours" => Ok(ContactKind::Hours),
            other => Err(ModelError::Validation(format!("unknown contact kind: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactDraft {
    #[serde(default)]
    pub contact_type: ContactKind,
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default = "default_contact_icon")]
    pub icon: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_contact_icon() -> String { "Phone".into() }
fn default_active() -> bool { true }

impl ContactDraft {
    pub fn with_defaults(sort_order: i32) -> Self {
        Self {
            contact_type: ContactKind::Phone,
            label: String::new(),
            value: String::new(),
            href: Some(String::new()),
            icon: default_contact_icon(),
            sort_order,
            is_active: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<ContactKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub href: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_known_values_only() {
        assert_eq!("email".parse::<ContactKind>().unwrap(), ContactKind::Email);
        assert!("fax".parse::<ContactKind>().is_err());
    }

    #[test]
    fn draft_deserializes_with_defaults() {
        let d: ContactDraft = serde_json::from_str(r#"{"label":"Email","value":"info@cleanhousednr.ru"}"#).unwrap();
        assert_eq!(d.contact_type, ContactKind::Phone);
        assert_eq!(d.icon, "Phone");
        assert!(d.is_active);
        assert_eq!(d.href, None);
    }
}
