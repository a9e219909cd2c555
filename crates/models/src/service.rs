use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::patch::double_option;

/// A priced cleaning service shown on the home page and the services page.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Display string such as "от 2 500 ₽"; never parsed as a number here.
    pub price: String,
    pub icon: String,
    pub full_description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    /// Rows written before categories existed read as `cleaning`.
    #[serde(default)]
    pub category: ServiceCategory,
    pub image_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Grouping used by the services page. Stored as its snake_case name;
/// unknown, empty or null names decode as `Cleaning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Default)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    #[default]
    #[sea_orm(string_value = "cleaning")]
    Cleaning,
    #[sea_orm(string_value = "dry_cleaning")]
    DryCleaning,
    #[sea_orm(string_value = "windows")]
    Windows,
}

impl ServiceCategory {
    /// Display order of category groups on the services page.
    pub const ORDER: [ServiceCategory; 3] =
        [ServiceCategory::Cleaning, ServiceCategory::DryCleaning, ServiceCategory::Windows];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceCategory::Cleaning => "cleaning",
            ServiceCategory::DryCleaning => "dry_cleaning",
            ServiceCategory::Windows => "windows",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ServiceCategory::Cleaning => "Услуги уборки",
            ServiceCategory::DryCleaning => "Услуги химчистки",
            ServiceCategory::Windows => "Услуги мойки окон",
        }
    }
}

impl FromStr for ServiceCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cleaning" => Ok(ServiceCategory::Cleaning),
            "dry_cleaning" => Ok(ServiceCategory::DryCleaning),
            "windows" => Ok(ServiceCategory::Windows),
            other => Err(ModelError::Validation(format!("unknown service category: {other}"))),
        }
    }
}

impl<'de> Deserialize<'de> for ServiceCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.and_then(|n| n.parse().ok()).unwrap_or_default())
    }
}

/// Insert payload: every column except the generated identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default = "default_service_icon")]
    pub icon: String,
    #[serde(default)]
    pub full_description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub category: ServiceCategory,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn default_service_icon() -> String { "Home".into() }
fn default_active() -> bool { true }

impl ServiceDraft {
    /// Blank editor contents for the "add new" form.
    pub fn with_defaults(sort_order: i32) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price: String::new(),
            icon: default_service_icon(),
            full_description: None,
            sort_order,
            is_active: true,
            category: ServiceCategory::Cleaning,
            image_url: None,
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub full_description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ServiceCategory>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
}
