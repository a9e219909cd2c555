//! Typed views over the loosely typed site-content payloads.
//!
//! Each view reads the fields it knows and falls back to built-in copy for
//! anything missing, including a block that does not exist at all.

use serde_json::Value;

use models::site_content::{self, keys};

fn field(content: Option<&Value>, name: &str, default: &str) -> String {
    content
        .and_then(|c| c.get(name))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

/// Title, small subtitle badge and lead paragraph of a page section.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

impl HeaderContent {
    /// Built-in copy for one of the header-shaped keys.
    pub fn defaults(block_key: &str) -> (&'static str, &'static str, &'static str) {
        match block_key {
            keys::HERO => (
                "Чистота и свежесть вашего дома",
                "Профессиональный клининг в Донецке",
                "Доверьте уборку профессионалам. Мы используем безопасные технологии и современное оборудование для идеальной чистоты вашего пространства.",
            ),
            keys::SERVICES_HEADER => (
                "Полный спектр клининговых услуг",
                "Наши услуги",
                "Мы предлагаем широкий выбор услуг по уборке для жилых и коммерческих помещений",
            ),
            keys::WHY_US_HEADER => (
                "Почему выбирают нас",
                "Преимущества",
                "Мы заботимся о вашем комфорте и гарантируем качество",
            ),
            keys::CONTACTS_HEADER => (
                "Свяжитесь с нами",
                "Контакты",
                "Оставьте заявку или позвоните нам, мы ответим на все вопросы и поможем выбрать подходящую услугу",
            ),
            _ => ("", "", ""),
        }
    }

    pub fn from_block(block_key: &str, block: Option<&site_content::Model>) -> Self {
        let (title, subtitle, description) = Self::defaults(block_key);
        let content = block.map(|b| &b.content);
        Self {
            title: field(content, "title", title),
            subtitle: field(content, "subtitle", subtitle),
            description: field(content, "description", description),
        }
    }
}

/// Numbers shown in the hero badges.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsContent {
    pub years: String,
    pub clients: String,
    pub cleanings: String,
}

impl StatsContent {
    pub fn from_block(block: Option<&site_content::Model>) -> Self {
        let content = block.map(|b| &b.content);
        Self {
            years: field(content, "years", "12+"),
            clients: field(content, "clients", "1000+"),
            cleanings: field(content, "cleanings", "2000+"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FooterContent {
    pub description: String,
}

impl FooterContent {
    pub fn from_block(block: Option<&site_content::Model>) -> Self {
        Self {
            description: field(
                block.map(|b| &b.content),
                "description",
                "Профессиональный клининг для вашего дома и офиса. Работаем в Донецке и ДНР.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn block(key: &str, content: Value) -> site_content::Model {
        site_content::Model { id: Uuid::new_v4(), block_key: key.into(), content }
    }

    #[test]
    fn missing_block_uses_defaults() {
        let s = StatsContent::from_block(None);
        assert_eq!((s.years.as_str(), s.clients.as_str(), s.cleanings.as_str()), ("12+", "1000+", "2000+"));
        let h = HeaderContent::from_block(keys::SERVICES_HEADER, None);
        assert_eq!(h.subtitle, "Наши услуги");
    }

    #[test]
    fn present_fields_override_and_missing_fields_fall_back() {
        let b = block(keys::HERO, json!({"title": "Блеск", "subtitle": 42}));
        let h = HeaderContent::from_block(keys::HERO, Some(&b));
        assert_eq!(h.title, "Блеск");
        // non-string values are treated as absent
        assert_eq!(h.subtitle, "Профессиональный клининг в Донецке");
        assert!(h.description.starts_with("Доверьте уборку"));
    }
}
