//! Admin console pages: one tab per collection plus the site-content editor.

use maud::{html, Markup, DOCTYPE};
use models::contact::{self, ContactDraft, ContactKind, ContactPatch};
use models::feature::{self, FeatureDraft, FeaturePatch};
use models::service::{Model as Service, ServiceCategory, ServiceDraft, ServicePatch};
use models::site_content::{self, keys};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::icons;
use super::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Content,
    Services,
    Features,
    Contacts,
}

impl AdminTab {
    pub const ALL: [AdminTab; 4] = [AdminTab::Content, AdminTab::Services, AdminTab::Features, AdminTab::Contacts];

    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("services") => AdminTab::Services,
            Some("features") => AdminTab::Features,
            Some("contacts") => AdminTab::Contacts,
            _ => AdminTab::Content,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            AdminTab::Content => "content",
            AdminTab::Services => "services",
            AdminTab::Features => "features",
            AdminTab::Contacts => "contacts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdminTab::Content => "Тексты",
            AdminTab::Services => "Услуги",
            AdminTab::Features => "Преимущества",
            AdminTab::Contacts => "Контакты",
        }
    }

    pub fn href(self) -> String { format!("/admin?tab={}", self.key()) }
}

pub fn layout(tab: AdminTab, notice: Option<Notice>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ru" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="robots" content="noindex, nofollow";
                title { "Админ-панель | Clean House" }
                link rel="stylesheet" href="/assets/site.css";
            }
            body.admin {
                header.admin-header {
                    a href="/" { "← На сайт" }
                    h1 { "Админ-панель" }
                }
                nav.tabs {
                    @for t in AdminTab::ALL {
                        a.tab.active[t == tab] href=(t.href()) { (t.label()) }
                    }
                }
                @if let Some(n) = notice {
                    (n.render())
                }
                main { (body) }
            }
        }
    }
}

fn icon_select(current: &str) -> Markup {
    let known = icons::PICKER.iter().any(|(k, _)| *k == current);
    html! {
        select name="icon" {
            @if !known {
                option value=(current) selected { (current) }
            }
            @for (key, label) in icons::PICKER {
                option value=(key) selected[*key == current] { (icons::resolve(key).glyph) " " (label) }
            }
        }
    }
}

fn active_checkbox(active: bool) -> Markup {
    html! {
        label.checkbox {
            input type="checkbox" name="is_active" value="on" checked[active];
            " Активно"
        }
    }
}

fn editor_actions(tab: AdminTab) -> Markup {
    html! {
        div.actions {
            button type="submit" { "Сохранить" }
            a.button.outline href=(tab.href()) { "Отмена" }
        }
    }
}

fn row_actions(collection: &str, id: Uuid) -> Markup {
    html! {
        div.row-actions {
            a href={ "/admin/" (collection) "/" (id.to_string()) "/edit" } title="Редактировать" { "✎" }
            a href={ "/admin/" (collection) "/" (id.to_string()) "/delete" } title="Удалить" { "🗑" }
        }
    }
}

fn checkbox_on(raw: &Option<String>) -> bool {
    matches!(raw.as_deref(), Some("on" | "true" | "1"))
}

fn non_empty(raw: String) -> Option<String> {
    if raw.trim().is_empty() { None } else { Some(raw) }
}

// ---------------------------------------------------------------- services

/// Editor values for a service. Empty optional fields are stored as null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: Option<String>,
    #[serde(default)]
    pub category: ServiceCategory,
    #[serde(default)]
    pub image_url: String,
}

impl ServiceForm {
    pub fn from_model(s: &Service) -> Self {
        Self {
            title: s.title.clone(),
            description: s.description.clone(),
            price: s.price.clone(),
            icon: s.icon.clone(),
            full_description: s.full_description.clone().unwrap_or_default(),
            sort_order: s.sort_order,
            is_active: s.is_active.then(|| "on".to_string()),
            category: s.category,
            image_url: s.image_url.clone().unwrap_or_default(),
        }
    }

    pub fn from_draft(d: &ServiceDraft) -> Self {
        Self {
            title: d.title.clone(),
            description: d.description.clone(),
            price: d.price.clone(),
            icon: d.icon.clone(),
            full_description: d.full_description.clone().unwrap_or_default(),
            sort_order: d.sort_order,
            is_active: d.is_active.then(|| "on".to_string()),
            category: d.category,
            image_url: d.image_url.clone().unwrap_or_default(),
        }
    }

    pub fn active(&self) -> bool { checkbox_on(&self.is_active) }

    pub fn into_draft(self) -> ServiceDraft {
        let is_active = self.active();
        ServiceDraft {
            title: self.title,
            description: self.description,
            price: self.price,
            icon: if self.icon.is_empty() { "Home".into() } else { self.icon },
            full_description: non_empty(self.full_description),
            sort_order: self.sort_order,
            is_active,
            category: self.category,
            image_url: non_empty(self.image_url),
        }
    }

    /// The editor submits every field, so the patch is complete.
    pub fn into_patch(self) -> ServicePatch {
        let d = self.into_draft();
        ServicePatch {
            title: Some(d.title),
            description: Some(d.description),
            price: Some(d.price),
            icon: Some(d.icon),
            full_description: Some(d.full_description),
            sort_order: Some(d.sort_order),
            is_active: Some(d.is_active),
            category: Some(d.category),
            image_url: Some(d.image_url),
        }
    }
}

pub fn services_tab(list: &[Service]) -> Markup {
    html! {
        section.admin-list {
            div.list-header {
                h2 { "Услуги" }
                a.button href="/admin/services/new" { "+ Добавить услугу" }
            }
            @for s in list {
                article.admin-row.inactive[!s.is_active] {
                    span.icon { (icons::render(icons::resolve(&s.icon))) }
                    div.summary {
                        h3 { (s.title) }
                        p.muted { (s.description) }
                        span.price { (s.price) }
                        span.tag { (s.category.label()) }
                        @if !s.is_active { span.tag { "Скрыто" } }
                    }
                    (row_actions("services", s.id))
                }
            }
        }
    }
}

pub fn service_editor(id: Option<Uuid>, form: &ServiceForm) -> Markup {
    let action = match id {
        Some(id) => format!("/admin/services/{id}"),
        None => "/admin/services".to_string(),
    };
    html! {
        section.editor {
            h2 { @if id.is_some() { "Редактирование услуги" } @else { "Новая услуга" } }
            form method="post" action=(action) {
                label { "Название" input type="text" name="title" value=(form.title); }
                label { "Цена" input type="text" name="price" value=(form.price) placeholder="от 2 500 ₽"; }
                label { "Краткое описание" textarea name="description" rows="2" { (form.description) } }
                label { "Полное описание" textarea name="full_description" rows="6" { (form.full_description) } }
                label { "Категория"
                    select name="category" {
                        @for c in ServiceCategory::ORDER {
                            option value=(c.as_str()) selected[c == form.category] { (c.label()) }
                        }
                    }
                }
                label { "Иконка" (icon_select(&form.icon)) }
                label { "Порядок" input type="number" name="sort_order" value=(form.sort_order); }
                label { "URL изображения" input type="text" name="image_url" value=(form.image_url) placeholder="https://..."; }
                @if !form.image_url.is_empty() {
                    img.preview src=(form.image_url) alt="";
                }
                (active_checkbox(form.active()))
                (editor_actions(AdminTab::Services))
            }
            @match id {
                Some(id) => {
                    form.upload method="post" action={ "/admin/services/" (id.to_string()) "/image" } enctype="multipart/form-data" {
                        label { "Загрузить изображение"
                            input type="file" name="file" accept="image/png,image/jpeg,image/svg+xml,image/webp";
                        }
                        p.muted { "PNG, JPG, SVG или WebP, не более 5 МБ" }
                        button type="submit" { "Загрузить" }
                    }
                }
                None => {
                    p.muted { "Сохраните услугу, чтобы загрузить изображение." }
                }
            }
        }
    }
}

// ---------------------------------------------------------------- features

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeatureForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl FeatureForm {
    pub fn from_model(f: &feature::Model) -> Self {
        Self {
            title: f.title.clone(),
            description: f.description.clone(),
            icon: f.icon.clone(),
            sort_order: f.sort_order,
            is_active: f.is_active.then(|| "on".to_string()),
        }
    }

    pub fn from_draft(d: &FeatureDraft) -> Self {
        Self {
            title: d.title.clone(),
            description: d.description.clone(),
            icon: d.icon.clone(),
            sort_order: d.sort_order,
            is_active: d.is_active.then(|| "on".to_string()),
        }
    }

    pub fn active(&self) -> bool { checkbox_on(&self.is_active) }

    pub fn into_draft(self) -> FeatureDraft {
        let is_active = self.active();
        FeatureDraft {
            title: self.title,
            description: self.description,
            icon: if self.icon.is_empty() { "Shield".into() } else { self.icon },
            sort_order: self.sort_order,
            is_active,
        }
    }

    pub fn into_patch(self) -> FeaturePatch {
        let d = self.into_draft();
        FeaturePatch {
            title: Some(d.title),
            description: Some(d.description),
            icon: Some(d.icon),
            sort_order: Some(d.sort_order),
            is_active: Some(d.is_active),
        }
    }
}

pub fn features_tab(list: &[feature::Model]) -> Markup {
    html! {
        section.admin-list {
            div.list-header {
                h2 { "Преимущества" }
                a.button href="/admin/features/new" { "+ Добавить преимущество" }
            }
            @for f in list {
                article.admin-row.inactive[!f.is_active] {
                    span.icon { (icons::render(icons::resolve_or(&f.icon, "Shield"))) }
                    div.summary {
                        h3 { (f.title) }
                        p.muted { (f.description) }
                    }
                    (row_actions("features", f.id))
                }
            }
        }
    }
}

pub fn feature_editor(id: Option<Uuid>, form: &FeatureForm) -> Markup {
    let action = match id {
        Some(id) => format!("/admin/features/{id}"),
        None => "/admin/features".to_string(),
    };
    html! {
        section.editor {
            h2 { @if id.is_some() { "Редактирование преимущества" } @else { "Новое преимущество" } }
            form method="post" action=(action) {
                label { "Название" input type="text" name="title" value=(form.title); }
                label { "Описание" textarea name="description" rows="3" { (form.description) } }
                label { "Иконка" (icon_select(&form.icon)) }
                label { "Порядок" input type="number" name="sort_order" value=(form.sort_order); }
                (active_checkbox(form.active()))
                (editor_actions(AdminTab::Features))
            }
        }
    }
}

// ---------------------------------------------------------------- contacts

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub contact_type: ContactKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl ContactForm {
    pub fn from_model(c: &contact::Model) -> Self {
        Self {
            contact_type: c.contact_type,
            label: c.label.clone(),
            value: c.value.clone(),
            href: c.href.clone().unwrap_or_default(),
            icon: c.icon.clone(),
            sort_order: c.sort_order,
            is_active: c.is_active.then(|| "on".to_string()),
        }
    }

    pub fn from_draft(d: &ContactDraft) -> Self {
        Self {
            contact_type: d.contact_type,
            label: d.label.clone(),
            value: d.value.clone(),
            href: d.href.clone().unwrap_or_default(),
            icon: d.icon.clone(),
            sort_order: d.sort_order,
            is_active: d.is_active.then(|| "on".to_string()),
        }
    }

    pub fn active(&self) -> bool { checkbox_on(&self.is_active) }

    pub fn into_draft(self) -> ContactDraft {
        let is_active = self.active();
        ContactDraft {
            contact_type: self.contact_type,
            label: self.label,
            value: self.value,
            href: non_empty(self.href),
            icon: if self.icon.is_empty() { "Phone".into() } else { self.icon },
            sort_order: self.sort_order,
            is_active,
        }
    }

    pub fn into_patch(self) -> ContactPatch {
        let d = self.into_draft();
        ContactPatch {
            contact_type: Some(d.contact_type),
            label: Some(d.label),
            value: Some(d.value),
            href: Some(d.href),
            icon: Some(d.icon),
            sort_order: Some(d.sort_order),
            is_active: Some(d.is_active),
        }
    }
}

pub fn contacts_tab(list: &[contact::Model]) -> Markup {
    html! {
        section.admin-list {
            div.list-header {
                h2 { "Контакты" }
                a.button href="/admin/contacts/new" { "+ Добавить контакт" }
            }
            @for c in list {
                article.admin-row.inactive[!c.is_active] {
                    span.icon { (icons::render(icons::resolve_or(&c.icon, "Phone"))) }
                    div.summary {
                        h3 { (c.label) }
                        p { (c.value) }
                        span.tag { (c.contact_type.label()) }
                    }
                    (row_actions("contacts", c.id))
                }
            }
        }
    }
}

pub fn contact_editor(id: Option<Uuid>, form: &ContactForm) -> Markup {
    let action = match id {
        Some(id) => format!("/admin/contacts/{id}"),
        None => "/admin/contacts".to_string(),
    };
    html! {
        section.editor {
            h2 { @if id.is_some() { "Редактирование контакта" } @else { "Новый контакт" } }
            form method="post" action=(action) {
                label { "Название" input type="text" name="label" value=(form.label); }
                label { "Значение" input type="text" name="value" value=(form.value); }
                label { "Ссылка (href)" input type="text" name="href" value=(form.href) placeholder="tel:+7... или mailto:..."; }
                label { "Тип"
                    select name="contact_type" {
                        @for k in ContactKind::ALL {
                            option value=(k.as_str()) selected[k == form.contact_type] { (k.label()) }
                        }
                    }
                }
                label { "Иконка" (icon_select(&form.icon)) }
                label { "Порядок" input type="number" name="sort_order" value=(form.sort_order); }
                (active_checkbox(form.active()))
                (editor_actions(AdminTab::Contacts))
            }
        }
    }
}

// ---------------------------------------------------------------- delete

/// Explicit confirmation step in front of every delete.
pub fn confirm_delete(question: &str, title: &str, action: &str, back: &str) -> Markup {
    html! {
        section.confirm {
            h2 { (question) }
            p { strong { (title) } }
            form method="post" action=(action) {
                button.danger type="submit" { "Удалить" }
                a.button.outline href=(back) { "Отмена" }
            }
        }
    }
}

// ---------------------------------------------------------------- site content

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldInput {
    Text,
    Area,
}

struct BlockSpec {
    key: &'static str,
    title: &'static str,
    fields: &'static [(&'static str, &'static str, FieldInput)],
}

const HEADER_FIELDS: &[(&str, &str, FieldInput)] = &[
    ("title", "Заголовок", FieldInput::Text),
    ("subtitle", "Подзаголовок", FieldInput::Text),
    ("description", "Описание", FieldInput::Area),
];

const BLOCKS: &[BlockSpec] = &[
    BlockSpec { key: keys::HERO, title: "Главный экран", fields: HEADER_FIELDS },
    BlockSpec {
        key: keys::STATS,
        title: "Статистика",
        fields: &[
            ("years", "Лет опыта", FieldInput::Text),
            ("clients", "Клиентов", FieldInput::Text),
            ("cleanings", "Уборок", FieldInput::Text),
        ],
    },
    BlockSpec { key: keys::SERVICES_HEADER, title: "Раздел «Услуги»", fields: HEADER_FIELDS },
    BlockSpec { key: keys::WHY_US_HEADER, title: "Раздел «Почему мы»", fields: HEADER_FIELDS },
    BlockSpec { key: keys::CONTACTS_HEADER, title: "Раздел «Контакты»", fields: HEADER_FIELDS },
    BlockSpec {
        key: keys::FOOTER,
        title: "Подвал сайта",
        fields: &[("description", "Описание компании", FieldInput::Area)],
    },
];

/// Field names the content editor offers for `key`; `None` for unknown keys.
pub fn block_fields(key: &str) -> Option<Vec<&'static str>> {
    BLOCKS.iter().find(|b| b.key == key).map(|b| b.fields.iter().map(|(name, _, _)| *name).collect())
}

fn block_value<'a>(blocks: &'a [site_content::Model], key: &str, field: &str) -> &'a str {
    blocks
        .iter()
        .find(|b| b.block_key == key)
        .and_then(|b| b.content.get(field))
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Key-value editor: one form per known block, every field submitted together.
pub fn content_tab(blocks: &[site_content::Model]) -> Markup {
    html! {
        section.content-editor {
            @for spec in BLOCKS {
                form.block method="post" action={ "/admin/content/" (spec.key) } id=(spec.key) {
                    h3 { (spec.title) }
                    @for (name, label, input) in spec.fields {
                        label {
                            (label)
                            @match input {
                                FieldInput::Text => {
                                    input type="text" name=(name) value=(block_value(blocks, spec.key, name));
                                }
                                FieldInput::Area => {
                                    textarea name=(name) rows="3" { (block_value(blocks, spec.key, name)) }
                                }
                            }
                        }
                    }
                    button type="submit" { "Сохранить" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchecked_box_means_inactive() {
        let form = ServiceForm { title: "Окна".into(), ..Default::default() };
        let draft = form.into_draft();
        assert!(!draft.is_active);
        assert_eq!(draft.icon, "Home");
        assert_eq!(draft.image_url, None);
    }

    #[test]
    fn editor_round_trips_model_values() {
        let draft = ServiceDraft::with_defaults(5);
        let form = ServiceForm::from_draft(&draft);
        assert!(form.active());
        assert_eq!(form.into_draft(), draft);
    }

    #[test]
    fn contact_patch_clears_empty_href() {
        let form = ContactForm { label: "Почта".into(), value: "a@b.ru".into(), ..Default::default() };
        let patch = form.into_patch();
        assert_eq!(patch.href, Some(None));
        assert_eq!(patch.icon.as_deref(), Some("Phone"));
    }

    #[test]
    fn tab_defaults_to_content() {
        assert_eq!(AdminTab::from_query(None), AdminTab::Content);
        assert_eq!(AdminTab::from_query(Some("contacts")), AdminTab::Contacts);
        assert_eq!(AdminTab::from_query(Some("nope")), AdminTab::Content);
    }

    #[test]
    fn editor_marks_current_icon_selected() {
        let html = service_editor(None, &ServiceForm::from_draft(&ServiceDraft::with_defaults(1))).into_string();
        assert!(html.contains(r#"<option value="Home" selected>"#));
        assert!(html.contains(r#"action="/admin/services""#));
    }

    #[test]
    fn content_editor_prefills_stored_values() {
        let block = site_content::Model {
            id: Uuid::new_v4(),
            block_key: keys::FOOTER.into(),
            content: serde_json::json!({"description": "Работаем без выходных"}),
        };
        let html = content_tab(&[block]).into_string();
        assert!(html.contains("Работаем без выходных"));
        assert_eq!(block_fields("stats"), Some(vec!["years", "clients", "cleanings"]));
        assert_eq!(block_fields("unknown"), None);
    }
}
