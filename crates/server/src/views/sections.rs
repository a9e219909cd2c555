//! Content render components: pure functions from records to markup.

use maud::{html, Markup};
use models::service::{Model as Service, ServiceCategory};
use models::{contact, feature, site_content::keys};
use service::content::blocks::{FooterContent, HeaderContent, StatsContent};
use service::inline_edit::FieldBinding;

use super::editable::EditCtx;
use super::icons;

/// Values of the contact form, echoed back after a failed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

fn header_field(ctx: &EditCtx<'_>, key: &str, field: &str, value: &str) -> Markup {
    ctx.text(&FieldBinding::content(key, field), value)
}

fn service_field(ctx: &EditCtx<'_>, s: &Service, field: &str, value: &str) -> Markup {
    ctx.text(&FieldBinding::Service { id: s.id, field: field.to_string() }, value)
}

pub fn section_header(ctx: &EditCtx<'_>, key: &str, h: &HeaderContent) -> Markup {
    html! {
        div.section-header {
            span.badge { (header_field(ctx, key, "subtitle", &h.subtitle)) }
            h2 { (header_field(ctx, key, "title", &h.title)) }
            p { (header_field(ctx, key, "description", &h.description)) }
        }
    }
}

pub fn hero(ctx: &EditCtx<'_>, h: &HeaderContent, stats: &StatsContent) -> Markup {
    html! {
        section #hero .hero {
            div.hero-text {
                span.badge { "✨ " (header_field(ctx, keys::HERO, "subtitle", &h.subtitle)) }
                h1 { (header_field(ctx, keys::HERO, "title", &h.title)) }
                p { (header_field(ctx, keys::HERO, "description", &h.description)) }
                ul.hero-points {
                    li { "Экологичные средства" }
                    li { "Опытные специалисты" }
                    li { "Гарантия качества" }
                }
                div.cta {
                    a.button href="#contacts" { "Заказать уборку →" }
                    a.button.outline href="#services" { "Наши услуги" }
                }
            }
            div.hero-image {
                img src="/images/hero-clean-home.jpg" alt="Чистый современный дом";
                div.stat-card {
                    span.stat-value { (header_field(ctx, keys::STATS, "years", &stats.years)) }
                    div { p { "Лет опыта" } p.muted { "в сфере клининга" } }
                }
                div.stat-badge {
                    (header_field(ctx, keys::STATS, "clients", &stats.clients)) " клиентов"
                }
            }
        }
    }
}

pub fn service_card(ctx: &EditCtx<'_>, s: &Service) -> Markup {
    html! {
        article.service-card {
            @if let Some(url) = s.image_url.as_deref().filter(|u| !u.is_empty()) {
                img.service-image src=(url) alt=(s.title) loading="lazy";
            } @else {
                div.service-icon { (icons::render(icons::resolve(&s.icon))) }
            }
            h3 { (service_field(ctx, s, "title", &s.title)) }
            p { (service_field(ctx, s, "description", &s.description)) }
            div.service-footer {
                span.price { (service_field(ctx, s, "price", &s.price)) }
                a href={ "/services/" (s.id.to_string()) } { "Подробнее →" }
            }
        }
    }
}

/// Home page services grid.
pub fn services(ctx: &EditCtx<'_>, header: &HeaderContent, list: &[Service]) -> Markup {
    html! {
        section #services .services {
            (section_header(ctx, keys::SERVICES_HEADER, header))
            div.grid {
                @for s in list { (service_card(ctx, s)) }
            }
            a.button.outline href="/services" { "Все услуги" }
        }
    }
}

/// Active services grouped by category in the fixed category order;
/// empty groups are left out.
pub fn group_by_category(list: &[Service]) -> Vec<(ServiceCategory, Vec<&Service>)> {
    ServiceCategory::ORDER
        .iter()
        .map(|c| (*c, list.iter().filter(|s| s.category == *c).collect::<Vec<_>>()))
        .filter(|(_, group)| !group.is_empty())
        .collect()
}

pub fn services_page(ctx: &EditCtx<'_>, header: &HeaderContent, list: &[Service]) -> Markup {
    html! {
        section.services-page {
            (section_header(ctx, keys::SERVICES_HEADER, header))
            @for (category, group) in group_by_category(list) {
                div.category-group data-category=(category.as_str()) {
                    h2 { (category.label()) }
                    div.grid {
                        @for s in group { (service_card(ctx, s)) }
                    }
                }
            }
            @if list.is_empty() {
                p.muted { "Список услуг скоро появится." }
            }
        }
    }
}

pub fn service_detail(ctx: &EditCtx<'_>, s: &Service) -> Markup {
    let full = s.full_description.as_deref().filter(|d| !d.trim().is_empty());
    html! {
        article.service-detail {
            a.back href="/services" { "← Все услуги" }
            div.service-icon { (icons::render(icons::resolve(&s.icon))) }
            h1 { (service_field(ctx, s, "title", &s.title)) }
            p.lead { (service_field(ctx, s, "description", &s.description)) }
            div.price-box {
                span.muted { "Стоимость" }
                span.price { (service_field(ctx, s, "price", &s.price)) }
            }
            div.full-description {
                (service_field(ctx, s, "full_description", full.unwrap_or(&s.description)))
            }
            @if let Some(url) = s.image_url.as_deref().filter(|u| !u.is_empty()) {
                img.service-image src=(url) alt=(s.title);
            }
            a.button href="/#contacts" { "Заказать услугу" }
        }
    }
}

pub fn service_not_found() -> Markup {
    html! {
        section.not-found {
            h1 { "Услуга не найдена" }
            a.button href="/services" { "Вернуться к услугам" }
        }
    }
}

pub fn why_us(ctx: &EditCtx<'_>, header: &HeaderContent, list: &[feature::Model]) -> Markup {
    html! {
        section #about .why-us {
            (section_header(ctx, keys::WHY_US_HEADER, header))
            div.grid {
                @for f in list {
                    div.feature {
                        div.feature-icon { (icons::render(icons::resolve_or(&f.icon, "Shield"))) }
                        h3 { (ctx.text(&FieldBinding::Feature { id: f.id, field: "title".into() }, &f.title)) }
                        p { (ctx.text(&FieldBinding::Feature { id: f.id, field: "description".into() }, &f.description)) }
                    }
                }
            }
        }
    }
}

fn contact_item(ctx: &EditCtx<'_>, c: &contact::Model) -> Markup {
    let value = ctx.text(&FieldBinding::Contact { id: c.id, field: "value".into() }, &c.value);
    html! {
        li.contact {
            (icons::render(icons::resolve_or(&c.icon, "Phone")))
            div {
                span.label { (ctx.text(&FieldBinding::Contact { id: c.id, field: "label".into() }, &c.label)) }
                @match c.href.as_deref().filter(|h| !h.is_empty() && *h != "#") {
                    Some(href) if !ctx.on => { a href=(href) { (value) } }
                    _ => { span { (value) } }
                }
            }
        }
    }
}

pub fn contacts(ctx: &EditCtx<'_>, header: &HeaderContent, list: &[contact::Model], form: &ContactForm) -> Markup {
    html! {
        section #contacts .contacts {
            (section_header(ctx, keys::CONTACTS_HEADER, header))
            div.contacts-grid {
                form.contact-form method="post" action="/contact" {
                    h3 { "Оставить заявку" }
                    label { "Ваше имя"
                        input type="text" name="name" placeholder="Иван Иванов" required value=(form.name);
                    }
                    label { "Телефон"
                        input type="tel" name="phone" placeholder="+7 (999) 123-45-67" required value=(form.phone);
                    }
                    label { "Сообщение"
                        textarea name="message" rows="4" placeholder="Опишите, какая уборка вам нужна..." { (form.message) }
                    }
                    button type="submit" { "Отправить заявку" }
                }
                ul.contact-list {
                    @for c in list { (contact_item(ctx, c)) }
                }
            }
        }
    }
}

pub fn footer(ctx: &EditCtx<'_>, content: &FooterContent, contacts: &[contact::Model]) -> Markup {
    html! {
        footer.site-footer {
            div {
                span.logo { "Clean House" }
                p { (header_field(ctx, keys::FOOTER, "description", &content.description)) }
            }
            div {
                h4 { "Услуги" }
                ul {
                    li { a href="/#services" { "Уборка квартир" } }
                    li { a href="/#services" { "Уборка офисов" } }
                    li { a href="/#services" { "Химчистка мебели" } }
                    li { a href="/#services" { "Уборка после ремонта" } }
                }
            }
            div {
                h4 { "Контакты" }
                ul {
                    @for c in contacts.iter().filter(|c| c.contact_type != contact::ContactKind::Hours) {
                        li {
                            @match c.href.as_deref().filter(|h| !h.is_empty() && *h != "#") {
                                Some(href) => { a href=(href) { (c.value) } }
                                None => { span { (c.value) } }
                            }
                        }
                    }
                }
            }
            p.copyright { "© " (chrono::Utc::now().format("%Y").to_string()) " Clean House. Все права защищены." }
        }
    }
}
