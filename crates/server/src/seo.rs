//! Page metadata: `<title>`, description/keywords, Open Graph and Twitter
//! tags, plus schema.org JSON-LD records for search engines.

use configs::SiteConfig;
use maud::{html, Markup, PreEscaped};
use models::service;
use serde_json::{json, Value};

pub const DEFAULT_TITLE: &str = "Clean House — Профессиональный клининг в Донецке";
pub const DEFAULT_DESCRIPTION: &str = "Услуги профессиональной уборки квартир, домов и офисов в Донецке. Экологичные средства, опытные специалисты, гарантия качества. Звоните: +7 949 501 57 51";
pub const DEFAULT_KEYWORDS: &str = "клининг Донецк, уборка квартир, уборка домов, уборка офисов, генеральная уборка, мытьё окон, химчистка мебели";

/// Which structured records a page carries besides LocalBusiness.
#[derive(Debug, Clone)]
pub enum PageKind<'a> {
    Home,
    Services(&'a [service::Model]),
    Service(&'a service::Model),
    Other,
}

/// Metadata for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub image: String,
    pub url: Option<String>,
    pub og_type: &'static str,
}

impl PageMeta {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            keywords: DEFAULT_KEYWORDS.to_string(),
            image: site.og_image.clone(),
            url: None,
            og_type: "website",
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn og_type(mut self, og_type: &'static str) -> Self {
        self.og_type = og_type;
        self
    }
}

/// Everything rendered into `<head>` for the current page.
#[derive(Debug, Clone, Default)]
pub struct DocumentHead {
    meta: Option<PageMeta>,
    json_ld: Vec<Value>,
}

impl DocumentHead {
    /// Replace whatever metadata the previous page set. Calling it twice
    /// with the same input yields the same head.
    pub fn set_page_metadata(&mut self, site: &SiteConfig, meta: PageMeta, page: PageKind<'_>) {
        self.json_ld.clear();
        self.json_ld = structured_data(site, &page);
        self.meta = Some(meta);
    }

    pub fn json_ld(&self) -> &[Value] { &self.json_ld }

    pub fn render(&self) -> Markup {
        let Some(m) = &self.meta else { return html! { title { (DEFAULT_TITLE) } } };
        html! {
            title { (m.title) }
            meta name="description" content=(m.description);
            meta name="keywords" content=(m.keywords);
            meta property="og:title" content=(m.title);
            meta property="og:description" content=(m.description);
            meta property="og:type" content=(m.og_type);
            meta property="og:image" content=(m.image);
            @if let Some(url) = &m.url {
                meta property="og:url" content=(url);
            }
            meta name="twitter:title" content=(m.title);
            meta name="twitter:description" content=(m.description);
            meta name="twitter:image" content=(m.image);
            @for record in &self.json_ld {
                script type="application/ld+json" { (PreEscaped(script_safe_json(record))) }
            }
        }
    }
}

/// JSON for embedding inside `<script>`: `</` cannot close the element.
pub fn script_safe_json(v: &Value) -> String {
    v.to_string().replace("</", "<\\/")
}

/// Digits of a display price such as "от 2 500 ₽", or "0" when there are none.
pub fn price_digits(price: &str) -> String {
    let digits: String = price.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() { "0".to_string() } else { digits }
}

fn absolute(site: &SiteConfig, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}/{}", site.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

fn org_id(site: &SiteConfig) -> String { format!("{}/#organization", site.base_url.trim_end_matches('/')) }

fn service_url(site: &SiteConfig, s: &service::Model) -> String { absolute(site, &format!("/services/{}", s.id)) }

pub fn local_business(site: &SiteConfig) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "@id": org_id(site),
        "name": site.name,
        "description": site.description,
        "url": site.base_url,
        "telephone": site.phone,
        "address": { "@type": "PostalAddress", "addressLocality": site.locality, "addressCountry": site.country },
        "geo": { "@type": "GeoCoordinates", "latitude": site.latitude, "longitude": site.longitude },
        "openingHoursSpecification": {
            "@type": "OpeningHoursSpecification",
            "dayOfWeek": ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"],
            "opens": site.opens,
            "closes": site.closes
        },
        "priceRange": site.price_range,
        "image": absolute(site, &site.og_image),
        "sameAs": []
    })
}

fn provider_and_area(site: &SiteConfig) -> (Value, Value) {
    (
        json!({ "@type": "LocalBusiness", "@id": org_id(site) }),
        json!({ "@type": "City", "name": site.locality }),
    )
}

pub fn website(site: &SiteConfig) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": site.name,
        "url": site.base_url,
        "description": "Профессиональный клининг в Донецке",
        "inLanguage": "ru-RU",
        "potentialAction": {
            "@type": "SearchAction",
            "target": absolute(site, "/services?q={search_term_string}"),
            "query-input": "required name=search_term_string"
        }
    })
}

pub fn service_list(site: &SiteConfig, services: &[service::Model]) -> Value {
    let (provider, area) = provider_and_area(site);
    let items: Vec<Value> = services
        .iter()
        .enumerate()
        .map(|(i, s)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "item": {
                    "@type": "Service",
                    "@id": service_url(site, s),
                    "name": s.title,
                    "description": s.description,
                    "provider": provider,
                    "areaServed": area,
                    "offers": {
                        "@type": "Offer",
                        "price": price_digits(&s.price),
                        "priceCurrency": "RUB",
                        "priceSpecification": { "@type": "PriceSpecification", "price": s.price, "priceCurrency": "RUB" }
                    }
                }
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "ItemList",
        "name": format!("Услуги клининга {}", site.name),
        "description": "Полный список услуг профессионального клининга в Донецке",
        "numberOfItems": services.len(),
        "itemListElement": items
    })
}

pub fn single_service(site: &SiteConfig, s: &service::Model) -> Value {
    let (provider, area) = provider_and_area(site);
    let image = s.image_url.as_deref().filter(|u| !u.is_empty()).unwrap_or(&site.og_image);
    json!({
        "@context": "https://schema.org",
        "@type": "Service",
        "@id": service_url(site, s),
        "name": s.title,
        "description": s.description,
        "provider": provider,
        "areaServed": area,
        "image": absolute(site, image),
        "offers": {
            "@type": "Offer",
            "price": price_digits(&s.price),
            "priceCurrency": "RUB",
            "availability": "https://schema.org/InStock"
        }
    })
}

pub fn breadcrumbs(site: &SiteConfig, s: &service::Model) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": [
            { "@type": "ListItem", "position": 1, "name": "Главная", "item": absolute(site, "/") },
            { "@type": "ListItem", "position": 2, "name": "Услуги", "item": absolute(site, "/services") },
            { "@type": "ListItem", "position": 3, "name": s.title, "item": service_url(site, s) }
        ]
    })
}

/// LocalBusiness always, then the page-specific records.
pub fn structured_data(site: &SiteConfig, page: &PageKind<'_>) -> Vec<Value> {
    let mut out = vec![local_business(site)];
    match page {
        PageKind::Home => out.push(website(site)),
        PageKind::Services(list) if !list.is_empty() => out.push(service_list(site, list)),
        PageKind::Service(s) => {
            out.push(single_service(site, s));
            out.push(breadcrumbs(site, s));
        }
        _ => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::service::ServiceCategory;
    use uuid::Uuid;

    fn svc(title: &str, price: &str) -> service::Model {
        service::Model {
            id: Uuid::new_v4(),
            title: title.into(),
            description: "d".into(),
            price: price.into(),
            icon: "Home".into(),
            full_description: None,
            sort_order: 1,
            is_active: true,
            category: ServiceCategory::Cleaning,
            image_url: None,
        }
    }

    #[test]
    fn price_digits_strips_text() {
        assert_eq!(price_digits("от 2 500 ₽"), "2500");
        assert_eq!(price_digits("договорная"), "0");
    }

    #[test]
    fn service_page_gets_service_and_breadcrumbs() {
        let site = SiteConfig::default();
        let s = svc("Мойка окон", "от 500 ₽");
        let records = structured_data(&site, &PageKind::Service(&s));
        let types: Vec<&str> = records.iter().map(|r| r["@type"].as_str().unwrap()).collect();
        assert_eq!(types, ["LocalBusiness", "Service", "BreadcrumbList"]);
        assert_eq!(records[2]["itemListElement"][2]["name"], "Мойка окон");
        assert_eq!(records[1]["offers"]["price"], "500");
    }

    #[test]
    fn empty_service_list_has_no_item_list() {
        let site = SiteConfig::default();
        assert_eq!(structured_data(&site, &PageKind::Services(&[])).len(), 1);
        assert_eq!(structured_data(&site, &PageKind::Home)[1]["@type"], "WebSite");
    }

    #[test]
    fn setting_metadata_twice_does_not_accumulate() {
        let site = SiteConfig::default();
        let mut head = DocumentHead::default();
        let list = vec![svc("A", "1")];
        head.set_page_metadata(&site, PageMeta::new(&site), PageKind::Home);
        head.set_page_metadata(&site, PageMeta::new(&site).title("Услуги"), PageKind::Services(&list));
        head.set_page_metadata(&site, PageMeta::new(&site).title("Услуги"), PageKind::Services(&list));
        assert_eq!(head.json_ld().len(), 2);
        let html = head.render().into_string();
        assert_eq!(html.matches("application/ld+json").count(), 2);
        assert!(html.contains("<title>Услуги</title>"));
    }

    #[test]
    fn script_content_cannot_close_the_tag() {
        let v = json!({"name": "</script><script>alert(1)</script>"});
        assert!(!script_safe_json(&v).contains("</script>"));
    }
}
