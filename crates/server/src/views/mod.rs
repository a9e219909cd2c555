//! Server-rendered HTML (maud).

pub mod admin;
pub mod editable;
pub mod icons;
pub mod sections;

use maud::{html, Markup, DOCTYPE};

use crate::seo::DocumentHead;

/// A transient message shown once after a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
    pub error: bool,
}

impl Notice {
    /// Notices travel as a short code in the `notice` query parameter.
    pub fn from_code(code: &str) -> Option<Notice> {
        let (title, description, error) = match code {
            "lead_sent" => ("Заявка отправлена!", "Мы свяжемся с вами в ближайшее время.", false),
            "lead_failed" => ("Ошибка отправки", "Попробуйте позвонить нам напрямую", true),
            "lead_invalid" => ("Заполните форму", "Имя и телефон обязательны", true),
            "saved" => ("Сохранено", "Изменения сохранены", false),
            "save_failed" => ("Ошибка сохранения", "Изменения не сохранены, попробуйте ещё раз", true),
            "deleted" => ("Удалено", "Запись удалена", false),
            "delete_failed" => ("Ошибка удаления", "Не удалось удалить запись", true),
            "uploaded" => ("Изображение загружено!", "", false),
            "upload_heic" => ("Формат HEIC не поддерживается", "Пожалуйста, конвертируйте изображение в JPG или PNG перед загрузкой", true),
            "upload_format" => ("Неподдерживаемый формат", "Допустимые форматы: PNG, JPG, SVG, WebP", true),
            "upload_size" => ("Файл слишком большой", "Максимальный размер файла: 5 МБ", true),
            "upload_failed" => ("Ошибка загрузки", "Не удалось загрузить изображение", true),
            "edit_locked" => ("Режим редактирования выключен", "Включите режим редактирования", true),
            _ => return None,
        };
        Some(Notice { title, description, error })
    }

    pub fn render(&self) -> Markup {
        html! {
            div.notice.notice-error[self.error] role="status" {
                strong { (self.title) }
                @if !self.description.is_empty() {
                    p { (self.description) }
                }
            }
        }
    }
}

/// Only same-site absolute paths are accepted as redirect targets.
pub fn safe_return_to(raw: Option<&str>) -> String {
    match raw {
        Some(p) if p.starts_with('/') && !p.starts_with("//") && !p.contains('\\') => p.to_string(),
        _ => "/".to_string(),
    }
}

/// Append `notice=code` to a path, keeping any fragment at the end.
pub fn with_notice(path: &str, code: &str) -> String {
    let (base, fragment) = match path.split_once('#') {
        Some((b, f)) => (b, Some(f)),
        None => (path, None),
    };
    let sep = if base.contains('?') { '&' } else { '?' };
    match fragment {
        Some(f) => format!("{base}{sep}notice={code}#{f}"),
        None => format!("{base}{sep}notice={code}"),
    }
}

fn edit_toggle(edit_on: bool, return_to: &str) -> Markup {
    html! {
        form.edit-toggle method="post" action="/edit-mode" {
            input type="hidden" name="return_to" value=(return_to);
            button type="submit" aria-pressed=(if edit_on { "true" } else { "false" }) {
                @if edit_on { "✓ Режим редактирования" } @else { "✎ Редактировать" }
            }
        }
    }
}

/// Full public page: head metadata, header with navigation and the edit
/// toggle, the page body and footer.
pub fn page(head: &DocumentHead, edit_on: bool, return_to: &str, notice: Option<Notice>, main: Markup, footer: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ru" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                (head.render())
                link rel="stylesheet" href="/assets/site.css";
            }
            body.edit-mode[edit_on] {
                header.site-header {
                    a.logo href="/" { span.logo-mark { "C" } " Clean House" }
                    nav {
                        a href="/#services" { "Услуги" }
                        a href="/#about" { "О нас" }
                        a href="/#contacts" { "Контакты" }
                        a href="/services" { "Все услуги" }
                    }
                    (edit_toggle(edit_on, return_to))
                }
                @if let Some(n) = notice {
                    (n.render())
                }
                main { (main) }
                (footer)
            }
        }
    }
}
