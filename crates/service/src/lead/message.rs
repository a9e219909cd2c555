use chrono::{DateTime, FixedOffset, Utc};

use super::Lead;

/// Europe/Moscow has been a fixed UTC+3 since 2014.
const MOSCOW_OFFSET_SECS: i32 = 3 * 3600;

/// `dd.mm.yyyy, HH:MM:SS` in Moscow time.
pub fn moscow_timestamp(at: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(MOSCOW_OFFSET_SECS) {
        Some(tz) => at.with_timezone(&tz).format("%d.%m.%Y, %H:%M:%S").to_string(),
        None => at.format("%d.%m.%Y, %H:%M:%S").to_string(),
    }
}

/// Escape characters that legacy Telegram Markdown treats as markup.
pub fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Markdown notification for one lead. The message line is left out when
/// the lead has no message.
pub fn compose_message(lead: &Lead, at: DateTime<Utc>, site_name: &str) -> String {
    let mut text = format!(
        "🧹 *Новая заявка с сайта {}*\n\n👤 *Имя:* {}\n📞 *Телефон:* {}\n",
        site_name,
        escape_markdown(&lead.name),
        escape_markdown(&lead.phone),
    );
    if let Some(message) = &lead.message {
        text.push_str(&format!("💬 *Сообщение:* {}\n", escape_markdown(message)));
    }
    text.push_str(&format!("\n📅 *Дата:* {}", moscow_timestamp(at)));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 3, 5, 21, 7, 9).unwrap() }

    #[test]
    fn timestamp_is_moscow_local() {
        assert_eq!(moscow_timestamp(at()), "06.03.2024, 00:07:09");
    }

    #[test]
    fn message_without_text_has_no_message_line() {
        let lead = Lead { name: "Иван".into(), phone: "+79001234567".into(), message: None };
        let text = compose_message(&lead, at(), "Clean House");
        assert!(text.starts_with("🧹 *Новая заявка с сайта Clean House*"));
        assert!(text.contains("👤 *Имя:* Иван"));
        assert!(text.contains("📞 *Телефон:* +79001234567"));
        assert!(!text.contains("Сообщение"));
        assert!(text.ends_with("📅 *Дата:* 06.03.2024, 00:07:09"));
    }

    #[test]
    fn user_markup_is_escaped() {
        let lead = Lead { name: "*bold*".into(), phone: "1".into(), message: Some("see [link](x) _now_".into()) };
        let text = compose_message(&lead, at(), "Clean House");
        assert!(text.contains("👤 *Имя:* \\*bold\\*"));
        assert!(text.contains("💬 *Сообщение:* see \\[link](x) \\_now\\_"));
    }
}
