//! Icon table: fixed string keys mapped to a glyph, with aliases and a
//! fallback for keys we do not know.

use maud::{html, Markup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub key: &'static str,
    pub glyph: &'static str,
}

const fn icon(key: &'static str, glyph: &'static str) -> Icon { Icon { key, glyph } }

pub const HOME: Icon = icon("Home", "🏠");

pub const ICONS: &[Icon] = &[
    HOME,
    icon("Building2", "🏢"),
    icon("Sofa", "🛋"),
    icon("SprayCan", "🧴"),
    icon("Sparkles", "✨"),
    icon("HardHat", "👷"),
    icon("Shield", "🛡"),
    icon("Clock", "🕒"),
    icon("Leaf", "🍃"),
    icon("Award", "🏅"),
    icon("Users", "👥"),
    icon("ThumbsUp", "👍"),
    icon("Phone", "📞"),
    icon("Mail", "✉"),
    icon("MapPin", "📍"),
    icon("Waves", "🌊"),
    icon("BedDouble", "🛏"),
    icon("AppWindow", "🪟"),
    icon("Hammer", "🔨"),
    icon("RefreshCw", "🔄"),
    icon("AlertTriangle", "⚠"),
    icon("Trash2", "🗑"),
    icon("Grid3X3", "▦"),
    icon("Wine", "🍷"),
    icon("LayoutGrid", "▤"),
    icon("Dog", "🐕"),
    icon("Blinds", "🪟"),
    icon("Maximize2", "⤢"),
    icon("Construction", "🚧"),
    icon("DoorOpen", "🚪"),
    icon("Grid2X2", "▣"),
    icon("Eraser", "🧽"),
    icon("Armchair", "💺"),
];

const ALIASES: &[(&str, &str)] = &[
    ("Microwave", "SprayCan"),
    ("Refrigerator", "SprayCan"),
    ("Square", "SprayCan"),
    ("Chair", "Sofa"),
];

/// Icons offered by the admin picker, with Russian labels.
pub const PICKER: &[(&str, &str)] = &[
    ("Home", "Дом"),
    ("Building2", "Здание"),
    ("Sofa", "Диван"),
    ("SprayCan", "Спрей"),
    ("Sparkles", "Блеск"),
    ("HardHat", "Каска"),
    ("Shield", "Щит"),
    ("Clock", "Часы"),
    ("Leaf", "Лист"),
    ("Award", "Награда"),
    ("Users", "Пользователи"),
    ("ThumbsUp", "Палец вверх"),
    ("Phone", "Телефон"),
    ("Mail", "Почта"),
    ("MapPin", "Локация"),
];

fn lookup(key: &str) -> Option<Icon> {
    let key = ALIASES.iter().find(|(alias, _)| *alias == key).map(|(_, target)| *target).unwrap_or(key);
    ICONS.iter().copied().find(|i| i.key == key)
}

/// Unknown keys render as [`HOME`].
pub fn resolve(key: &str) -> Icon { lookup(key).unwrap_or(HOME) }

pub fn resolve_or(key: &str, fallback: &str) -> Icon { lookup(key).or_else(|| lookup(fallback)).unwrap_or(HOME) }

pub fn render(icon: Icon) -> Markup {
    html! { span.icon data-icon=(icon.key) aria-hidden="true" { (icon.glyph) } }
}
