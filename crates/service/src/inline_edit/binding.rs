use std::{fmt, str::FromStr};

use uuid::Uuid;

use super::field::FieldKind;
use crate::errors::ServiceError;

/// Where an inline-editable field is stored.
///
/// Text form: `content:{block_key}:{field}` or `{collection}:{id}:{field}`
/// with collection one of `services`, `features`, `contacts`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldBinding {
    Content { block: String, field: String },
    Service { id: Uuid, field: String },
    Feature { id: Uuid, field: String },
    Contact { id: Uuid, field: String },
}

impl FieldBinding {
    pub fn content(block: &str, field: &str) -> Self {
        Self::Content { block: block.to_string(), field: field.to_string() }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::Content { field, .. }
            | Self::Service { field, .. }
            | Self::Feature { field, .. }
            | Self::Contact { field, .. } => field,
        }
    }

    /// Long prose gets a textarea.
    pub fn kind(&self) -> FieldKind {
        match self.field() {
            "description" | "full_description" => FieldKind::MultiLine,
            _ => FieldKind::SingleLine,
        }
    }
}

impl fmt::Display for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content { block, field } => write!(f, "content:{block}:{field}"),
            Self::Service { id, field } => write!(f, "services:{id}:{field}"),
            Self::Feature { id, field } => write!(f, "features:{id}:{field}"),
            Self::Contact { id, field } => write!(f, "contacts:{id}:{field}"),
        }
    }
}

impl FromStr for FieldBinding {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ServiceError::Validation(format!("invalid field binding: {s}"));
        let mut parts = s.splitn(3, ':');
        let (Some(scope), Some(owner), Some(field)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(bad());
        };
        if owner.is_empty() || field.is_empty() {
            return Err(bad());
        }
        let field = field.to_string();
        if scope == "content" {
            return Ok(Self::Content { block: owner.to_string(), field });
        }
        let id = Uuid::parse_str(owner).map_err(|_| bad())?;
        match scope {
            "services" => Ok(Self::Service { id, field }),
            "features" => Ok(Self::Feature { id, field }),
            "contacts" => Ok(Self::Contact { id, field }),
            _ => Err(bad()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_what_it_prints() {
        let id = Uuid::new_v4();
        for b in [
            FieldBinding::content("hero", "title"),
            FieldBinding::Service { id, field: "price".into() },
            FieldBinding::Contact { id, field: "value".into() },
        ] {
            assert_eq!(b.to_string().parse::<FieldBinding>().unwrap(), b);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!("content:hero".parse::<FieldBinding>().is_err());
        assert!("services:not-a-uuid:title".parse::<FieldBinding>().is_err());
        assert!(format!("orders:{}:title", Uuid::new_v4()).parse::<FieldBinding>().is_err());
    }

    #[test]
    fn description_fields_are_multiline() {
        assert_eq!(FieldBinding::content("footer", "description").kind(), FieldKind::MultiLine);
        assert_eq!(FieldBinding::content("hero", "title").kind(), FieldKind::SingleLine);
    }
}
