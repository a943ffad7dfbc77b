use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record type persisted as one array slot.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human name used in errors ("client", "habit", ...).
    const KIND: &'static str;
    /// Slot holding the feature-wide list.
    const SLOT: &'static str;

    fn id(&self) -> &str;

    /// First-run seed list written when the slot is absent.
    fn defaults() -> Vec<Self> {
        Vec::new()
    }
}

/// Trim a form field, returning `None` when it is blank.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Require a non-blank form field.
pub fn required(field: &str, value: &str) -> crate::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::RouteError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Optional email field: blank is allowed, otherwise it must contain '@'.
pub fn optional_email(value: Option<&str>) -> crate::Result<Option<String>> {
    match non_blank(value) {
        Some(email) if !email.contains('@') => Err(crate::RouteError::validation(format!(
            "'{email}' is not a valid email address"
        ))),
        other => Ok(other),
    }
}

/// A numeric form field as typed: a JSON number or free text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// Text goes through [`crate::list::parse_number_or_zero`].
    pub fn value(&self) -> f64 {
        match self {
            NumberInput::Number(n) if n.is_finite() => *n,
            NumberInput::Number(_) => 0.0,
            NumberInput::Text(t) => crate::list::parse_number_or_zero(t),
        }
    }
}

impl Default for NumberInput {
    fn default() -> Self {
        NumberInput::Number(0.0)
    }
}

impl From<&str> for NumberInput {
    fn from(text: &str) -> Self {
        NumberInput::Text(text.to_string())
    }
}

/// Declare `as_str`, `all`, `Display` and `FromStr` for a unit-only enum whose
/// wire names match the variant names.
macro_rules! string_enum {
    ($name:ident, $kind:literal, [$($variant:ident => $label:literal),+ $(,)?]) => {
        impl $name {
            pub fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::RouteError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::all()
                    .iter()
                    .copied()
                    .find(|v| {
                        v.as_str().eq_ignore_ascii_case(wanted)
                            || v.as_str().replace(' ', "").eq_ignore_ascii_case(&wanted.replace(['-', '_', ' '], ""))
                    })
                    .ok_or_else(|| crate::RouteError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

pub(crate) use string_enum;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("name", "  Ada ").unwrap(), "Ada");
        assert!(required("name", "   ").is_err());
    }

    #[test]
    fn optional_email_checks_at_sign() {
        assert_eq!(optional_email(None).unwrap(), None);
        assert_eq!(optional_email(Some(" ")).unwrap(), None);
        assert_eq!(
            optional_email(Some("a@b.co")).unwrap().as_deref(),
            Some("a@b.co")
        );
        assert!(optional_email(Some("nope")).is_err());
    }

    #[test]
    fn number_input_accepts_both_shapes() {
        let n: NumberInput = serde_json::from_str("42.5").unwrap();
        assert_eq!(n.value(), 42.5);
        let t: NumberInput = serde_json::from_str("\"12%\"").unwrap();
        assert_eq!(t.value(), 12.0);
        assert_eq!(NumberInput::from("lots").value(), 0.0);
    }
}
