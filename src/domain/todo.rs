use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

pub const NAME_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TodoId(pub i64);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub name: String,
    pub is_completed: bool,
}

/// Create request as it arrives on the wire. Nothing is trusted until
/// [`CreateTodo::validate`] turns it into a [`NewTodo`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub name: Option<String>,
}

/// A todo that passed validation and is ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    name: String,
}

impl NewTodo {
    pub fn name(&self) -> &str { &self.name }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,
    #[error("name is {len} characters long, at most 255 allowed")]
    NameTooLong { len: usize },
}

impl CreateTodo {
    pub fn validate(self) -> Result<NewTodo, ValidationError> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        let len = name.chars().count();
        if len > NAME_MAX_CHARS {
            return Err(ValidationError::NameTooLong { len });
        }
        Ok(NewTodo { name: name.to_owned() })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SetCompletion {
    #[serde(deserialize_with = "completion_flag")]
    pub is_completed: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
    Str(String),
}

// Form-style clients send 0/1 or "true"/"false" instead of JSON booleans.
fn completion_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(b) => Ok(b),
        RawFlag::Int(0) => Ok(false),
        RawFlag::Int(1) => Ok(true),
        RawFlag::Str(s) => match s.as_str() {
            "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(de::Error::invalid_value(de::Unexpected::Str(other), &"a boolean")),
        },
        RawFlag::Int(n) => Err(de::Error::invalid_value(de::Unexpected::Signed(n), &"0 or 1")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: Option<&str>) -> CreateTodo { CreateTodo { name: name.map(str::to_owned) } }

    #[test]
    fn rejects_missing_and_blank_names() {
        assert_eq!(create(None).validate(), Err(ValidationError::MissingName));
        assert_eq!(create(Some("")).validate(), Err(ValidationError::MissingName));
        assert_eq!(create(Some("   \t")).validate(), Err(ValidationError::MissingName));
    }

    #[test]
    fn name_length_is_counted_in_characters() {
        let max = "é".repeat(NAME_MAX_CHARS);
        assert_eq!(create(Some(&max)).validate().unwrap().name(), max);

        let over = "a".repeat(NAME_MAX_CHARS + 1);
        assert_eq!(create(Some(&over)).validate(), Err(ValidationError::NameTooLong { len: 256 }));
    }

    #[test]
    fn stores_trimmed_name() {
        assert_eq!(create(Some("  Buy milk ")).validate().unwrap().name(), "Buy milk");
    }

    #[test]
    fn completion_flag_accepts_form_style_values() {
        for (body, expected) in [
            (r#"{"is_completed":true}"#, true),
            (r#"{"is_completed":false}"#, false),
            (r#"{"is_completed":1}"#, true),
            (r#"{"is_completed":0}"#, false),
            (r#"{"is_completed":"true"}"#, true),
            (r#"{"is_completed":"0"}"#, false),
        ] {
            let parsed: SetCompletion = serde_json::from_str(body).unwrap();
            assert_eq!(parsed.is_completed, expected, "{body}");
        }
    }

    #[test]
    fn completion_flag_rejects_garbage() {
        for body in [r#"{"is_completed":2}"#, r#"{"is_completed":"yes"}"#, r#"{"is_completed":null}"#, "{}"] {
            assert!(serde_json::from_str::<SetCompletion>(body).is_err(), "{body}");
        }
    }
}
