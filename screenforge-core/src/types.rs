use serde::{Deserialize, Serialize};

/// Maximum length of any identifier accepted by the pipeline.
pub const MAX_ID_LEN: usize = 128;

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Result<Self, &'static str> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(concat!(stringify!($name), " cannot be empty"));
                }
                if id.len() > MAX_ID_LEN {
                    return Err(concat!(stringify!($name), " is too long"));
                }
                if id.chars().any(char::is_control) {
                    return Err(concat!(stringify!($name), " cannot contain control characters"));
                }
                Ok(Self(id))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = &'static str;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

define_id_type!(ScreenId);
define_id_type!(FlowId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_ids() {
        assert!(ScreenId::new("").is_err());
        assert!(ScreenId::new("   ").is_err());
        assert!(FlowId::new("flow\n1").is_err());
    }

    #[test]
    fn deserialization_validates() {
        let id: ScreenId = serde_json::from_str("\"screen-1\"").unwrap();
        assert_eq!(id.as_str(), "screen-1");
        assert!(serde_json::from_str::<FlowId>("\"\"").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = FlowId::new("onboarding").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"onboarding\"");
    }
}
