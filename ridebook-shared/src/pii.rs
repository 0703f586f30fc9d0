use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A wrapper for passenger contact data that masks its value in Debug and Display output.
///
/// Serialization writes the real value: API responses and store rows need it, while
/// `tracing::info!("{:?}", booking)` must not leak it.
#[derive(Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> Masked<T> {
    /// Last four characters kept, everything before replaced with `*`.
    pub fn redacted(&self) -> String {
        let value = self.0.as_ref();
        let count = value.chars().count();
        if count <= 4 {
            return "*".repeat(count);
        }
        let visible: String = value.chars().skip(count - 4).collect();
        format!("{}{}", "*".repeat(count - 4), visible)
    }
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn reveal(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl From<String> for Masked<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Masked<String> {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_keeps_last_four() {
        let phone = Masked::from("9999912345");
        assert_eq!(format!("{:?}", phone), "******2345");
        assert_eq!(phone.to_string(), "******2345");
    }

    #[test]
    fn test_short_values_fully_masked() {
        assert_eq!(Masked::from("123").redacted(), "***");
        assert_eq!(Masked::from("").redacted(), "");
    }

    #[test]
    fn test_serialize_writes_real_value() {
        let phone = Masked::from("9999912345");
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"9999912345\"");

        let back: Masked<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reveal(), "9999912345");
    }
}
