use std::fmt;

use serde::{Deserialize, Serialize};

/// A value that was either recognized as a known variant `T`, or kept as the
/// raw string it was read from.
///
/// Game enums grow new members between patches. Rather than failing a whole
/// extraction on an unfamiliar `EMTFuelType::Something`, the raw value is kept
/// and written back out untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recognized<T, Raw = String> {
    Known(T),
    Unknown(Raw),
}

impl<T: Copy, Raw: Copy> Copy for Recognized<T, Raw> {}

impl<T, Raw> Recognized<T, Raw> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Recognized::Known(t) => Some(t),
            Recognized::Unknown(_) => None,
        }
    }

    pub fn unknown(&self) -> Option<&Raw> {
        match self {
            Recognized::Known(_) => None,
            Recognized::Unknown(raw) => Some(raw),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Recognized::Known(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Recognized<U, Raw> {
        match self {
            Recognized::Known(t) => Recognized::Known(f(t)),
            Recognized::Unknown(raw) => Recognized::Unknown(raw),
        }
    }
}

impl<T> Recognized<T, String>
where
    T: for<'a> TryFrom<&'a str>,
{
    /// Parse `raw`, keeping it verbatim when `T` does not know it.
    pub fn parse(raw: &str) -> Self {
        match T::try_from(raw) {
            Ok(t) => Recognized::Known(t),
            Err(_) => Recognized::Unknown(raw.to_string()),
        }
    }
}

impl<T, Raw> From<T> for Recognized<T, Raw> {
    fn from(value: T) -> Self {
        Recognized::Known(value)
    }
}

impl<T: fmt::Display, Raw: fmt::Display> fmt::Display for Recognized<T, Raw> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recognized::Known(t) => t.fmt(f),
            Recognized::Unknown(raw) => raw.fmt(f),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    enum Color {
        Red,
    }

    impl TryFrom<&str> for Color {
        type Error = ();

        fn try_from(value: &str) -> Result<Self, Self::Error> {
            match value {
                "Red" => Ok(Color::Red),
                _ => Err(()),
            }
        }
    }

    #[test]
    fn parse_keeps_unknown_values() {
        assert_eq!(Recognized::<Color>::parse("Red"), Recognized::Known(Color::Red));
        assert_eq!(
            Recognized::<Color>::parse("Plaid"),
            Recognized::Unknown("Plaid".to_string())
        );
    }

    #[test]
    fn serializes_as_bare_value() {
        let known: Recognized<Color> = Color::Red.into();
        let unknown: Recognized<Color> = Recognized::Unknown("Plaid".to_string());
        assert_eq!(serde_json::to_string(&known).unwrap(), "\"Red\"");
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"Plaid\"");

        let back: Recognized<Color> = serde_json::from_str("\"Plaid\"").unwrap();
        assert_eq!(back, unknown);
    }
}
