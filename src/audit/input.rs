//! Form-style numeric input with an explicit "unset" state.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A numeric field as typed by a user.
///
/// Empty or unparseable text is `Unset` rather than zero, so a missing
/// quantity is never silently treated as "no appliances".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NumericInput {
    #[default]
    Unset,
    Value(f64),
}

impl NumericInput {
    /// Parses user text. Blank, unparseable, or non-finite text is `Unset`.
    ///
    /// # Examples
    ///
    /// ```
    /// use solar_sizer::audit::NumericInput;
    ///
    /// assert_eq!(NumericInput::parse("2.5"), NumericInput::Value(2.5));
    /// assert_eq!(NumericInput::parse(""), NumericInput::Unset);
    /// assert_eq!(NumericInput::parse("ten"), NumericInput::Unset);
    /// ```
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Value(v),
            _ => Self::Unset,
        }
    }

    /// Returns the number if one was entered.
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset => None,
        }
    }

    pub fn is_unset(self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl From<f64> for NumericInput {
    fn from(v: f64) -> Self {
        Self::Value(v)
    }
}

impl Serialize for NumericInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::Unset => serializer.serialize_none(),
        }
    }
}

// Accepts a number, numeric text (as posted by HTML forms), or null.
impl<'de> Deserialize<'de> for NumericInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(v)) if v.is_finite() => Self::Value(v),
            Some(Raw::Number(_)) | None => Self::Unset,
            Some(Raw::Text(s)) => Self::parse(&s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(NumericInput::parse("  12 "), NumericInput::Value(12.0));
    }

    #[test]
    fn parse_rejects_infinity() {
        assert_eq!(NumericInput::parse("inf"), NumericInput::Unset);
        assert_eq!(NumericInput::parse("NaN"), NumericInput::Unset);
    }

    #[test]
    fn deserializes_numbers_text_and_null() {
        let values: Vec<NumericInput> =
            serde_json::from_str(r#"[3, 4.5, "7", "", "abc", null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                NumericInput::Value(3.0),
                NumericInput::Value(4.5),
                NumericInput::Value(7.0),
                NumericInput::Unset,
                NumericInput::Unset,
                NumericInput::Unset,
            ]
        );
    }

    #[test]
    fn unset_serializes_as_null() {
        let json = serde_json::to_string(&[NumericInput::Unset, NumericInput::Value(1.5)]).unwrap();
        assert_eq!(json, "[null,1.5]");
    }
}
