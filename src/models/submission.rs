use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter};

/// Raw feedback form payload, as received from the client.
///
/// Every field is optional so that missing values are reported by the
/// validator instead of failing the request body decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub roll_no: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub branch: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub useful: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<String>,
}

/// Accepts a string, number or boolean and converts it to text.
///
/// JSON clients may send `"rating": 4`, `"rating": 4.0` or `"useful": true`.
/// Falsy values (`0`, `false`) count as missing, integral floats lose their
/// fractional part.
fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        String(String),
        Number(serde_json::Number),
        Bool(bool),
    }

    let value = Option::<Scalar>::deserialize(deserializer)?;

    Ok(value.and_then(|value| match value {
        Scalar::String(string) => Some(string),
        Scalar::Number(number) => number_text(&number),
        Scalar::Bool(true) => Some("true".to_owned()),
        Scalar::Bool(false) => None,
    }))
}

fn number_text(number: &serde_json::Number) -> Option<String> {
    match number.as_f64() {
        Some(value) if value == 0.0 => None,
        Some(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            Some((value as i64).to_string())
        }
        _ => Some(number.to_string()),
    }
}

/// Submission fields that carry a validation rule.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    FullName,
    Email,
    Phone,
    RollNo,
    Branch,
    Useful,
    Rating,
}

/// Field-to-message mapping. A field without an entry is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> ValidationErrors {
        ValidationErrors::default()
    }

    /// Keeps the first message reported for a field.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    #[cfg(test)]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[cfg(test)]
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<Field, String>> for ValidationErrors {
    fn from(value: BTreeMap<Field, String>) -> Self {
        ValidationErrors(value)
    }
}
