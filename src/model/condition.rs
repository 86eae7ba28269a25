use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
use serde_json::{Map, Value};

use super::de;

/// Comparison operator of a condition branch.
///
/// Documents in the wild carry three spellings of the same operator: the numeric
/// code used by the current editor, the Chinese label used by older editor builds
/// and plain English names. All of them are normalized here at load time; saving
/// always writes the camelCase English name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Comparator {
    #[default]
    #[strum(to_string = "equals", serialize = "eq", serialize = "等于")]
    Equals,
    #[strum(to_string = "notEquals", serialize = "not_equals", serialize = "ne", serialize = "不等于")]
    NotEquals,
    #[strum(to_string = "contains", serialize = "包含")]
    Contains,
    #[strum(to_string = "greaterThan", serialize = "greater_than", serialize = "gt", serialize = "大于")]
    GreaterThan,
    #[strum(to_string = "lessThan", serialize = "less_than", serialize = "lt", serialize = "小于")]
    LessThan,
    #[strum(to_string = "greaterThanOrEquals", serialize = "greater_than_or_equals", serialize = "ge", serialize = "大于等于")]
    GreaterThanOrEquals,
    #[strum(to_string = "lessThanOrEquals", serialize = "less_than_or_equals", serialize = "le", serialize = "小于等于")]
    LessThanOrEquals,
    /// Only written by older editor builds.
    #[strum(to_string = "notContains", serialize = "not_contains", serialize = "不包含")]
    NotContains,
}

impl Comparator {
    /// Maps the numeric code of the current editor's condition enum.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Comparator::Equals),
            1 => Some(Comparator::NotEquals),
            2 => Some(Comparator::Contains),
            3 => Some(Comparator::GreaterThan),
            4 => Some(Comparator::LessThan),
            5 => Some(Comparator::GreaterThanOrEquals),
            6 => Some(Comparator::LessThanOrEquals),
            _ => None,
        }
    }

    /// Whether both sides are coerced to numbers before comparing.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Comparator::GreaterThan | Comparator::LessThan | Comparator::GreaterThanOrEquals | Comparator::LessThanOrEquals
        )
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.parse::<u64>() {
            Ok(code) => Self::from_code(code),
            Err(_) => Comparator::from_str(raw).ok(),
        }
    }
}

impl Serialize for Comparator {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_ref())
    }
}

impl<'de> Deserialize<'de> for Comparator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_u64().and_then(Comparator::from_code).ok_or_else(|| D::Error::custom(format!("unknown comparator code: {}", n))),
            Value::String(s) => Comparator::parse(&s).ok_or_else(|| D::Error::custom(format!("unknown comparator: {}", s))),
            other => Err(D::Error::custom(format!("invalid comparator: {}", other))),
        }
    }
}

/// One ordered branch of a condition node.
///
/// Persisted as `{variable, type, value, label}`; `variablePath` and `comparator`
/// are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConditionModel {
    #[serde(alias = "variablePath", default)]
    pub variable: String,
    #[serde(rename = "type", alias = "comparator", default)]
    pub comparator: Comparator,
    #[serde(default, deserialize_with = "de::scalar_to_string")]
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_comparator_accepts_all_spellings() {
        let cases = [
            (json!(0), Comparator::Equals),
            (json!(3), Comparator::GreaterThan),
            (json!("6"), Comparator::LessThanOrEquals),
            (json!("大于等于"), Comparator::GreaterThanOrEquals),
            (json!("不包含"), Comparator::NotContains),
            (json!("notEquals"), Comparator::NotEquals),
            (json!("NOTEQUALS"), Comparator::NotEquals),
            (json!("less_than"), Comparator::LessThan),
            (json!("contains"), Comparator::Contains),
        ];
        for (raw, expected) in cases {
            let parsed: Comparator = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(parsed, expected, "parsing {}", raw);
        }
    }

    #[test]
    fn test_comparator_rejects_unknown() {
        assert!(serde_json::from_value::<Comparator>(json!(7)).is_err());
        assert!(serde_json::from_value::<Comparator>(json!("approximately")).is_err());
        assert!(serde_json::from_value::<Comparator>(json!(true)).is_err());
    }

    #[test]
    fn test_comparator_saves_english_name() {
        assert_eq!(serde_json::to_value(Comparator::GreaterThanOrEquals).unwrap(), json!("greaterThanOrEquals"));
    }

    #[test]
    fn test_condition_model_legacy_shape() {
        let cond: ConditionModel = serde_json::from_value(json!({
            "variable": "player.hp",
            "type": "大于",
            "value": 10,
            "label": "healthy"
        }))
        .unwrap();
        assert_eq!(cond.variable, "player.hp");
        assert_eq!(cond.comparator, Comparator::GreaterThan);
        assert_eq!(cond.value, "10");

        let cond: ConditionModel = serde_json::from_value(json!({
            "variablePath": "flag",
            "comparator": 1,
            "value": true
        }))
        .unwrap();
        assert_eq!(cond.variable, "flag");
        assert_eq!(cond.comparator, Comparator::NotEquals);
        assert_eq!(cond.value, "true");
    }
}
