use serde_json::Value;

use crate::{
    common::value::{display, str_to_number, to_number},
    model::Comparator,
    runtime::VariableStore,
    story::{node::Condition, template},
};

impl Condition {
    /// Evaluates the branch against the current variable values.
    ///
    /// A `variable` written as a template (`{{player.hp}}`) is rendered first;
    /// otherwise it is looked up as a dotted path.
    pub fn evaluate(
        &self,
        store: &VariableStore,
    ) -> bool {
        if self.variable.contains("{{") {
            let rendered = Value::String(template::render(store, &self.variable));
            return compare(Some(&rendered), self.comparator, &self.value);
        }
        compare(store.get(&self.variable), self.comparator, &self.value)
    }
}

/// Compares an actual value against the literal text of a condition.
fn compare(
    actual: Option<&Value>,
    comparator: Comparator,
    expected: &str,
) -> bool {
    if comparator.is_numeric() {
        let lhs = actual.map(to_number).unwrap_or(f64::NAN);
        let rhs = str_to_number(expected);
        return match comparator {
            Comparator::GreaterThan => lhs > rhs,
            Comparator::LessThan => lhs < rhs,
            Comparator::GreaterThanOrEquals => lhs >= rhs,
            _ => lhs <= rhs,
        };
    }

    match comparator {
        Comparator::Equals => loose_eq(actual, expected),
        Comparator::NotEquals => !loose_eq(actual, expected),
        Comparator::Contains => contains(actual, expected),
        Comparator::NotContains => !contains(actual, expected),
        _ => false,
    }
}

fn loose_eq(
    actual: Option<&Value>,
    expected: &str,
) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    if actual.is_null() {
        return expected.is_empty() || expected == "null";
    }
    if display(actual) == expected {
        return true;
    }
    let (lhs, rhs) = (to_number(actual), str_to_number(expected));
    // NaN never compares equal
    !expected.trim().is_empty() && lhs == rhs
}

fn contains(
    actual: Option<&Value>,
    expected: &str,
) -> bool {
    match actual {
        Some(value) if !value.is_null() => display(value).contains(expected),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{VariableModel, VariableType};

    fn store() -> VariableStore {
        VariableStore::seed(
            &[
                VariableModel::new("hp", VariableType::Number, json!(20)),
                VariableModel::new("name", VariableType::String, json!("Alice Smith")),
                VariableModel::new("brave", VariableType::Boolean, json!(true)),
                VariableModel::new("score", VariableType::String, json!("7")),
                VariableModel::object("bag", vec![VariableModel::new("keys", VariableType::Number, json!(0))]),
            ],
            16,
        )
    }

    fn cond(
        variable: &str,
        comparator: Comparator,
        value: &str,
    ) -> Condition {
        Condition {
            variable: variable.to_string(),
            comparator,
            value: value.to_string(),
            label: String::new(),
        }
    }

    #[test]
    fn test_numeric_comparators() {
        let store = store();
        assert!(cond("hp", Comparator::GreaterThan, "10").evaluate(&store));
        assert!(!cond("hp", Comparator::LessThan, "10").evaluate(&store));
        assert!(cond("hp", Comparator::GreaterThanOrEquals, "20").evaluate(&store));
        assert!(cond("hp", Comparator::LessThanOrEquals, "20.0").evaluate(&store));
        assert!(cond("score", Comparator::GreaterThan, "6").evaluate(&store));
        assert!(cond("bag.keys", Comparator::LessThan, "1").evaluate(&store));
        assert!(!cond("hp", Comparator::GreaterThan, "lots").evaluate(&store));
        assert!(!cond("missing", Comparator::LessThan, "100").evaluate(&store));
    }

    #[test]
    fn test_loose_equality() {
        let store = store();
        assert!(cond("hp", Comparator::Equals, "20").evaluate(&store));
        assert!(cond("hp", Comparator::Equals, "20.0").evaluate(&store));
        assert!(cond("brave", Comparator::Equals, "true").evaluate(&store));
        assert!(cond("name", Comparator::Equals, "Alice Smith").evaluate(&store));
        assert!(cond("name", Comparator::NotEquals, "Bob").evaluate(&store));
        assert!(!cond("missing", Comparator::Equals, "").evaluate(&store));
        assert!(cond("missing", Comparator::NotEquals, "x").evaluate(&store));
    }

    #[test]
    fn test_contains() {
        let store = store();
        assert!(cond("name", Comparator::Contains, "Smith").evaluate(&store));
        assert!(!cond("name", Comparator::Contains, "smith").evaluate(&store));
        assert!(cond("name", Comparator::NotContains, "Bob").evaluate(&store));
        assert!(cond("hp", Comparator::Contains, "2").evaluate(&store));
        assert!(!cond("missing", Comparator::Contains, "").evaluate(&store));
    }

    #[test]
    fn test_template_variable() {
        let store = store();
        assert!(cond("{{hp}}", Comparator::GreaterThan, "19").evaluate(&store));
        assert!(cond("{{name}}!", Comparator::Equals, "Alice Smith!").evaluate(&store));
    }
}
