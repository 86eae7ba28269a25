use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VariableType {
    #[default]
    String,
    Number,
    Boolean,
    Object,
}

/// Author-defined game state declaration.
///
/// During a preview session the `default_value` slot of a deep copy holds the
/// live value, so the live state has exactly the shape of the declarations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariableModel {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub var_type: VariableType,
    #[serde(default)]
    pub default_value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<VariableModel>>,
}

impl VariableModel {
    pub fn new(
        name: &str,
        var_type: VariableType,
        default_value: Value,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            var_type,
            default_value,
            children: None,
        }
    }

    /// Creates an `object` declaration holding the given children.
    pub fn object(
        name: &str,
        children: Vec<VariableModel>,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            var_type: VariableType::Object,
            default_value: Value::Null,
            children: Some(children),
        }
    }

    /// Children reachable through a dotted path; only `object` declarations have any.
    pub fn fields(&self) -> Option<&[VariableModel]> {
        match self.var_type {
            VariableType::Object => self.children.as_deref(),
            _ => None,
        }
    }

    pub fn fields_mut(&mut self) -> Option<&mut Vec<VariableModel>> {
        match self.var_type {
            VariableType::Object => self.children.as_mut(),
            _ => None,
        }
    }
}

/// Checks that sibling declarations have unique names, recursively.
pub fn duplicate_names(variables: &[VariableModel]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut dups = Vec::new();
    for var in variables {
        if !seen.insert(var.name.as_str()) {
            dups.push(var.name.clone());
        }
        if let Some(children) = &var.children {
            dups.extend(duplicate_names(children).into_iter().map(|n| format!("{}.{}", var.name, n)));
        }
    }
    dups
}
