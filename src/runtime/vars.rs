use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{
    common::value::number_value,
    model::VariableModel,
    story::{expr, template},
};

/// Live variable values of a preview session.
///
/// The store is a deep copy of the author's declarations whose `default_value`
/// slots hold the live values, so it always has the shape of the declarations:
/// no variable is ever created or removed during a session.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableStore {
    variables: Vec<VariableModel>,
    max_depth: usize,
}

impl VariableStore {
    /// Seeds a store from the declared defaults. `max_depth` bounds template
    /// recursion for text rendered against this store.
    pub fn seed(
        declarations: &[VariableModel],
        max_depth: usize,
    ) -> Self {
        Self {
            variables: declarations.to_vec(),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Value at a dotted path such as `player.health`.
    ///
    /// `None` when a segment does not exist or an intermediate segment is not an
    /// `object` variable.
    pub fn get(
        &self,
        path: &str,
    ) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = find(&self.variables, segments.next()?)?;
        for segment in segments {
            current = find(current.fields()?, segment)?;
        }
        Some(&current.default_value)
    }

    /// Assigns the value computed from `raw` to an existing variable.
    ///
    /// Returns `false`, leaving the store untouched, when the path does not
    /// resolve to a declared variable.
    pub fn set(
        &mut self,
        path: &str,
        raw: &Value,
    ) -> bool {
        if self.get(path).is_none() {
            debug!(path, "ignoring update of undeclared variable");
            return false;
        }
        let value = self.compute(raw);
        match self.slot_mut(path) {
            Some(slot) => {
                trace!(path, value = %value, "variable updated");
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Applies an edge's mutations one entry at a time, in declared order, so
    /// later entries see the results of earlier ones. Returns how many applied.
    pub fn apply(
        &mut self,
        updates: &Map<String, Value>,
    ) -> usize {
        updates.iter().filter(|(path, raw)| self.set(path.trim(), raw)).count()
    }

    /// Text rendered against the current values.
    pub fn render(
        &self,
        template: &str,
    ) -> String {
        template::render(self, template)
    }

    /// Current values as a nested JSON object.
    pub fn snapshot(&self) -> Value {
        snapshot(&self.variables)
    }

    /// Value stored for a raw mutation value.
    ///
    /// Text with `{{path}}` references is substituted first; text that is then
    /// pure arithmetic is evaluated, falling back to the text itself when the
    /// expression is malformed. Non-text values are stored as they are.
    pub fn compute(
        &self,
        raw: &Value,
    ) -> Value {
        let Value::String(text) = raw else {
            return raw.clone();
        };

        let text = if text.contains("{{") && text.contains("}}") {
            let substituted = template::substitute(self, text);
            if substituted.contains("{{") {
                return Value::String(substituted);
            }
            substituted
        } else {
            text.clone()
        };

        if expr::is_arithmetic(&text) {
            match expr::evaluate(&text).map(number_value) {
                Ok(Some(value)) => return value,
                Ok(None) => {}
                Err(e) => debug!(text = %text, error = %e, "storing malformed expression verbatim"),
            }
        }
        Value::String(text)
    }

    fn slot_mut(
        &mut self,
        path: &str,
    ) -> Option<&mut Value> {
        let mut segments = path.split('.');
        let mut current = find_mut(&mut self.variables, segments.next()?)?;
        for segment in segments {
            current = find_mut(current.fields_mut()?, segment)?;
        }
        Some(&mut current.default_value)
    }
}

fn find<'a>(
    variables: &'a [VariableModel],
    name: &str,
) -> Option<&'a VariableModel> {
    variables.iter().find(|v| v.name == name)
}

fn find_mut<'a>(
    variables: &'a mut [VariableModel],
    name: &str,
) -> Option<&'a mut VariableModel> {
    variables.iter_mut().find(|v| v.name == name)
}

fn snapshot(variables: &[VariableModel]) -> Value {
    let mut map = Map::new();
    for var in variables {
        let value = match var.fields() {
            Some(children) => snapshot(children),
            None => var.default_value.clone(),
        };
        map.insert(var.name.clone(), value);
    }
    Value::Object(map)
}
