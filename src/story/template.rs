use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{
    common::value::{display, is_truthy},
    runtime::VariableStore,
};

/// Regex pattern for conditional text
/// Format: `{{path}?"shown when truthy":"shown otherwise"}`, the false branch and
/// the closing brace being optional
const TERNARY_TEMPLATE_PATTERN: &str = r#"\{\{([^}]+)\}\?"([^"]*)"(?::"([^"]*)")?\}?"#;
/// Regex pattern for variable references
/// Format: `{{path}}` or `{{path.to.field}}`
const VARIABLE_TEMPLATE_PATTERN: &str = r"\{\{([^}]+)\}\}";

static TERNARY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(TERNARY_TEMPLATE_PATTERN).unwrap());
static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(VARIABLE_TEMPLATE_PATTERN).unwrap());

/// Render player-facing text.
///
/// Conditional forms are resolved first, and their chosen branch is rendered
/// recursively; plain references are then substituted. A reference to a missing
/// or `null` variable is left as written so authors can spot it.
pub fn render(
    store: &VariableStore,
    template: &str,
) -> String {
    render_at(store, template, 0)
}

fn render_at(
    store: &VariableStore,
    template: &str,
    depth: usize,
) -> String {
    if depth > store.max_depth() || !template.contains("{{") {
        return template.to_string();
    }

    let text = TERNARY_RE.replace_all(template, |caps: &Captures| {
        let value = store.get(caps[1].trim());
        let branch = if is_truthy(value) { caps.get(2) } else { caps.get(3) };
        let branch = branch.map(|m| m.as_str()).unwrap_or_default();
        render_at(store, branch, depth + 1)
    });

    substitute_once(store, &text)
}

/// Replace plain `{{path}}` references with their current values, once.
fn substitute_once(
    store: &VariableStore,
    text: &str,
) -> String {
    VARIABLE_RE
        .replace_all(text, |caps: &Captures| match store.get(caps[1].trim()) {
            Some(value) if !value.is_null() => display(value),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Substitute references in a mutation value.
///
/// Values that themselves contain references are resolved again, up to the
/// store's depth limit, until the text stops changing.
pub fn substitute(
    store: &VariableStore,
    text: &str,
) -> String {
    let mut current = text.to_string();
    for _ in 0..=store.max_depth() {
        if !current.contains("{{") {
            break;
        }
        let next = substitute_once(store, &current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{VariableModel, VariableType};

    fn create_test_store() -> VariableStore {
        VariableStore::seed(
            &[
                VariableModel::new("x", VariableType::Number, json!(5)),
                VariableModel::new("flag", VariableType::Boolean, json!(true)),
                VariableModel::new("off", VariableType::Boolean, json!(false)),
                VariableModel::new("name", VariableType::String, json!("Mira")),
                VariableModel::new("greeting", VariableType::String, json!("hi {{name}}")),
                VariableModel::new("loop", VariableType::String, json!("{{loop}}!")),
                VariableModel::new("nothing", VariableType::String, json!(null)),
                VariableModel::object(
                    "player",
                    vec![
                        VariableModel::new("hp", VariableType::Number, json!(12.5)),
                        VariableModel::object("inv", vec![VariableModel::new("keys", VariableType::Number, json!(2))]),
                    ],
                ),
            ],
            4,
        )
    }

    // ==================== render tests ====================

    #[test]
    fn test_render_no_variables() {
        let store = create_test_store();
        assert_eq!(render(&store, "hello world"), "hello world");
        assert_eq!(render(&store, ""), "");
    }

    #[test]
    fn test_render_plain_reference() {
        let store = create_test_store();
        assert_eq!(render(&store, "{{x}}"), "5");
        assert_eq!(render(&store, "{{ x }} coins, {{name}}"), "5 coins, Mira");
        assert_eq!(render(&store, "hp {{player.hp}}, keys {{player.inv.keys}}"), "hp 12.5, keys 2");
    }

    #[test]
    fn test_render_missing_reference_is_kept() {
        let store = create_test_store();
        assert_eq!(render(&store, "{{missing}}"), "{{missing}}");
        assert_eq!(render(&store, "{{nothing}}"), "{{nothing}}");
        assert_eq!(render(&store, "{{x.y}}"), "{{x.y}}");
    }

    #[test]
    fn test_render_ternary() {
        let store = create_test_store();
        assert_eq!(render(&store, r#"{{flag}?"A":"B"}"#), "A");
        assert_eq!(render(&store, r#"{{off}?"A":"B"}"#), "B");
        assert_eq!(render(&store, r#"{{missing}?"A":"B"}"#), "B");
        assert_eq!(render(&store, r#"[{{off}?"A"}]"#), "[]");
        assert_eq!(render(&store, r#"You feel {{flag}?"brave, {{name}}":"afraid"}."#), "You feel brave, Mira.");
    }

    #[test]
    fn test_render_ternary_before_plain() {
        let store = create_test_store();
        assert_eq!(render(&store, r#"{{x}} {{off}?"yes":"{{name}}"}"#), "5 Mira");
    }

    #[test]
    fn test_render_does_not_reinterpolate_values() {
        let store = create_test_store();
        assert_eq!(render(&store, "{{greeting}}"), "hi {{name}}");
    }

    // ==================== substitute tests ====================

    #[test]
    fn test_substitute_resolves_nested_values() {
        let store = create_test_store();
        assert_eq!(substitute(&store, "{{x}}+10"), "5+10");
        assert_eq!(substitute(&store, "{{greeting}}!"), "hi Mira!");
        assert_eq!(substitute(&store, "{{missing}}+1"), "{{missing}}+1");
    }

    #[test]
    fn test_substitute_is_bounded() {
        let store = create_test_store();
        let out = substitute(&store, "{{loop}}");
        assert!(out.starts_with("{{loop}}"));
        assert!(out.ends_with("!!!!!"));
    }
}
