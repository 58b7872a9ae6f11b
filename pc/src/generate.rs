//! Placeholder substitution
//!
//! `generate` walks the template's fields once each, in order, and replaces
//! every literal `{{name}}` occurrence with the field's value. Fixed fields
//! always use their fixed value; other fields use the supplied value for
//! their ID, or the empty string. Placeholders without a field are left as
//! they are.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use crate::error::{PromptError, PromptResult};
use crate::field::{Field, FieldKind};
use crate::template::Template;

/// Values entered by the user, keyed by field ID
pub type FieldValues = HashMap<Uuid, String>;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder pattern is valid"));

/// Substitute all fields of `template` into its body
pub fn generate(template: &Template, values: &FieldValues) -> String {
    debug!(template_id = %template.id(), value_count = values.len(), "generate: called");
    let mut result = template.body().to_string();
    for field in template.fields() {
        let value = match &field.kind {
            FieldKind::Fixed { value } => value.as_str(),
            _ => values.get(&field.id).map(String::as_str).unwrap_or(""),
        };
        result = result.replace(&field.placeholder(), value);
    }
    result
}

/// Fields the user is asked to fill in (everything except Fixed), in form order
pub fn input_fields(template: &Template) -> impl Iterator<Item = &Field> {
    template.fields().iter().filter(|f| f.is_input())
}

/// Input fields that have no value, or an empty one
pub fn missing_inputs<'a>(template: &'a Template, values: &FieldValues) -> Vec<&'a Field> {
    input_fields(template)
        .filter(|f| values.get(&f.id).is_none_or(|v| v.is_empty()))
        .collect()
}

/// Distinct placeholder names in `body`, in order of first appearance
pub fn placeholders(body: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in PLACEHOLDER_RE.captures_iter(body) {
        let name = &cap[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Placeholders in the body that no field will replace
pub fn unmatched_placeholders(template: &Template) -> Vec<String> {
    placeholders(template.body())
        .into_iter()
        .filter(|name| template.field_named(name).is_none())
        .collect()
}

/// Transient per-field input buffer behind a generation form
#[derive(Debug, Clone, Default)]
pub struct FieldInputs {
    values: FieldValues,
}

impl FieldInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field_id: Uuid, value: impl Into<String>) {
        self.values.insert(field_id, value.into());
    }

    /// Current value for a field, empty when nothing was entered
    pub fn get(&self, field_id: Uuid) -> &str {
        self.values.get(&field_id).map(String::as_str).unwrap_or("")
    }

    /// Set the value of the input field called `name`
    pub fn set_named(&mut self, template: &Template, name: &str, value: impl Into<String>) -> PromptResult<()> {
        debug!(%name, "FieldInputs::set_named: called");
        let field = template
            .field_named(name)
            .ok_or_else(|| PromptError::NotFound(format!("field '{}' in template '{}'", name, template.name())))?;
        if !field.is_input() {
            return Err(PromptError::Invalid(format!(
                "field '{}' has a fixed value and takes no input",
                name
            )));
        }
        let value = value.into();
        if let FieldKind::Radio { options } = &field.kind {
            if !value.is_empty() && !options.contains(&value) {
                return Err(PromptError::Invalid(format!(
                    "'{}' is not an option of field '{}' (expected one of: {})",
                    value,
                    name,
                    options.join(", ")
                )));
            }
        }
        self.set(field.id, value);
        Ok(())
    }

    /// Pick a radio option by position
    pub fn select(&mut self, field: &Field, index: usize) -> PromptResult<()> {
        debug!(%field.name, index, "FieldInputs::select: called");
        let option = field
            .options()
            .get(index)
            .ok_or_else(|| PromptError::Invalid(format!("field '{}' has no option {}", field.name, index)))?;
        self.set(field.id, option.clone());
        Ok(())
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        debug!(count = self.values.len(), "FieldInputs::clear: called");
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn greeting() -> Template {
        Template::new(
            "Greeting",
            "Hello {{who}}, signed {{sig}}",
            vec![Field::text("who"), Field::fixed("sig", "Bot")],
        )
        .unwrap()
    }

    #[test]
    fn test_greeting_scenario() {
        let t = greeting();
        let mut inputs = FieldInputs::new();
        inputs.set_named(&t, "who", "Ann").unwrap();
        assert_eq!(generate(&t, inputs.values()), "Hello Ann, signed Bot");
    }

    #[test]
    fn test_unmatched_placeholder_left_verbatim() {
        let t = Template::new(
            "Greeting",
            "Hello {{who}} {{missing}}, signed {{sig}}",
            vec![Field::text("who"), Field::fixed("sig", "Bot")],
        )
        .unwrap();
        let values = FieldValues::from([(t.fields()[0].id, "Ann".to_string())]);
        assert_eq!(generate(&t, &values), "Hello Ann {{missing}}, signed Bot");
        assert_eq!(unmatched_placeholders(&t), vec!["missing".to_string()]);
    }

    #[test]
    fn test_radio_without_selection_is_empty() {
        let t = Template::new("t", "[{{pick}}]", vec![Field::radio("pick", ["A", "B"])]).unwrap();
        assert_eq!(generate(&t, &FieldValues::new()), "[]");

        let mut inputs = FieldInputs::new();
        inputs.select(&t.fields()[0], 1).unwrap();
        assert_eq!(generate(&t, inputs.values()), "[B]");
        assert!(inputs.select(&t.fields()[0], 2).is_err());
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let t = Template::new("t", "{{x}}-{{x}}-{{x}}", vec![Field::text("x")]).unwrap();
        let values = FieldValues::from([(t.fields()[0].id, "y".to_string())]);
        assert_eq!(generate(&t, &values), "y-y-y");
    }

    #[test]
    fn test_name_is_literal_not_pattern() {
        let t = Template::new("t", "{{a.b}} {{axb}}", vec![Field::text("a.b")]).unwrap();
        let values = FieldValues::from([(t.fields()[0].id, "1".to_string())]);
        assert_eq!(generate(&t, &values), "1 {{axb}}");
    }

    #[test]
    fn test_unused_field_is_harmless() {
        let t = Template::new("t", "static", vec![Field::text("unused")]).unwrap();
        assert_eq!(generate(&t, &FieldValues::new()), "static");
    }

    #[test]
    fn test_input_fields_skip_fixed() {
        let t = greeting();
        let names: Vec<&str> = input_fields(&t).map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["who"]);
    }

    #[test]
    fn test_missing_inputs() {
        let t = greeting();
        let mut inputs = FieldInputs::new();
        assert_eq!(missing_inputs(&t, inputs.values()).len(), 1);
        inputs.set_named(&t, "who", "").unwrap();
        assert_eq!(missing_inputs(&t, inputs.values()).len(), 1);
        inputs.set_named(&t, "who", "Ann").unwrap();
        assert!(missing_inputs(&t, inputs.values()).is_empty());
    }

    #[test]
    fn test_set_named_rejects_unknown_and_fixed() {
        let t = greeting();
        let mut inputs = FieldInputs::new();
        assert!(matches!(inputs.set_named(&t, "nope", "x"), Err(PromptError::NotFound(_))));
        assert!(matches!(inputs.set_named(&t, "sig", "x"), Err(PromptError::Invalid(_))));
        assert!(inputs.is_empty());
    }

    #[test]
    fn test_set_named_radio_accepts_only_its_options() {
        let t = Template::new("Pick", "[{{pick}}]", vec![Field::radio("pick", ["A", "B"])]).unwrap();
        let mut inputs = FieldInputs::new();
        assert!(matches!(inputs.set_named(&t, "pick", "Z"), Err(PromptError::Invalid(_))));
        assert!(inputs.is_empty());

        inputs.set_named(&t, "pick", "B").unwrap();
        assert_eq!(generate(&t, inputs.values()), "[B]");

        inputs.set_named(&t, "pick", "").unwrap();
        assert_eq!(generate(&t, inputs.values()), "[]");
    }

    #[test]
    fn test_clear_inputs() {
        let t = greeting();
        let mut inputs = FieldInputs::new();
        inputs.set_named(&t, "who", "Ann").unwrap();
        assert_eq!(inputs.get(t.fields()[0].id), "Ann");
        inputs.clear();
        assert!(inputs.is_empty());
        assert_eq!(inputs.get(t.fields()[0].id), "");
    }

    #[test]
    fn test_placeholders_in_order() {
        assert_eq!(
            placeholders("{{b}} {{a}} {{b}} {{}} {c}"),
            vec!["b".to_string(), "a".to_string()]
        );
    }

    proptest! {
        #[test]
        fn prop_fixed_always_yields_default(
            default in "[a-zA-Z0-9 ]{1,12}",
            supplied in "[a-zA-Z0-9 ]{0,12}",
            prefix in "[a-z ]{0,8}",
        ) {
            let t = Template::new(
                "t",
                format!("{}{{{{sig}}}}/{{{{sig}}}}", prefix),
                vec![Field::fixed("sig", default.clone())],
            )
            .unwrap();
            let values = FieldValues::from([(t.fields()[0].id, supplied)]);
            let out = generate(&t, &values);
            prop_assert_eq!(out, format!("{}{}/{}", prefix, default, default));
        }

        #[test]
        fn prop_no_placeholder_of_fixed_survives(
            names in proptest::collection::hash_set("[a-z]{1,6}", 1..5),
            value in "[A-Z0-9]{0,6}",
        ) {
            let fields: Vec<Field> = names.iter().map(|n| Field::fixed(n.clone(), "v")).collect();
            let body: String = names.iter().map(|n| format!("<{{{{{}}}}}>", n)).collect();
            let t = Template::new("t", body, fields).unwrap();
            let values: FieldValues = t.fields().iter().map(|f| (f.id, value.clone())).collect();
            let out = generate(&t, &values);
            for field in t.fields() {
                prop_assert!(!out.contains(&field.placeholder()));
            }
        }
    }
}
