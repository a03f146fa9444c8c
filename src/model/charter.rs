use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::form::{FieldKind, FieldSpec, FormError, FormInput, FormValues, json_field};
use super::lenient::{lenient_bool, null_as_default};

/// The per-project charter singleton
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Charter {
    #[serde(default)]
    pub business_need: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub goals: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub constraints: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub approvers: Vec<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub signed_off: bool,
}

impl Charter {
    /// Form values pre-filled from this charter, JSON fields pretty-printed.
    pub fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        form.set(
            "business_need",
            self.business_need.clone().unwrap_or_default(),
        );
        form.set(
            "product_description",
            self.product_description.clone().unwrap_or_default(),
        );
        form.set("goals", pretty(&self.goals));
        form.set("constraints", pretty(&self.constraints));
        form.set("approvers", pretty(&self.approvers));
        form.set_checked("signed_off", self.signed_off);
        form
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Payload for `PUT /projects/{id}/charter`; replaces the charter wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharterInput {
    pub business_need: String,
    pub product_description: String,
    pub goals: Vec<String>,
    pub constraints: Map<String, Value>,
    pub approvers: Vec<String>,
    pub signed_off: bool,
}

impl FormInput for CharterInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("business_need", "Business need / problem", FieldKind::Multiline),
        FieldSpec::new(
            "product_description",
            "Product/service description",
            FieldKind::Multiline,
        ),
        FieldSpec::new("goals", "SMART goals (JSON array)", FieldKind::Multiline),
        FieldSpec::new(
            "constraints",
            "Constraints/Assumptions (JSON object)",
            FieldKind::Multiline,
        ),
        FieldSpec::new("approvers", "Approvers (JSON array)", FieldKind::Multiline),
        FieldSpec::new("signed_off", "Signed off", FieldKind::Checkbox),
    ];

    fn from_form(form: &FormValues) -> Result<Self, FormError> {
        Ok(CharterInput {
            business_need: form.text("business_need"),
            product_description: form.text("product_description"),
            goals: json_field(form, "goals", "[]")?,
            constraints: json_field(form, "constraints", "{}")?,
            approvers: json_field(form, "approvers", "[]")?,
            signed_off: form.is_checked("signed_off"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn goals_text_parses_to_sequence() {
        let mut form = FormValues::blank(CharterInput::FIELDS);
        form.set("goals", r#"["Ship v1"]"#);
        let input = CharterInput::from_form(&form).unwrap();
        assert_eq!(input.goals, vec!["Ship v1".to_string()]);
        assert!(input.constraints.is_empty());
        assert!(input.approvers.is_empty());
        assert!(!input.signed_off);
    }

    #[test]
    fn malformed_goals_are_rejected() {
        let mut form = FormValues::blank(CharterInput::FIELDS);
        form.set("goals", "[oops]");
        let err = CharterInput::from_form(&form).unwrap_err();
        assert!(matches!(err, FormError::Json { field: "goals", .. }));
    }

    #[test]
    fn constraints_must_be_an_object() {
        let mut form = FormValues::blank(CharterInput::FIELDS);
        form.set("constraints", "[1, 2]");
        assert!(matches!(
            CharterInput::from_form(&form),
            Err(FormError::Json {
                field: "constraints",
                ..
            })
        ));
    }

    #[test]
    fn signed_off_follows_checkbox() {
        let mut form = FormValues::blank(CharterInput::FIELDS);
        form.set_checked("signed_off", true);
        assert!(CharterInput::from_form(&form).unwrap().signed_off);
    }

    #[test]
    fn prefilled_form_round_trips_through_input() {
        let mut constraints = Map::new();
        constraints.insert("budget".into(), Value::from(50000));
        let charter = Charter {
            business_need: Some("Reduce churn".into()),
            product_description: None,
            goals: vec!["Ship v1".into(), "Hire".into()],
            constraints,
            approvers: vec!["CFO".into()],
            signed_off: true,
        };
        let form = charter.to_form();
        assert_eq!(form.text("product_description"), "");
        assert_eq!(form.text("approvers"), "[\n  \"CFO\"\n]");
        let input = CharterInput::from_form(&form).unwrap();
        assert_eq!(input.goals, charter.goals);
        assert_eq!(input.constraints, charter.constraints);
        assert!(input.signed_off);
    }

    #[test]
    fn missing_charter_fields_default() {
        let charter: Charter = serde_json::from_str("{}").unwrap();
        assert_eq!(charter, Charter::default());
    }

    #[test]
    fn signed_off_accepts_integer_flag() {
        let charter: Charter = serde_json::from_str(r#"{"signed_off": 1}"#).unwrap();
        assert!(charter.signed_off);
    }
}
