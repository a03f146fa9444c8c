use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::form::{FieldKind, FieldSpec, FormError, FormInput, FormValues};
use super::id::RecordId;
use super::lenient::lenient_text;

/// A change request. `decision` is assigned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub impact: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub decision: Option<String>,
}

/// Payload for `POST /projects/{id}/changes`. `impact` is always sent, as
/// `null` when the form left it empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeInput {
    pub title: String,
    pub requested_by: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub impact: Option<Value>,
    pub description: String,
}

impl FormInput for ChangeInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", "Title", FieldKind::Text),
        FieldSpec::new("requested_by", "Requested by", FieldKind::Text),
        FieldSpec::new("type", "Type (scope/time/cost)", FieldKind::Text),
        FieldSpec::new(
            "impact",
            r#"Impact JSON e.g. {"scope":"-feature","time_days":5,"cost":1200}"#,
            FieldKind::Multiline,
        ),
        FieldSpec::new("description", "Description", FieldKind::Multiline),
    ];

    fn from_form(form: &FormValues) -> Result<Self, FormError> {
        let raw_impact = form.text("impact");
        let impact = if raw_impact.is_empty() {
            None
        } else {
            let value: Value = serde_json::from_str(&raw_impact).map_err(|source| {
                FormError::Json {
                    field: "impact",
                    source,
                }
            })?;
            Some(value)
        };
        Ok(ChangeInput {
            title: form.text("title"),
            requested_by: form.text("requested_by"),
            kind: form.text("type"),
            impact,
            description: form.text("description"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_impact_is_sent_as_null() {
        let form = FormValues::blank(ChangeInput::FIELDS);
        let value = serde_json::to_value(ChangeInput::from_form(&form).unwrap()).unwrap();
        assert_eq!(value["impact"], Value::Null);
        assert!(value.as_object().unwrap().contains_key("impact"));
        assert_eq!(value["type"], "");
    }

    #[test]
    fn impact_text_is_parsed() {
        let mut form = FormValues::blank(ChangeInput::FIELDS);
        form.set("impact", r#"{"time_days": 5, "cost": 1200}"#);
        let input = ChangeInput::from_form(&form).unwrap();
        assert_eq!(input.impact, Some(json!({"time_days": 5, "cost": 1200})));
    }

    #[test]
    fn malformed_impact_aborts() {
        let mut form = FormValues::blank(ChangeInput::FIELDS);
        form.set("impact", "{time: 5}");
        assert!(matches!(
            ChangeInput::from_form(&form),
            Err(FormError::Json { field: "impact", .. })
        ));
    }

    #[test]
    fn null_title_reads_as_empty() {
        let change: ChangeRequest =
            serde_json::from_str(r#"{"id": 4, "title": null, "decision": "pending"}"#).unwrap();
        assert_eq!(change.title, "");
        assert_eq!(change.decision.as_deref(), Some("pending"));
    }
}
