use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::form::{FieldKind, FieldSpec, FormError, FormInput, FormValues, scale_field};
use super::id::RecordId;
use super::lenient::{lenient_int, lenient_text};

/// A risk register entry. `exposure` is computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub probability: i64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub impact: i64,
    #[serde(default)]
    pub exposure: Option<Number>,
}

/// Payload for `POST /projects/{id}/risks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskInput {
    pub title: String,
    pub trigger: String,
    pub mitigation: String,
    pub owner: String,
    pub probability: i64,
    pub impact: i64,
}

impl FormInput for RiskInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", "Risk", FieldKind::Text),
        FieldSpec::new("trigger", "Trigger", FieldKind::Text),
        FieldSpec::new("mitigation", "Mitigation", FieldKind::Text),
        FieldSpec::new("owner", "Owner", FieldKind::Text),
        FieldSpec::new("probability", "Probability", FieldKind::Scale),
        FieldSpec::new("impact", "Impact", FieldKind::Scale),
    ];

    fn from_form(form: &FormValues) -> Result<Self, FormError> {
        Ok(RiskInput {
            title: form.text("title"),
            trigger: form.text("trigger"),
            mitigation: form.text("mitigation"),
            owner: form.text("owner"),
            probability: scale_field(form, "probability")?,
            impact: scale_field(form, "impact")?,
        })
    }
}
