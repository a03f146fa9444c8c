use serde::{Deserialize, Serialize};

use super::form::{FieldKind, FieldSpec, FormError, FormInput, FormValues};
use super::id::RecordId;
use super::lenient::lenient_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub influence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information_needs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StakeholderInput {
    pub name: String,
    pub role: String,
    pub influence: String,
    pub information_needs: String,
}

impl FormInput for StakeholderInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name", FieldKind::Text),
        FieldSpec::new("role", "Role", FieldKind::Text),
        FieldSpec::new("influence", "Influence", FieldKind::Text),
        FieldSpec::new("information_needs", "Information needs", FieldKind::Text),
    ];

    fn from_form(form: &FormValues) -> Result<Self, FormError> {
        Ok(StakeholderInput {
            name: form.text("name"),
            role: form.text("role"),
            influence: form.text("influence"),
            information_needs: form.text("information_needs"),
        })
    }
}
