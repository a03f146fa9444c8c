use serde::{Deserialize, Serialize};

use super::form::{FieldKind, FieldSpec, FormError, FormInput, FormValues};
use super::id::RecordId;
use super::lenient::lenient_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub went_well: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub improve: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonInput {
    pub category: String,
    pub went_well: String,
    pub improve: String,
    pub actions: String,
}

impl FormInput for LessonInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new(
            "category",
            "Category (scope/planning/risk/team/comms/other)",
            FieldKind::Text,
        ),
        FieldSpec::new("went_well", "What went well", FieldKind::Multiline),
        FieldSpec::new("improve", "What to improve", FieldKind::Multiline),
        FieldSpec::new("actions", "Actions", FieldKind::Multiline),
    ];

    fn from_form(form: &FormValues) -> Result<Self, FormError> {
        Ok(LessonInput {
            category: form.text("category"),
            went_well: form.text("went_well"),
            improve: form.text("improve"),
            actions: form.text("actions"),
        })
    }
}
