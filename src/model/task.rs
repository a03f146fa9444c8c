use serde::{Deserialize, Serialize};

use super::form::{FieldKind, FieldSpec, FormError, FormInput, FormValues};
use super::id::RecordId;
use super::lenient::{lenient_string, lenient_text};

/// A scheduled task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub effort_days: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_days: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskInput {
    pub assignee: String,
    pub effort_days: String,
    pub duration_days: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
}

impl FormInput for TaskInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("assignee", "Assignee", FieldKind::Text),
        FieldSpec::new("effort_days", "Effort (days)", FieldKind::Text),
        FieldSpec::new("duration_days", "Duration (days)", FieldKind::Text),
        FieldSpec::new("start_date", "Start", FieldKind::Date),
        FieldSpec::new("end_date", "End", FieldKind::Date),
        FieldSpec::new("status", "Status", FieldKind::Text),
    ];

    fn from_form(form: &FormValues) -> Result<Self, FormError> {
        Ok(TaskInput {
            assignee: form.text("assignee"),
            effort_days: form.text("effort_days"),
            duration_days: form.text("duration_days"),
            start_date: form.text("start_date"),
            end_date: form.text("end_date"),
            status: form.text("status"),
        })
    }
}
