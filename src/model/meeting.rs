use serde::{Deserialize, Serialize};

use super::form::{FieldKind, FieldSpec, FormError, FormInput, FormValues};
use super::id::RecordId;
use super::lenient::{lenient_string, lenient_text, null_as_default};

/// A meeting. `minutes` is written elsewhere and only displayed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: RecordId,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub kind: String,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_mins: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attendees: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub scheduled_at: String,
    pub duration_mins: String,
    pub attendees: Vec<String>,
    pub agenda: String,
}

impl FormInput for MeetingInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("type", "Type (status/sponsor/etc)", FieldKind::Text),
        FieldSpec::new("scheduled_at", "Scheduled at", FieldKind::DateTime),
        FieldSpec::new("duration_mins", "Duration (min)", FieldKind::Text),
        FieldSpec::new("attendees", "Attendees (comma-sep)", FieldKind::Text),
        FieldSpec::new("agenda", "Agenda", FieldKind::Multiline),
    ];

    fn from_form(form: &FormValues) -> Result<Self, FormError> {
        Ok(MeetingInput {
            kind: form.text("type"),
            scheduled_at: form.text("scheduled_at"),
            duration_mins: form.text("duration_mins"),
            attendees: split_attendees(&form.text("attendees")),
            agenda: form.text("agenda"),
        })
    }
}

/// Split comma-separated attendees, trimming each name. Empty input is an
/// empty list; empty segments between commas are kept.
pub fn split_attendees(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(',').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attendees_are_split_and_trimmed() {
        assert_eq!(
            split_attendees("Alice, Bob,Carol "),
            vec!["Alice", "Bob", "Carol"]
        );
    }

    #[test]
    fn empty_attendees_is_empty_list() {
        assert!(split_attendees("").is_empty());
        let input = MeetingInput::from_form(&FormValues::blank(MeetingInput::FIELDS)).unwrap();
        assert!(input.attendees.is_empty());
    }

    #[test]
    fn empty_segments_are_kept() {
        assert_eq!(split_attendees("Ann,,Ben"), vec!["Ann", "", "Ben"]);
    }

    #[test]
    fn type_field_is_renamed_on_the_wire() {
        let form: FormValues = [("type", "status"), ("attendees", "Ann")]
            .into_iter()
            .collect();
        let value = serde_json::to_value(MeetingInput::from_form(&form).unwrap()).unwrap();
        assert_eq!(value["type"], "status");
        assert_eq!(value["attendees"], serde_json::json!(["Ann"]));
    }
}
