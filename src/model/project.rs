use serde::{Deserialize, Serialize};

use super::form::{FieldKind, FieldSpec, FormError, FormInput, FormValues, required_text};
use super::id::RecordId;
use super::lenient::{lenient_string, lenient_text};

/// A project as returned by `GET /projects`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
}

/// Payload for `POST /projects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInput {
    pub name: String,
    pub sponsor: String,
    pub manager: String,
    pub priority: String,
    pub required_date: String,
}

impl FormInput for ProjectInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name", FieldKind::Text),
        FieldSpec::new("sponsor", "Sponsor", FieldKind::Text),
        FieldSpec::new("manager", "Project Manager", FieldKind::Text),
        FieldSpec::new("priority", "Priority", FieldKind::Text),
        FieldSpec::new("required_date", "Required date", FieldKind::Date),
    ];

    fn from_form(form: &FormValues) -> Result<Self, FormError> {
        Ok(ProjectInput {
            name: required_text(form, "name")?,
            sponsor: form.text("sponsor"),
            manager: form.text("manager"),
            priority: form.text("priority"),
            required_date: form.text("required_date"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required() {
        let form = FormValues::blank(ProjectInput::FIELDS);
        assert!(matches!(
            ProjectInput::from_form(&form),
            Err(FormError::Required { field: "name" })
        ));
    }

    #[test]
    fn other_fields_pass_through() {
        let mut form = FormValues::blank(ProjectInput::FIELDS);
        form.set("name", "Atlas");
        form.set("priority", "high");
        let input = ProjectInput::from_form(&form).unwrap();
        assert_eq!(input.name, "Atlas");
        assert_eq!(input.priority, "high");
        assert_eq!(input.sponsor, "");
    }

    #[test]
    fn deserializes_numeric_priority_and_missing_fields() {
        let p: Project =
            serde_json::from_str(r#"{"id": 3, "name": "Atlas", "priority": 2, "status": "active"}"#)
                .unwrap();
        assert_eq!(p.id.as_str(), "3");
        assert_eq!(p.priority.as_deref(), Some("2"));
        assert_eq!(p.sponsor, None);
        assert_eq!(p.status, "active");
    }
}
