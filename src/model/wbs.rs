use serde::{Deserialize, Serialize};

use super::form::{FieldKind, FieldSpec, FormError, FormInput, FormValues, required_text};
use super::id::RecordId;
use super::lenient::{lenient_bool, lenient_text};

/// A work-breakdown-structure item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WbsItem {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub deliverable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_criteria: Option<String>,
}

/// Payload for `POST /projects/{id}/wbs`. Items added from the client are
/// always deliverables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WbsInput {
    pub title: String,
    pub deliverable: bool,
}

impl FormInput for WbsInput {
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::new(
        "title",
        "Deliverable/task",
        FieldKind::Text,
    )];

    fn from_form(form: &FormValues) -> Result<Self, FormError> {
        Ok(WbsInput {
            title: required_text(form, "title")?,
            deliverable: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_posts_nothing() {
        let form = FormValues::blank(WbsInput::FIELDS);
        assert!(matches!(
            WbsInput::from_form(&form),
            Err(FormError::Required { field: "title" })
        ));
    }

    #[test]
    fn items_are_deliverables() {
        let form: FormValues = [("title", "Design doc")].into_iter().collect();
        let input = WbsInput::from_form(&form).unwrap();
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            serde_json::json!({"title": "Design doc", "deliverable": true})
        );
    }

    #[test]
    fn deliverable_accepts_zero_and_one() {
        let items: Vec<WbsItem> = serde_json::from_str(
            r#"[{"id": 1, "title": "Design", "deliverable": 1}, {"id": 2, "deliverable": 0}]"#,
        )
        .unwrap();
        assert!(items[0].deliverable);
        assert!(!items[1].deliverable);
        assert_eq!(items[1].title, "");
    }
}
