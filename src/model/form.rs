use indexmap::IndexMap;
use serde::Serialize;

/// How a form field is edited and what its blank value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line free text
    Text,
    /// Multi-line free text (JSON text areas, agendas)
    Multiline,
    /// `YYYY-MM-DD`
    Date,
    /// `YYYY-MM-DDTHH:MM`
    DateTime,
    /// Present with value `on` when checked, absent otherwise
    Checkbox,
    /// One of `1`..=`5`, defaulting to `1`
    Scale,
}

/// Static description of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, label, kind }
    }
}

/// Values collected from a form, keyed by field name in field order.
///
/// Mirrors what an HTML form submission yields: every text field is present
/// (possibly empty), a checkbox is present only when checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    fields: IndexMap<String, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank values for a field set: empty text, `1` for scales, unchecked boxes.
    pub fn blank(specs: &[FieldSpec]) -> Self {
        let mut values = FormValues::new();
        for spec in specs {
            match spec.kind {
                FieldKind::Checkbox => {}
                FieldKind::Scale => values.set(spec.name, "1"),
                _ => values.set(spec.name, ""),
            }
        }
        values
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    /// Field text, empty when the field is absent.
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.get(name) == Some("on")
    }

    /// Check or uncheck a checkbox field.
    pub fn set_checked(&mut self, name: &str, checked: bool) {
        if checked {
            self.set(name, "on");
        } else {
            self.remove(name);
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut String> {
        self.fields.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = FormValues::new();
        for (k, v) in iter {
            values.fields.insert(k.into(), v.into());
        }
        values
    }
}

/// Error type for turning form values into a typed payload
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field}: '{value}' is not a whole number")]
    NotANumber { field: &'static str, value: String },
    #[error("{field}: {value} is outside 1-5")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("{field}: invalid JSON: {source}")]
    Json {
        field: &'static str,
        source: serde_json::Error,
    },
    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A typed request payload built from form values.
///
/// Each implementation owns the coercion rules for its resource; anything not
/// coerced is passed through as the string the form produced.
pub trait FormInput: Serialize + Sized {
    /// Fields the form collects, in display order.
    const FIELDS: &'static [FieldSpec];

    fn from_form(form: &FormValues) -> Result<Self, FormError>;
}

/// Parse a required 1–5 scale field.
pub(crate) fn scale_field(form: &FormValues, field: &'static str) -> Result<i64, FormError> {
    let raw = form.text(field);
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FormError::Required { field });
    }
    let value: i64 = trimmed.parse().map_err(|_| FormError::NotANumber {
        field,
        value: raw.clone(),
    })?;
    if !(1..=5).contains(&value) {
        return Err(FormError::OutOfRange { field, value });
    }
    Ok(value)
}

/// Parse a JSON text field, using `empty` when the text is empty.
pub(crate) fn json_field<T: serde::de::DeserializeOwned>(
    form: &FormValues,
    field: &'static str,
    empty: &str,
) -> Result<T, FormError> {
    let raw = form.text(field);
    let text = if raw.is_empty() { empty } else { raw.as_str() };
    serde_json::from_str(text).map_err(|source| FormError::Json { field, source })
}

/// Require a non-blank text field.
pub(crate) fn required_text(form: &FormValues, field: &'static str) -> Result<String, FormError> {
    let value = form.text(field);
    if value.trim().is_empty() {
        return Err(FormError::Required { field });
    }
    Ok(value)
}
