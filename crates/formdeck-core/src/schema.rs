//! Form definition data model.
//!
//! These types are the persisted shape of a form: a JSON array of `Form`
//! objects under the `savedForms` key, with every nested field, rule, and
//! option inlined. Attribute names are camelCase and optional attributes may
//! be absent in older snapshots.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FormError;

/// Opaque identifier of a form. Assigned at creation, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(String);

/// Identifier of a field, unique within its owning form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(FormId);
string_id!(FieldId);

/// The fixed palette of field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Date,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
        }
    }

    /// Whether fields of this type carry a list of options.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                FormError::InvalidInput(format!(
                    "Unknown field type '{}' (expected one of: text, number, textarea, select, radio, checkbox, date)",
                    s
                ))
            })
    }
}

/// Kind of a declarative validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Email,
    Password,
    Custom,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Email => "email",
            Self::Password => "password",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "required" => Ok(Self::Required),
            "minlength" => Ok(Self::MinLength),
            "maxlength" => Ok(Self::MaxLength),
            "email" => Ok(Self::Email),
            "password" => Ok(Self::Password),
            "custom" => Ok(Self::Custom),
            _ => Err(FormError::InvalidInput(format!(
                "Unknown rule type '{}' (expected one of: required, minLength, maxLength, email, password, custom)",
                s
            ))),
        }
    }
}

/// Optional parameter of a validation rule.
///
/// Length limits may have been stored as numeric strings, so numbers are read
/// through [`RuleParam::as_number`] rather than by matching the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleParam {
    Number(f64),
    Text(String),
}

impl RuleParam {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) => None,
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// A zero, NaN, or empty parameter counts as "not configured".
    pub fn is_set(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Equality with a candidate value, compared as entered text: `42`
    /// matches the number 42 and the string `"42"` alike.
    pub fn matches(&self, value: &FieldValue) -> bool {
        self.to_string() == value.to_text()
    }
}

impl fmt::Display for RuleParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A declarative constraint on a field's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub kind: RuleKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RuleParam>,

    /// Custom error text; the rule's default message is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            value: None,
            message: None,
        }
    }

    pub fn with_value(mut self, value: RuleParam) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// One choice of a select or radio field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A value held for a field during preview.
///
/// Serialized untagged: `null`, booleans, numbers, `YYYY-MM-DD` dates, and
/// any other string as text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Truthiness: empty, `""`, `false`, `0` and NaN are not present.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Date(_) => true,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Missing for the purposes of the `required` rule.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            other => !other.is_present(),
        }
    }

    /// Read a stored JSON value as a value for a field of `field_type`.
    ///
    /// Only date fields read `YYYY-MM-DD` strings as dates and only number
    /// fields read numeric strings as numbers; text-like fields keep text.
    /// `null` yields `None`.
    pub fn from_json(field_type: FieldType, raw: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        let value = match (field_type, raw) {
            (_, Value::Null) => return None,
            (FieldType::Checkbox, Value::Bool(b)) => Self::Bool(*b),
            (FieldType::Checkbox, Value::String(s)) => match s.trim() {
                "true" => Self::Bool(true),
                "false" => Self::Bool(false),
                _ => Self::Text(s.clone()),
            },
            (FieldType::Number, Value::Number(n)) => match n.as_f64() {
                Some(n) => Self::Number(n),
                None => Self::Text(n.to_string()),
            },
            (FieldType::Number, Value::String(s)) => {
                match s.trim().parse::<f64>().ok().filter(|n| n.is_finite()) {
                    Some(n) => Self::Number(n),
                    None => Self::Text(s.clone()),
                }
            }
            (FieldType::Date, Value::String(s)) => {
                match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                    Ok(date) => Self::Date(date),
                    Err(_) => Self::Text(s.clone()),
                }
            }
            (_, Value::String(s)) => Self::Text(s.clone()),
            (_, Value::Bool(b)) => Self::Text(b.to_string()),
            (_, Value::Number(n)) => match n.as_f64() {
                Some(n) => Self::Text(format_number(n)),
                None => Self::Text(n.to_string()),
            },
            (_, other) => Self::Text(other.to_string()),
        };
        Some(value)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// String form used by pattern rules and for display.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Empty => Cow::Borrowed(""),
            Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::Number(n) => Cow::Owned(format_number(*n)),
            Self::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
            Self::Text(s) => Cow::Borrowed(s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Runtime values keyed by field id. Never persisted.
pub type FormValues = HashMap<FieldId, FieldValue>;

/// One input definition within a form.
///
/// Deserialized through [`FieldRecord`] so the default value is read
/// according to the field's type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: FieldId,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    pub label: String,

    pub placeholder: String,

    pub required: bool,

    pub validation_rules: Vec<ValidationRule>,

    pub is_derived: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parent_fields: Vec<FieldId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_formula: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,

    /// Position within the owning form; kept equal to the field's index
    pub order: usize,
}

/// Stored shape of a [`FormField`], with the default value left as raw JSON
/// until the field type is known.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldRecord {
    id: FieldId,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    label: String,
    #[serde(default)]
    placeholder: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    validation_rules: Vec<ValidationRule>,
    #[serde(default)]
    is_derived: bool,
    #[serde(default)]
    parent_fields: Vec<FieldId>,
    #[serde(default)]
    derived_formula: Option<String>,
    #[serde(default)]
    options: Vec<SelectOption>,
    #[serde(default)]
    default_value: Option<serde_json::Value>,
    #[serde(default)]
    order: usize,
}

impl<'de> Deserialize<'de> for FormField {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = FieldRecord::deserialize(deserializer)?;
        let default_value = record
            .default_value
            .as_ref()
            .and_then(|raw| FieldValue::from_json(record.field_type, raw));
        Ok(Self {
            id: record.id,
            field_type: record.field_type,
            label: record.label,
            placeholder: record.placeholder,
            required: record.required,
            validation_rules: record.validation_rules,
            is_derived: record.is_derived,
            parent_fields: record.parent_fields,
            derived_formula: record.derived_formula,
            options: record.options,
            default_value,
            order: record.order,
        })
    }
}

impl FormField {
    /// A blank field of the given type with the palette's default label.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            id: FieldId::generate(),
            field_type,
            label: format!("New {} field", field_type),
            placeholder: String::new(),
            required: false,
            validation_rules: Vec::new(),
            is_derived: false,
            parent_fields: Vec::new(),
            derived_formula: None,
            options: Vec::new(),
            default_value: None,
            order: 0,
        }
    }

    /// Derived with at least one parent and a non-empty formula.
    pub fn derives_value(&self) -> bool {
        self.is_derived
            && !self.parent_fields.is_empty()
            && self
                .derived_formula
                .as_deref()
                .is_some_and(|formula| !formula.is_empty())
    }
}

/// A named, timestamped, ordered collection of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: FormId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub fields: Vec<FormField>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// An empty, unnamed form stamped with the current time.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: FormId::generate(),
            name: String::new(),
            fields: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn field(&self, id: &FieldId) -> Option<&FormField> {
        self.fields.iter().find(|f| &f.id == id)
    }

    pub fn position(&self, id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|f| &f.id == id)
    }

    /// Reassign `order` so it matches each field's index.
    pub fn renumber(&mut self) {
        for (index, field) in self.fields.iter_mut().enumerate() {
            field.order = index;
        }
    }

    /// Refresh `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// True when `order` values are exactly `0..n` in sequence.
    pub fn has_contiguous_order(&self) -> bool {
        self.fields
            .iter()
            .enumerate()
            .all(|(index, field)| field.order == index)
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

/// Numbers print without a trailing `.0` when they are whole.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_field_defaults() {
        let field = FormField::new(FieldType::Checkbox);
        assert_eq!(field.label, "New checkbox field");
        assert!(!field.required);
        assert!(!field.is_derived);
        assert!(field.validation_rules.is_empty());
        assert!(field.options.is_empty());
    }

    #[test]
    fn test_field_type_parse() {
        assert_eq!("Textarea".parse::<FieldType>().unwrap(), FieldType::Textarea);
        assert!("slider".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_rule_kind_parse_accepts_separators() {
        assert_eq!("minLength".parse::<RuleKind>().unwrap(), RuleKind::MinLength);
        assert_eq!("max-length".parse::<RuleKind>().unwrap(), RuleKind::MaxLength);
        assert_eq!("min_length".parse::<RuleKind>().unwrap(), RuleKind::MinLength);
    }

    #[test]
    fn test_rule_param_numeric_string() {
        assert_eq!(RuleParam::Text("5".to_string()).as_number(), Some(5.0));
        assert_eq!(RuleParam::Text("five".to_string()).as_number(), None);
        assert_eq!(RuleParam::Number(5.0).to_string(), "5");
    }

    #[test]
    fn test_field_value_truthiness() {
        assert!(!FieldValue::Empty.is_present());
        assert!(!FieldValue::Bool(false).is_present());
        assert!(!FieldValue::Number(0.0).is_present());
        assert!(FieldValue::text(" ").is_present());
        assert!(FieldValue::text(" ").is_blank());
        assert!(!FieldValue::text("x").is_blank());
    }

    #[test]
    fn test_field_value_untagged_decoding() {
        let values: Vec<FieldValue> =
            serde_json::from_value(json!([null, true, 4, "1990-05-17", "hello"])).unwrap();
        assert_eq!(values[0], FieldValue::Empty);
        assert_eq!(values[1], FieldValue::Bool(true));
        assert_eq!(values[2], FieldValue::Number(4.0));
        assert_eq!(
            values[3],
            FieldValue::Date(NaiveDate::from_ymd_opt(1990, 5, 17).unwrap())
        );
        assert_eq!(values[4], FieldValue::text("hello"));
    }

    #[test]
    fn test_default_value_survives_round_trip_by_type() {
        let mut code = FormField::new(FieldType::Text);
        code.default_value = Some(FieldValue::text("2020-01-01"));
        let mut born = FormField::new(FieldType::Date);
        born.default_value = Some(FieldValue::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()));
        let mut count = FormField::new(FieldType::Number);
        count.default_value = Some(FieldValue::Number(3.0));
        let mut zip = FormField::new(FieldType::Text);
        zip.default_value = Some(FieldValue::text("12345"));

        for field in [code, born, count, zip] {
            let raw = serde_json::to_string(&field).unwrap();
            let back: FormField = serde_json::from_str(&raw).unwrap();
            assert_eq!(back, field);
        }
    }

    #[test]
    fn test_default_value_read_by_field_type() {
        let field: FormField = serde_json::from_value(json!({
            "id": "n1", "type": "number", "defaultValue": "7"
        }))
        .unwrap();
        assert_eq!(field.default_value, Some(FieldValue::Number(7.0)));

        let field: FormField = serde_json::from_value(json!({
            "id": "t1", "type": "textarea", "defaultValue": 42
        }))
        .unwrap();
        assert_eq!(field.default_value, Some(FieldValue::text("42")));

        let field: FormField = serde_json::from_value(json!({
            "id": "c1", "type": "checkbox", "defaultValue": null
        }))
        .unwrap();
        assert_eq!(field.default_value, None);
    }

    #[test]
    fn test_form_tolerates_missing_optional_attributes() {
        let raw = json!({
            "id": "1712345678901",
            "name": "Signup",
            "fields": [{
                "id": "1712345678902",
                "type": "text",
                "label": "Email",
                "required": true,
                "validationRules": [{"type": "minLength", "value": "3"}],
                "isDerived": false,
                "order": 0
            }],
            "createdAt": "2024-04-05T10:00:00.000Z",
            "updatedAt": "2024-04-05T10:05:00.000Z"
        });

        let form: Form = serde_json::from_value(raw).unwrap();
        assert_eq!(form.id.as_str(), "1712345678901");
        let field = &form.fields[0];
        assert!(field.parent_fields.is_empty());
        assert!(field.options.is_empty());
        assert_eq!(field.placeholder, "");
        assert_eq!(field.derived_formula, None);
        assert_eq!(field.validation_rules[0].kind, RuleKind::MinLength);
        assert_eq!(
            field.validation_rules[0].value,
            Some(RuleParam::Text("3".to_string()))
        );
    }

    #[test]
    fn test_form_serializes_camel_case() {
        let mut form = Form::new();
        form.fields.push(FormField::new(FieldType::Date));
        let value = serde_json::to_value(&form).unwrap();
        assert!(value.get("createdAt").is_some());
        let field = &value["fields"][0];
        assert_eq!(field["type"], "date");
        assert_eq!(field["isDerived"], false);
        assert!(field.get("validationRules").is_some());
        assert!(field.get("parentFields").is_none());
    }

    #[test]
    fn test_renumber_restores_contiguous_order() {
        let mut form = Form::new();
        for _ in 0..3 {
            form.fields.push(FormField::new(FieldType::Text));
        }
        assert!(!form.has_contiguous_order());
        form.renumber();
        assert!(form.has_contiguous_order());
    }
}
