//! Board configuration and its validator.
//!
//! A board is configured with a JSON object, usually the body of a fenced
//! code block in a note. [`validate`] turns that text into an immutable
//! [`BoardConfig`] or a [`ConfigError`] that names every offending field.

use chrono::{DateTime, Months, TimeDelta, Utc};
use fmk_core::{ConfigError, FieldViolation};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::column::UNASSIGNED_COLUMN_ID;

/// Configuration shown next to a parse error so users can copy a working board.
pub const SAMPLE_CONFIG: &str = r##"{
  "frontmatterAttribute": "status",
  "columns": ["todo", "doing", "done"],
  "cardOrigin": "tasks",
  "columnWidth": "300px",
  "defaultColumnName": "Backlog",
  "defaultColor": "#FFAA00",
  "additionalProperties": [{"property": "priority", "color": "#FF0000"}],
  "filter": { "lastUpdated": {"amount": -7, "unit": "days"} }
}"##;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    #[serde(rename = "frontmatterAttribute")]
    pub attribute_key: String,
    pub columns: Vec<String>,
    #[serde(rename = "cardOrigin")]
    pub record_origin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_column_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Vec<AdditionalProperty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSpec>,
}

/// Extra front matter property shown as a colored label on each card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdditionalProperty {
    pub property: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<LastUpdated>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_filters: Option<Vec<PropertyFilter>>,
}

/// Relative cutoff: "now shifted by `amount` `unit`".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LastUpdated {
    pub amount: f64,
    pub unit: TimeUnit,
}

impl LastUpdated {
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.unit.shift(now, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Quarters,
    Years,
}

impl TimeUnit {
    /// Shift `from` by `amount` units. Calendar units round to whole months.
    pub fn shift(self, from: DateTime<Utc>, amount: f64) -> Option<DateTime<Utc>> {
        let millis_per_unit: i64 = match self {
            Self::Milliseconds => 1,
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
            Self::Days => 86_400_000,
            Self::Weeks => 604_800_000,
            Self::Months => return shift_months(from, amount),
            Self::Quarters => return shift_months(from, amount * 3.0),
            Self::Years => return shift_months(from, amount * 12.0),
        };
        let delta = TimeDelta::try_milliseconds((amount * millis_per_unit as f64).round() as i64)?;
        from.checked_add_signed(delta)
    }
}

fn shift_months(from: DateTime<Utc>, months: f64) -> Option<DateTime<Utc>> {
    let months = months.round();
    let magnitude = u32::try_from(months.abs() as i64).ok()?;
    if months >= 0.0 {
        from.checked_add_months(Months::new(magnitude))
    } else {
        from.checked_sub_months(Months::new(magnitude))
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Short forms are case sensitive: "M" is months, "m" is minutes
        match s {
            "ms" => return Ok(Self::Milliseconds),
            "s" => return Ok(Self::Seconds),
            "m" => return Ok(Self::Minutes),
            "h" => return Ok(Self::Hours),
            "d" => return Ok(Self::Days),
            "w" => return Ok(Self::Weeks),
            "M" => return Ok(Self::Months),
            "Q" => return Ok(Self::Quarters),
            "y" => return Ok(Self::Years),
            _ => {}
        }
        match s.to_ascii_lowercase().as_str() {
            "millisecond" | "milliseconds" => Ok(Self::Milliseconds),
            "second" | "seconds" => Ok(Self::Seconds),
            "minute" | "minutes" => Ok(Self::Minutes),
            "hour" | "hours" => Ok(Self::Hours),
            "day" | "days" => Ok(Self::Days),
            "week" | "weeks" => Ok(Self::Weeks),
            "month" | "months" => Ok(Self::Months),
            "quarter" | "quarters" => Ok(Self::Quarters),
            "year" | "years" => Ok(Self::Years),
            _ => Err(format!("unknown time unit '{}'", s)),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Milliseconds => "milliseconds",
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Quarters => "quarters",
            Self::Years => "years",
        };
        f.write_str(name)
    }
}

pub fn is_hex_color(value: &str) -> bool {
    static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
    HEX_COLOR
        .get_or_init(|| {
            Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
        })
        .is_match(value)
}

/// Parse and validate raw board configuration text.
///
/// Pure: no I/O, no logging. Optional fields that are missing (or `null`)
/// come back as `None`.
pub fn validate(raw: &str) -> Result<BoardConfig, ConfigError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| ConfigError::Malformed {
        message: e.to_string(),
    })?;

    let Value::Object(object) = value else {
        return Err(ConfigError::SchemaViolation {
            violations: vec![FieldViolation::new("$", "expected a JSON object")],
        });
    };

    let mut v = Validator::default();

    let attribute_key = v.required_string(&object, "frontmatterAttribute");
    if attribute_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
        v.violation("frontmatterAttribute", "must not be empty");
    }
    let columns = v.columns(&object);
    let record_origin = v.required_string(&object, "cardOrigin");
    let column_width = v.optional_string(&object, "columnWidth");
    let column_height = v.optional_string(&object, "columnHeight");
    let default_column_name = v.optional_string(&object, "defaultColumnName");
    let default_color = v.optional_string(&object, "defaultColor");
    if let Some(color) = &default_color {
        if !is_hex_color(color) {
            v.violation("defaultColor", format!("'{}' is not a hex color", color));
        }
    }
    let additional_properties = v.additional_properties(&object);
    let filter = v.filter(&object);

    if !v.violations.is_empty() {
        return Err(ConfigError::SchemaViolation {
            violations: v.violations,
        });
    }

    match (attribute_key, columns, record_origin) {
        (Some(attribute_key), Some(columns), Some(record_origin)) => Ok(BoardConfig {
            attribute_key,
            columns,
            record_origin,
            column_width,
            column_height,
            default_column_name,
            default_color,
            additional_properties,
            filter,
        }),
        // Every missing required field has already been reported
        _ => Err(ConfigError::SchemaViolation {
            violations: vec![FieldViolation::new("$", "missing required fields")],
        }),
    }
}

#[derive(Default)]
struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    fn violation(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    fn required_string(&mut self, object: &Map<String, Value>, key: &str) -> Option<String> {
        match object.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            None | Some(Value::Null) => {
                self.violation(key, "is required");
                None
            }
            Some(other) => {
                self.violation(key, format!("expected a string, found {}", type_name(other)));
                None
            }
        }
    }

    fn optional_string(&mut self, object: &Map<String, Value>, key: &str) -> Option<String> {
        self.optional_string_at(object, key, key)
    }

    fn optional_string_at(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        field: &str,
    ) -> Option<String> {
        match object.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            None | Some(Value::Null) => None,
            Some(other) => {
                self.violation(field, format!("expected a string, found {}", type_name(other)));
                None
            }
        }
    }

    fn columns(&mut self, object: &Map<String, Value>) -> Option<Vec<String>> {
        let items = match object.get("columns") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => {
                self.violation("columns", "is required");
                return None;
            }
            Some(other) => {
                self.violation(
                    "columns",
                    format!("expected an array of strings, found {}", type_name(other)),
                );
                return None;
            }
        };

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(items.len());
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            let field = format!("columns[{}]", index);
            match item {
                Value::String(name) if name == UNASSIGNED_COLUMN_ID => {
                    self.violation(
                        field,
                        format!("'{}' is reserved for tasks outside every column", name),
                    );
                    valid = false;
                }
                Value::String(name) if !seen.insert(name.as_str()) => {
                    self.violation(field, format!("duplicate column '{}'", name));
                    valid = false;
                }
                Value::String(name) => columns.push(name.clone()),
                other => {
                    self.violation(field, format!("expected a string, found {}", type_name(other)));
                    valid = false;
                }
            }
        }
        valid.then_some(columns)
    }

    fn additional_properties(
        &mut self,
        object: &Map<String, Value>,
    ) -> Option<Vec<AdditionalProperty>> {
        let items = self.optional_array(object, "additionalProperties", "additionalProperties")?;

        let mut properties = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let field = format!("additionalProperties[{}]", index);
            let Value::Object(entry) = item else {
                self.violation(field, format!("expected an object, found {}", type_name(item)));
                continue;
            };
            let property = self.required_string_at(entry, "property", &format!("{field}.property"));
            let color_field = format!("{field}.color");
            let color = self.optional_string_at(entry, "color", &color_field);
            if let Some(color) = &color {
                if !is_hex_color(color) {
                    self.violation(color_field, format!("'{}' is not a hex color", color));
                }
            }
            if let Some(property) = property {
                properties.push(AdditionalProperty { property, color });
            }
        }
        Some(properties)
    }

    fn filter(&mut self, object: &Map<String, Value>) -> Option<FilterSpec> {
        let filter = match object.get("filter") {
            Some(Value::Object(filter)) => filter,
            None | Some(Value::Null) => return None,
            Some(other) => {
                self.violation("filter", format!("expected an object, found {}", type_name(other)));
                return None;
            }
        };

        let last_updated = match filter.get("lastUpdated") {
            Some(Value::Object(last_updated)) => self.last_updated(last_updated),
            None | Some(Value::Null) => None,
            Some(other) => {
                self.violation(
                    "filter.lastUpdated",
                    format!("expected an object, found {}", type_name(other)),
                );
                None
            }
        };

        let property_filters = self
            .optional_array(filter, "propertyFilters", "filter.propertyFilters")
            .map(|items| {
                items
                    .iter()
                    .enumerate()
                    .filter_map(|(index, item)| self.property_filter(index, item))
                    .collect()
            });

        Some(FilterSpec {
            last_updated,
            property_filters,
        })
    }

    fn last_updated(&mut self, object: &Map<String, Value>) -> Option<LastUpdated> {
        let amount = match object.get("amount") {
            Some(Value::Number(n)) => n.as_f64(),
            None | Some(Value::Null) => {
                self.violation("filter.lastUpdated.amount", "is required");
                None
            }
            Some(other) => {
                self.violation(
                    "filter.lastUpdated.amount",
                    format!("expected a number, found {}", type_name(other)),
                );
                None
            }
        };
        let unit = self
            .required_string_at(object, "unit", "filter.lastUpdated.unit")
            .and_then(|unit| match unit.parse::<TimeUnit>() {
                Ok(unit) => Some(unit),
                Err(message) => {
                    self.violation("filter.lastUpdated.unit", message);
                    None
                }
            });
        Some(LastUpdated {
            amount: amount?,
            unit: unit?,
        })
    }

    fn property_filter(&mut self, index: usize, item: &Value) -> Option<PropertyFilter> {
        let field = format!("filter.propertyFilters[{}]", index);
        let Value::Object(entry) = item else {
            self.violation(field, format!("expected an object, found {}", type_name(item)));
            return None;
        };
        let property = self.required_string_at(entry, "property", &format!("{field}.property"));
        let value = match entry.get("value") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            None | Some(Value::Null) => {
                self.violation(format!("{field}.value"), "is required");
                None
            }
            Some(other) => {
                self.violation(
                    format!("{field}.value"),
                    format!("expected a scalar, found {}", type_name(other)),
                );
                None
            }
        };
        Some(PropertyFilter {
            property: property?,
            value: value?,
        })
    }

    fn required_string_at(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        field: &str,
    ) -> Option<String> {
        match object.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            None | Some(Value::Null) => {
                self.violation(field, "is required");
                None
            }
            Some(other) => {
                self.violation(field, format!("expected a string, found {}", type_name(other)));
                None
            }
        }
    }

    fn optional_array<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        key: &str,
        field: &str,
    ) -> Option<&'a Vec<Value>> {
        match object.get(key) {
            Some(Value::Array(items)) => Some(items),
            None | Some(Value::Null) => None,
            Some(other) => {
                self.violation(field, format!("expected an array, found {}", type_name(other)));
                None
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
