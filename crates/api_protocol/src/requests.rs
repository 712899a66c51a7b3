//! Request types.

use entities::{NewTask, TaskUpdate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{ValidationError, ValidationResult};

/// Returns false for the values a client may send to mean "nothing": null,
/// false, zero and the empty string.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Converts a truthy scalar into column text.
fn text(field: &'static str, value: &Value) -> ValidationResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ValidationError::invalid(field, "a string")),
    }
}

fn integer(field: &'static str, value: &Value) -> ValidationResult<i32> {
    let parsed = match value {
        Value::Number(n) => match n.as_i64() {
            Some(n) => i32::try_from(n).ok(),
            None => n.as_f64().and_then(whole_i32),
        },
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::invalid(field, "an integer"))
}

/// JSON does not tell `1` from `1.0`; a float without a fractional part is
/// still an integer.
fn whole_i32(n: f64) -> Option<i32> {
    let in_range = (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&n);
    (n.fract() == 0.0 && in_range).then_some(n as i32)
}

/// Keeps an explicit `null` distinguishable from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// ============================================================================
// Task Requests
// ============================================================================

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub priority: Option<Value>,
    #[serde(default)]
    pub mode: Option<Value>,
    #[serde(default)]
    pub deviceid: Option<Value>,
}

impl CreateTaskRequest {
    /// Validates the body into an insert payload.
    ///
    /// All four fields must be present and truthy. Whether priority and mode
    /// hold allowed values is decided by storage.
    pub fn validate(&self) -> ValidationResult<NewTask> {
        let required = |value: &Option<Value>| value.as_ref().filter(|v| is_truthy(v)).cloned();

        let (Some(description), Some(priority), Some(mode), Some(deviceid)) = (
            required(&self.description),
            required(&self.priority),
            required(&self.mode),
            required(&self.deviceid),
        ) else {
            return Err(ValidationError::MissingRequiredFields);
        };

        Ok(NewTask::new(
            text("description", &description)?,
            text("priority", &priority)?,
            text("mode", &mode)?,
            integer("deviceid", &deviceid)?,
        ))
    }
}

/// Body of `PUT /api/tasks/:id`.
///
/// Keys other than the three updatable columns are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub mode: Option<Value>,
}

impl UpdateTaskRequest {
    /// Returns true if none of the updatable fields were sent.
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.priority.is_none() && self.mode.is_none()
    }

    /// Validates the body into a partial update. Every field that was sent
    /// must be truthy.
    pub fn validate(&self) -> ValidationResult<TaskUpdate> {
        let mut update = TaskUpdate::new();
        if let Some(value) = &self.description {
            update = update.with_description(updatable("description", value)?);
        }
        if let Some(value) = &self.priority {
            update = update.with_priority(updatable("priority", value)?);
        }
        if let Some(value) = &self.mode {
            update = update.with_mode(updatable("mode", value)?);
        }
        Ok(update)
    }
}

fn updatable(field: &'static str, value: &Value) -> ValidationResult<String> {
    if !is_truthy(value) {
        return Err(ValidationError::EmptyField(field));
    }
    text(field, value)
}

/// Query string of `GET /api/tasks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTasksQuery {
    #[serde(rename = "deviceId", default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl ListTasksQuery {
    /// Parses the device filter, if one was given.
    pub fn device_id(&self) -> ValidationResult<Option<i32>> {
        self.device_id
            .as_deref()
            .map(|raw| {
                raw.parse()
                    .map_err(|_| ValidationError::invalid("deviceId", "an integer"))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn create(body: Value) -> CreateTaskRequest {
        serde_json::from_value(body).unwrap()
    }

    fn update(body: Value) -> UpdateTaskRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(3)));
        assert!(is_truthy(&json!(true)));
    }

    #[test]
    fn test_create_valid() {
        let task = create(json!({
            "description": "Lubricate chain",
            "priority": "IMPORTANT",
            "mode": "Open",
            "deviceid": 2
        }))
        .validate()
        .unwrap();

        assert_eq!(task, NewTask::new("Lubricate chain", "important", "open", 2));
    }

    #[test]
    fn test_create_accepts_numeric_string_device() {
        let task = create(json!({
            "description": "d",
            "priority": "slight",
            "mode": "open",
            "deviceid": "7"
        }))
        .validate()
        .unwrap();

        assert_eq!(task.deviceid, 7);
    }

    #[test]
    fn test_create_missing_or_falsy_fields() {
        let complete = json!({
            "description": "d",
            "priority": "slight",
            "mode": "open",
            "deviceid": 1
        });

        for field in ["description", "priority", "mode", "deviceid"] {
            let mut missing = complete.clone();
            missing.as_object_mut().unwrap().remove(field);
            assert_eq!(
                create(missing).validate(),
                Err(ValidationError::MissingRequiredFields),
                "missing {field}"
            );
        }

        let mut zero_device = complete.clone();
        zero_device["deviceid"] = json!(0);
        assert_eq!(
            create(zero_device).validate(),
            Err(ValidationError::MissingRequiredFields)
        );

        let mut empty_description = complete;
        empty_description["description"] = json!("");
        assert_eq!(
            create(empty_description).validate(),
            Err(ValidationError::MissingRequiredFields)
        );
    }

    #[test]
    fn test_create_accepts_whole_float_device() {
        let task = create(json!({
            "description": "d",
            "priority": "slight",
            "mode": "open",
            "deviceid": 1.0
        }))
        .validate()
        .unwrap();

        assert_eq!(task.deviceid, 1);
    }

    #[test]
    fn test_create_rejects_fractional_or_out_of_range_device() {
        for deviceid in [json!(1.5), json!(1e12), json!(-3_000_000_000i64)] {
            let err = create(json!({
                "description": "d",
                "priority": "slight",
                "mode": "open",
                "deviceid": deviceid
            }))
            .validate()
            .unwrap_err();

            assert_eq!(err, ValidationError::invalid("deviceid", "an integer"));
        }
    }

    #[test]
    fn test_create_rejects_non_integer_device() {
        let err = create(json!({
            "description": "d",
            "priority": "slight",
            "mode": "open",
            "deviceid": "abc"
        }))
        .validate()
        .unwrap_err();

        assert_eq!(err, ValidationError::invalid("deviceid", "an integer"));
    }

    #[test]
    fn test_update_ignores_unknown_keys() {
        let request = update(json!({ "deviceid": 5, "entry_date": "2020-01-01" }));
        assert!(request.is_empty());
    }

    #[test]
    fn test_update_subset() {
        let request = update(json!({ "mode": "DONE", "color": "red" }));
        assert!(!request.is_empty());
        assert_eq!(request.validate().unwrap(), TaskUpdate::new().with_mode("done"));
    }

    #[test]
    fn test_update_empty_values_name_the_field() {
        assert_eq!(
            update(json!({ "mode": "" })).validate(),
            Err(ValidationError::EmptyField("mode"))
        );
        assert_eq!(
            update(json!({ "description": "ok", "priority": null })).validate(),
            Err(ValidationError::EmptyField("priority"))
        );
    }

    #[test]
    fn test_list_query_device_id() {
        let absent = ListTasksQuery::default();
        assert_eq!(absent.device_id(), Ok(None));

        let valid = ListTasksQuery {
            device_id: Some("12".to_string()),
        };
        assert_eq!(valid.device_id(), Ok(Some(12)));

        let invalid = ListTasksQuery {
            device_id: Some("twelve".to_string()),
        };
        assert_eq!(
            invalid.device_id(),
            Err(ValidationError::invalid("deviceId", "an integer"))
        );
    }
}
