// src/ros_interface/rosapi.rs
// Parameter access and schema queries built on the rosapi services.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{Bridge, RequestId, RosError};
use crate::core::status::MessageConstants;

/// Names of the rosapi services used by the console
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RosapiServices {
    /// Parameter read
    pub get_param: String,
    /// Parameter write
    pub set_param: String,
    /// Message schema query
    pub message_details: String,
}

impl Default for RosapiServices {
    fn default() -> Self {
        RosapiServices {
            get_param: "/rosapi/get_param".to_string(),
            set_param: "/rosapi/set_param".to_string(),
            message_details: "/rosapi/message_details".to_string(),
        }
    }
}

impl RosapiServices {
    /// Ask for the value of parameter `name`; an unset parameter yields the
    /// empty default
    pub fn get_param(&self, bridge: &mut dyn Bridge, name: &str) -> Result<RequestId, RosError> {
        bridge.call_service(&self.get_param, json!({ "name": name, "default": "" }))
    }

    /// Set parameter `name`. The reply carries nothing useful and is ignored.
    pub fn set_param(
        &self,
        bridge: &mut dyn Bridge,
        name: &str,
        value: &Value,
    ) -> Result<RequestId, RosError> {
        let encoded = serde_json::to_string(value)?;
        bridge.call_service(&self.set_param, json!({ "name": name, "value": encoded }))
    }

    /// Ask for the type definitions (including constants) of `msg_type`
    pub fn message_details(
        &self,
        bridge: &mut dyn Bridge,
        msg_type: &str,
    ) -> Result<RequestId, RosError> {
        bridge.call_service(&self.message_details, json!({ "type": msg_type }))
    }
}

#[derive(Deserialize)]
struct GetParamResponse {
    #[serde(default)]
    value: String,
}

/// Decode a get_param reply. Parameter values travel as JSON text. An unset
/// parameter comes back as the encoded default (`""`), as `null`, or as an
/// empty string, and all of these decode to `None`.
pub fn parse_param_value(values: &Value) -> Result<Option<Value>, RosError> {
    let response: GetParamResponse = super::decode(values)?;
    if response.value.is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(&response.value)?;
    match &value {
        Value::Null => Ok(None),
        Value::String(text) if text.is_empty() => Ok(None),
        _ => Ok(Some(value)),
    }
}

#[derive(Deserialize)]
struct TypeDef {
    #[serde(default)]
    constnames: Vec<String>,
    #[serde(default)]
    constvalues: Vec<String>,
}

#[derive(Deserialize)]
struct MessageDetailsResponse {
    typedefs: Vec<TypeDef>,
}

/// Decode the constants of the top-level type of a message_details reply.
/// Values that are not integers are skipped.
pub fn parse_message_constants(values: &Value) -> Result<MessageConstants, RosError> {
    let response: MessageDetailsResponse = super::decode(values)?;
    let typedef = response
        .typedefs
        .first()
        .ok_or_else(|| RosError::ConversionError("message_details returned no typedefs".to_string()))?;

    let mut constants = MessageConstants::new();
    for (name, value) in typedef.constnames.iter().zip(typedef.constvalues.iter()) {
        match value.trim().parse::<i64>() {
            Ok(parsed) => {
                constants.insert(name.clone(), parsed);
            }
            Err(_) => log::debug!("Skipping non-integer constant {}={}", name, value),
        }
    }
    Ok(constants)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_param_is_none() {
        assert!(parse_param_value(&json!({"value": ""})).unwrap().is_none());
    }

    #[test]
    fn encoded_default_is_none() {
        assert!(parse_param_value(&json!({"value": "\"\""})).unwrap().is_none());
        assert!(parse_param_value(&json!({"value": "null"})).unwrap().is_none());
    }

    #[test]
    fn param_value_is_json_text() {
        let value = parse_param_value(&json!({"value": "12"})).unwrap();
        assert_eq!(value, Some(json!(12)));
    }

    #[test]
    fn constants_are_zipped() {
        let reply = json!({"typedefs": [{
            "type": "am_driver/SensorStatus",
            "constnames": ["SENSOR_STATUS_CHARGING", "NAME"],
            "constvalues": ["4", "abc"],
        }]});
        let constants = parse_message_constants(&reply).unwrap();
        assert_eq!(constants.get("SENSOR_STATUS_CHARGING"), Some(&4));
        assert!(!constants.contains_key("NAME"));
    }
}
