use super::*;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Clone)]
#[serde(untagged)]
pub enum Id {
    Null,
    Number(u64),
    String(String),
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(untagged)]
pub enum Message {
    Request {
        id: Id,
        method: String,
        params: Value,
    },
    Response {
        id: Id,
        result: Option<Value>,
        error: Option<JsonRpcError>,
    },
    Notification {
        method: String,
        params: Value,
    },
}

/// Classifies a raw JSON line into a [`Message`] variant, the way a hand-rolled
/// [`Deserialize`] impl would, but exposed as a free function so the reader can reject
/// unclassifiable input before paying for a full parse.
pub fn identify_message(value: &Value) -> Option<&'static str> {
    let has_method = value.get("method").is_some();
    let has_id = value.get("id").is_some();
    let is_response = value.get("result").is_some() || value.get("error").is_some();

    if is_response && has_id {
        Some("response")
    } else if has_method && (value.get("id").is_none() || value.get("id") == Some(&Value::Null)) {
        Some("notification")
    } else if has_method && has_id {
        Some("request")
    } else {
        None
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        match identify_message(&value) {
            Some("response") => {
                #[derive(Deserialize)]
                struct Resp {
                    id: Id,
                    result: Option<Value>,
                    error: Option<JsonRpcError>,
                }

                let r: Resp = serde_json::from_value(value).map_err(de::Error::custom)?;

                Ok(Message::Response {
                    id: r.id,
                    result: r.result,
                    error: r.error,
                })
            }
            Some("notification") => {
                let method = value
                    .get("method")
                    .and_then(Value::as_str)
                    .ok_or_else(|| de::Error::missing_field("method"))?
                    .to_string();

                let params = value
                    .get("params")
                    .cloned()
                    .ok_or_else(|| de::Error::missing_field("params"))?;

                Ok(Message::Notification { method, params })
            }
            Some("request") => {
                #[derive(Deserialize)]
                struct Req {
                    id: Id,
                    method: String,
                    params: Value,
                }

                let r: Req = serde_json::from_value(value).map_err(de::Error::custom)?;

                Ok(Message::Request {
                    id: r.id,
                    method: r.method,
                    params: r.params,
                })
            }
            _ => Err(de::Error::custom("unknown message format")),
        }
    }
}
