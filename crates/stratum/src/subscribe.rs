use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Subscribe {
    pub user_agent: String,
    pub notify_id: Option<String>,
}

impl Serialize for Subscribe {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.notify_id.is_some() { 2 } else { 1 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.user_agent)?;
        if let Some(notify_id) = &self.notify_id {
            seq.serialize_element(notify_id)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Subscribe {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let params = Vec::<String>::deserialize(deserializer)?;
        let mut params = params.into_iter();

        let user_agent = params
            .next()
            .ok_or_else(|| de::Error::missing_field("user_agent"))?;
        let notify_id = params.next();

        Ok(Self {
            user_agent,
            notify_id,
        })
    }
}

/// Response to `mining.subscribe`: `[[[method, subscription_id], ...], extranonce1,
/// extranonce2_size]`. The first element's shape is fixed by convention rather than meaningful
/// here (miners never resubscribe to the named channels individually); it is carried to stay
/// wire-compatible with Stratum clients that expect it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscribeResult {
    pub notify_id: String,
    pub extranonce1: String,
    pub extranonce2_size: usize,
}

impl Serialize for SubscribeResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element(&vec![
            ("mining.set_difficulty", self.notify_id.as_str()),
            ("mining.notify", self.notify_id.as_str()),
        ])?;
        seq.serialize_element(&self.extranonce1)?;
        seq.serialize_element(&self.extranonce2_size)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SubscribeResult {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (subscriptions, extranonce1, extranonce2_size): (
            Vec<(String, String)>,
            String,
            usize,
        ) = Deserialize::deserialize(deserializer)?;

        let notify_id = subscriptions
            .into_iter()
            .next()
            .map(|(_, id)| id)
            .unwrap_or_default();

        Ok(Self {
            notify_id,
            extranonce1,
            extranonce2_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_request_roundtrips() {
        let subscribe = Subscribe {
            user_agent: "miner/1.0".into(),
            notify_id: None,
        };
        let json = serde_json::to_string(&subscribe).unwrap();
        let back: Subscribe = serde_json::from_str(&json).unwrap();
        assert_eq!(back, subscribe);
    }

    #[test]
    fn subscribe_result_shape() {
        let result = SubscribeResult {
            notify_id: "mnabcd1234".into(),
            extranonce1: "abcd1234".into(),
            extranonce2_size: 4,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                [
                    ["mining.set_difficulty", "mnabcd1234"],
                    ["mining.notify", "mnabcd1234"]
                ],
                "abcd1234",
                4
            ])
        );
    }
}
