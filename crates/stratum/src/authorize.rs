use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Authorize {
    pub username: String,
    pub password: Option<String>,
}

impl Serialize for Authorize {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.password.is_some() { 2 } else { 1 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.username)?;
        if let Some(password) = &self.password {
            seq.serialize_element(password)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Authorize {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let params = Vec::<String>::deserialize(deserializer)?;
        let mut params = params.into_iter();

        let username = params.next().ok_or_else(|| de::Error::missing_field("username"))?;
        let password = params.next();

        Ok(Self { username, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_tuple_array() {
        let authorize = Authorize {
            username: "slush.miner1".into(),
            password: Some("password".into()),
        };
        let value = serde_json::to_value(&authorize).unwrap();
        assert_eq!(value, serde_json::json!(["slush.miner1", "password"]));
    }

    #[test]
    fn password_is_optional() {
        let json = r#"["slush.miner1"]"#;
        let authorize: Authorize = serde_json::from_str(json).unwrap();
        assert_eq!(authorize.username, "slush.miner1");
        assert_eq!(authorize.password, None);
    }
}
