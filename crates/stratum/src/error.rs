use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub const UNKNOWN: i32 = 20;
    pub const JOB_NOT_FOUND: i32 = 21;
    pub const DUPLICATE_SHARE: i32 = 22;
    pub const LOW_DIFFICULTY_SHARE: i32 = 23;
    pub const UNAUTHORIZED_WORKER: i32 = 24;
    pub const NOT_SUBSCRIBED: i32 = 25;

    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN, "Other/Unknown")
    }

    pub fn job_not_found() -> Self {
        Self::new(Self::JOB_NOT_FOUND, "Job not found")
    }

    pub fn duplicate_share() -> Self {
        Self::new(Self::DUPLICATE_SHARE, "Duplicate share")
    }

    pub fn low_difficulty_share() -> Self {
        Self::new(Self::LOW_DIFFICULTY_SHARE, "Low difficulty share")
    }

    pub fn unauthorized_worker() -> Self {
        Self::new(Self::UNAUTHORIZED_WORKER, "Unauthorized worker")
    }

    pub fn not_subscribed() -> Self {
        Self::new(Self::NOT_SUBSCRIBED, "Not subscribed")
    }

    fn new(code: i32, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            data: None,
        }
    }
}

impl Serialize for JsonRpcError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.code, &self.message, &self.data).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JsonRpcError {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (code, message, data) = <(i32, String, Option<Value>)>::deserialize(deserializer)?;
        Ok(Self {
            code,
            message,
            data,
        })
    }
}

impl Display for JsonRpcError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "stratum error {}: {}", self.code, self.message)
    }
}

/// Wire-level error, the shape every `StratumError`-carrying response boils down to.
pub type StratumError = JsonRpcError;
