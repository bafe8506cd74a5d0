use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Submit {
    pub workername: String,
    pub job_id: JobId,
    pub extranonce2: Extranonce,
    pub ntime: String,
    pub nonce: String,
}

impl Serialize for Submit {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(5))?;
        seq.serialize_element(&self.workername)?;
        seq.serialize_element(&self.job_id)?;
        seq.serialize_element(&self.extranonce2)?;
        seq.serialize_element(&self.ntime)?;
        seq.serialize_element(&self.nonce)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Submit {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (workername, job_id, extranonce2, ntime, nonce) =
            <(String, JobId, Extranonce, String, String)>::deserialize(deserializer)?;

        Ok(Self {
            workername,
            job_id,
            extranonce2,
            ntime,
            nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let submit = Submit {
            workername: "rig1.worker1".into(),
            job_id: JobId::new(),
            extranonce2: "00000001".parse().unwrap(),
            ntime: "504e86ed".into(),
            nonce: "b2957c02".into(),
        };
        let json = serde_json::to_string(&submit).unwrap();
        let back: Submit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, submit);
    }
}
