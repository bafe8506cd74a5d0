use super::*;

/// Outgoing `mining.notify` payload. Unlike the teacher's Bitcoin-specific `Notify`, this
/// system has no merkle tree to rebuild: the work template already names a single fixed
/// coinbase split into `coinb1`/`coinb2`, so `merkle_branches` is always empty but kept on the
/// wire for compatibility with Stratum clients that expect the field.
#[derive(Debug, PartialEq, Clone)]
pub struct Notify {
    pub job_id: JobId,
    pub prevhash: String,
    pub coinb1: String,
    pub coinb2: String,
    pub merkle_branches: Vec<String>,
    pub version: String,
    pub nbits: String,
    pub ntime: String,
    pub clean_jobs: bool,
}

impl Notify {
    pub fn from_job(job: &Job, clean_jobs: bool) -> Self {
        Self {
            job_id: job.id,
            prevhash: job.work.prev_block().to_string(),
            coinb1: job.work.gen_tx1().to_string(),
            coinb2: job.work.gen_tx2().to_string(),
            merkle_branches: Vec::new(),
            version: job.work.version().to_string(),
            nbits: job.work.nbits().to_string(),
            ntime: job.work.ntime().to_string(),
            clean_jobs,
        }
    }
}

impl Serialize for Notify {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(9))?;
        seq.serialize_element(&self.job_id)?;
        seq.serialize_element(&self.prevhash)?;
        seq.serialize_element(&self.coinb1)?;
        seq.serialize_element(&self.coinb2)?;
        seq.serialize_element(&self.merkle_branches)?;
        seq.serialize_element(&self.version)?;
        seq.serialize_element(&self.nbits)?;
        seq.serialize_element(&self.ntime)?;
        seq.serialize_element(&self.clean_jobs)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Notify {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (job_id, prevhash, coinb1, coinb2, merkle_branches, version, nbits, ntime, clean_jobs) =
            <(
                JobId,
                String,
                String,
                String,
                Vec<String>,
                String,
                String,
                String,
                bool,
            )>::deserialize(deserializer)?;

        Ok(Notify {
            job_id,
            prevhash,
            coinb1,
            coinb2,
            merkle_branches,
            version,
            nbits,
            ntime,
            clean_jobs,
        })
    }
}
