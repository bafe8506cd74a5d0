use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The current-work hex string handed back by `fetch_current_work`, parsed into its fixed
/// fields per the wire contract in `hexutil`. Held unparsed (`raw`) as well, since `update_work`
/// only needs to patch the ntime field and re-emit the whole string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentWork {
    pub raw: String,
}

impl CurrentWork {
    pub fn new(raw: String) -> Self {
        Self { raw }
    }

    fn field(&self, offset: (usize, usize)) -> &str {
        &self.raw[offset.0..offset.1]
    }

    pub fn version(&self) -> &str {
        self.field(CURRENT_WORK_VERSION_OFFSET)
    }

    pub fn prev_block(&self) -> &str {
        self.field(CURRENT_WORK_PREVBLOCK_OFFSET)
    }

    pub fn gen_tx1(&self) -> &str {
        self.field(CURRENT_WORK_GEN_TX1_OFFSET)
    }

    pub fn nbits(&self) -> &str {
        self.field(CURRENT_WORK_NBITS_OFFSET)
    }

    pub fn ntime(&self) -> &str {
        self.field(CURRENT_WORK_NTIME_OFFSET)
    }

    pub fn gen_tx2(&self) -> &str {
        self.field(CURRENT_WORK_GEN_TX2_OFFSET)
    }

    pub fn height(&self) -> u32 {
        let bytes = Vec::from_hex(self.field(CURRENT_WORK_HEIGHT_OFFSET)).unwrap_or_default();
        if bytes.len() == 4 {
            LittleEndian::read_u32(&bytes)
        } else {
            0
        }
    }

    /// Returns a copy of the work hex with the ntime field replaced by `ntime` (4 raw bytes,
    /// little-endian, per the wire contract), per the spec's `update_work` splice.
    pub fn with_ntime(&self, ntime: u32) -> Self {
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, ntime);
        let hex_ntime = hex::encode(bytes);

        let mut raw = self.raw.clone();
        raw.replace_range(
            CURRENT_WORK_NTIME_OFFSET.0..CURRENT_WORK_NTIME_OFFSET.1,
            &hex_ntime,
        );
        Self { raw }
    }
}

/// A server-assembled work template, bound to a fresh [`JobId`] at `update_work` time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub work: CurrentWork,
    pub height: u32,
}

impl Job {
    pub fn new(work: CurrentWork) -> Self {
        let height = work.height();
        Self {
            id: JobId::new(),
            work,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hex() -> String {
        // 180 bytes = 360 hex chars, zero-filled, with recognizable markers at field starts.
        let mut raw = vec!['0'; 360];
        for (i, c) in "deadbeef".chars().enumerate() {
            raw[CURRENT_WORK_PREVBLOCK_OFFSET.0 + i] = c;
        }
        raw.into_iter().collect()
    }

    #[test]
    fn with_ntime_only_touches_ntime_field() {
        let work = CurrentWork::new(sample_hex());
        let patched = work.with_ntime(0x5f5f5f5f);

        // `ntime` lies inside the `gen_tx1` byte range, so only fields entirely outside it
        // are expected to stay untouched.
        assert_eq!(patched.prev_block(), work.prev_block());
        assert_eq!(patched.version(), work.version());
        assert_eq!(patched.gen_tx2(), work.gen_tx2());
        assert_ne!(patched.ntime(), work.ntime());
        assert_eq!(patched.raw.len(), work.raw.len());
    }

    #[test]
    fn job_id_roundtrips_through_display_and_parse() {
        let id = JobId::new();
        let parsed: JobId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn height_reads_little_endian_u32() {
        let mut raw = vec!['0'; 360];
        let bytes = [0x78, 0x56, 0x34, 0x12];
        let hex_height = hex::encode(bytes);
        raw.splice(
            CURRENT_WORK_HEIGHT_OFFSET.0..CURRENT_WORK_HEIGHT_OFFSET.1,
            hex_height.chars(),
        );
        let work = CurrentWork::new(raw.into_iter().collect());
        assert_eq!(work.height(), 0x12345678);
    }
}
