use super::*;

/// Validated, runtime-ready configuration derived from [`Options`]. Kept distinct from
/// `Options` so that parsing/validation failures surface as one place (construction) rather than
/// scattered through the accept loop, the same split the teacher's own `Settings` makes from its
/// `PoolOptions`/`ProxyOptions`.
#[derive(Debug, Clone)]
pub struct Settings {
    address: String,
    port: u16,
    solo: bool,
    start_difficulty: BigRational,
    pow_limit: BigRational,
    hash_calc_threshold: u64,
    nonce_iterations: u64,
    blake256_pad: Vec<u8>,
    default_variant: MinerVariant,
    active_net: ActiveNet,
    read_timeout: Duration,
    rate_limit_count: u32,
    rate_limit_window: Duration,
}

impl Settings {
    pub fn from_options(options: Options) -> Result<Self> {
        let pow_limit_bytes =
            Vec::from_hex(&options.pow_limit).context("--pow-limit must be hex")?;
        let pow_limit = BigRational::from_integer(BigUint::from_bytes_be(&pow_limit_bytes).into());

        let blake256_pad =
            Vec::from_hex(&options.blake256_pad).context("--blake256-pad must be hex")?;

        ensure!(options.start_difficulty > 0, "--start-difficulty must be positive");
        ensure!(options.hash_calc_threshold > 0, "--hash-calc-threshold must be positive");
        ensure!(options.rate_limit_count > 0, "--rate-limit-count must be positive");

        Ok(Self {
            address: options.address,
            port: options.port,
            solo: options.solo,
            start_difficulty: BigRational::from_integer(options.start_difficulty.into()),
            pow_limit,
            hash_calc_threshold: options.hash_calc_threshold,
            nonce_iterations: options.nonce_iterations,
            blake256_pad,
            default_variant: options.default_variant.into(),
            active_net: options.active_net.into(),
            read_timeout: Duration::from_secs(options.read_timeout_secs),
            rate_limit_count: options.rate_limit_count,
            rate_limit_window: Duration::from_secs(options.rate_limit_window_secs),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn solo(&self) -> bool {
        self.solo
    }

    pub fn default_variant(&self) -> MinerVariant {
        self.default_variant
    }

    pub fn rate_limit(&self) -> (u32, Duration) {
        (self.rate_limit_count, self.rate_limit_window)
    }

    pub fn start_difficulty(&self) -> DifficultyInfo {
        DifficultyInfo::from_difficulty(self.start_difficulty.clone(), self.pow_limit.clone())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            read_timeout: self.read_timeout,
            hash_calc_threshold: self.hash_calc_threshold,
            nonce_iterations: self.nonce_iterations,
            blake256_pad: self.blake256_pad.clone(),
            pow_limit: self.pow_limit.clone(),
            solo_pool: self.solo,
            active_net: self.active_net,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Options {
        Options::try_parse_from(["stratum-pool"]).unwrap()
    }

    #[test]
    fn rejects_non_hex_pow_limit() {
        let mut options = options();
        options.pow_limit = "not hex".into();
        assert!(Settings::from_options(options).is_err());
    }

    #[test]
    fn rejects_zero_start_difficulty() {
        let mut options = options();
        options.start_difficulty = 0;
        assert!(Settings::from_options(options).is_err());
    }

    #[test]
    fn builds_client_config_from_solo_flag() {
        let mut options = options();
        options.solo = true;
        let settings = Settings::from_options(options).unwrap();
        assert!(settings.client_config().solo_pool);
    }
}
