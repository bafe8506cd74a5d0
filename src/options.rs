use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    Cpu,
    AntminerDr3,
    AntminerDr5,
    InnosiliconD9,
    WhatsminerD1,
}

impl From<Variant> for MinerVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Cpu => MinerVariant::Cpu,
            Variant::AntminerDr3 => MinerVariant::AntminerDR3,
            Variant::AntminerDr5 => MinerVariant::AntminerDR5,
            Variant::InnosiliconD9 => MinerVariant::InnosiliconD9,
            Variant::WhatsminerD1 => MinerVariant::WhatsminerD1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Net {
    Mainnet,
    Testnet,
}

impl From<Net> for ActiveNet {
    fn from(net: Net) -> Self {
        match net {
            Net::Mainnet => ActiveNet::Mainnet,
            Net::Testnet => ActiveNet::Testnet,
        }
    }
}

#[derive(Clone, Debug, Parser)]
pub struct Options {
    #[arg(long, default_value = "0.0.0.0", help = "Listen on <ADDRESS>.")]
    pub address: String,

    #[arg(long, default_value_t = 3333, help = "Listen on <PORT>.")]
    pub port: u16,

    #[arg(
        long,
        help = "Run in solo mode: authorize is by worker name only, no account lookup or share crediting."
    )]
    pub solo: bool,

    #[arg(
        long,
        default_value_t = 1,
        help = "Initial per-connection pool difficulty."
    )]
    pub start_difficulty: u64,

    #[arg(
        long,
        default_value = "00000000ffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        help = "Network proof-of-work limit, as a 64-character big-endian hex target."
    )]
    pub pow_limit: String,

    #[arg(
        long,
        default_value_t = 20,
        help = "Hash-rate sampling period in seconds; also the fixed divisor in the hash-rate formula."
    )]
    pub hash_calc_threshold: u64,

    #[arg(
        long,
        default_value_t = 1u64 << 32,
        help = "Expected header evaluations per nonce-space traversal."
    )]
    pub nonce_iterations: u64,

    #[arg(
        long,
        default_value = "",
        help = "Fixed padding appended to a solved header before hex-encoding for upstream submission."
    )]
    pub blake256_pad: String,

    #[arg(
        long,
        value_enum,
        default_value_t = Variant::Cpu,
        help = "Fallback miner variant the store reports for connections it has not otherwise identified."
    )]
    pub default_variant: Variant,

    #[arg(
        long,
        value_enum,
        default_value_t = Net::Mainnet,
        help = "Network parameters consulted when deriving a pool-mode account id from an address."
    )]
    pub active_net: Net,

    #[arg(
        long,
        default_value_t = 240,
        help = "Seconds of inbound silence before a connection is dropped as idle."
    )]
    pub read_timeout_secs: u64,

    #[arg(
        long,
        default_value_t = 10,
        help = "Maximum inbound requests per IP per rate-limit window."
    )]
    pub rate_limit_count: u32,

    #[arg(
        long,
        default_value_t = 1,
        help = "Rate-limit window length in seconds."
    )]
    pub rate_limit_window_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let options = Options::try_parse_from(["stratum-pool"]).unwrap();
        assert_eq!(options.port, 3333);
        assert!(!options.solo);
        assert_eq!(options.default_variant, Variant::Cpu);
    }

    #[test]
    fn parses_listen_address_and_port() {
        let options =
            Options::try_parse_from(["stratum-pool", "--address", "127.0.0.1", "--port", "4444"])
                .unwrap();
        assert_eq!(options.address, "127.0.0.1");
        assert_eq!(options.port, 4444);
    }

    #[test]
    fn parses_solo_and_variant() {
        let options = Options::try_parse_from([
            "stratum-pool",
            "--solo",
            "--default-variant",
            "whatsminer-d1",
        ])
        .unwrap();
        assert!(options.solo);
        assert_eq!(options.default_variant, Variant::WhatsminerD1);
    }
}
