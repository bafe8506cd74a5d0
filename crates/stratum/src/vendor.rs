use super::*;

/// Hardware variants with protocol quirks this pool accommodates on the outgoing wire, per
/// §4.3/§4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MinerVariant {
    #[display("cpu")]
    Cpu,
    #[display("antminer-dr3")]
    AntminerDR3,
    #[display("antminer-dr5")]
    AntminerDR5,
    #[display("innosilicon-d9")]
    InnosiliconD9,
    #[display("whatsminer-d1")]
    WhatsminerD1,
}

impl MinerVariant {
    /// `(extranonce1, extranonce2_size)` shaping returned from `mining.subscribe`, per §4.3.
    pub fn subscribe_shape(self, extranonce1: &str, extranonce2_size: usize) -> (String, usize) {
        match self {
            MinerVariant::AntminerDR3 | MinerVariant::AntminerDR5 => {
                (format!("{}{extranonce1}", "0".repeat(16)), 8)
            }
            MinerVariant::WhatsminerD1 => {
                (format!("{}{extranonce1}", "0".repeat(8)), extranonce2_size)
            }
            MinerVariant::Cpu | MinerVariant::InnosiliconD9 => {
                (extranonce1.to_string(), extranonce2_size)
            }
        }
    }

    fn reverses_prev_block(self) -> bool {
        !matches!(self, MinerVariant::Cpu)
    }

    fn flips_nbits_endianness(self) -> bool {
        matches!(
            self,
            MinerVariant::AntminerDR3 | MinerVariant::AntminerDR5 | MinerVariant::InnosiliconD9
        )
    }

    fn flips_ntime_endianness(self) -> bool {
        self.flips_nbits_endianness()
    }

    /// Rewrites a `Notify` payload for this variant's expectations, per the §4.4 table.
    pub fn rewrite_notify(self, notify: &mut Notify) -> std::result::Result<(), HexUtilError> {
        if self.reverses_prev_block() {
            notify.prevhash = reverse_prev_block_words(&notify.prevhash)?;
        }
        if self.flips_nbits_endianness() {
            notify.nbits = hex_reversed(&notify.nbits)?;
        }
        if self.flips_ntime_endianness() {
            notify.ntime = hex_reversed(&notify.ntime)?;
        }
        Ok(())
    }

    /// Relative weight applied to a pool-accepted share's credit, indexed by `ShareWeights[miner]`
    /// per §3/§4.3/S5. Approximates each ASIC family's hash power relative to a nominal CPU
    /// baseline of 1, so a device that finds shares faster is credited proportionally more per
    /// share rather than diluting a CPU miner's payout share.
    pub fn share_weight(self) -> BigRational {
        let weight = match self {
            MinerVariant::Cpu => 1,
            MinerVariant::InnosiliconD9 => 3,
            MinerVariant::AntminerDR3 => 8,
            MinerVariant::AntminerDR5 => 35,
            MinerVariant::WhatsminerD1 => 48,
        };
        BigRational::from_integer(weight.into())
    }
}
