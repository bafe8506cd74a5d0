use super::*;

/// Pool and network difficulty/target state for one connection, as an arbitrary-precision
/// rational rather than a fixed-width integer, so the target/difficulty relationship
/// `difficulty = pow_limit / target` is always exact instead of scaled-and-rounded.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyInfo {
    pub difficulty: BigRational,
    pub target: BigRational,
    pub pow_limit: BigRational,
}

impl DifficultyInfo {
    pub fn from_difficulty(difficulty: BigRational, pow_limit: BigRational) -> Self {
        let target = &pow_limit / &difficulty;
        Self {
            difficulty,
            target,
            pow_limit,
        }
    }

    pub fn from_target(target: BigRational, pow_limit: BigRational) -> Self {
        let difficulty = &pow_limit / &target;
        Self {
            difficulty,
            target,
            pow_limit,
        }
    }
}

/// Serializes like the teacher's `Difficulty`: as an integer when >= 1, a float otherwise.
pub fn serialize_rational<S: Serializer>(
    value: &BigRational,
    ser: S,
) -> std::result::Result<S::Ok, S::Error> {
    use num_rational::BigRational as R;
    use num_traits::{One, ToPrimitive};

    if value >= &R::one() {
        match value.to_integer().to_u64() {
            Some(i) => ser.serialize_u64(i),
            None => ser.serialize_f64(value.to_f64().unwrap_or(f64::MAX)),
        }
    } else {
        ser.serialize_f64(value.to_f64().unwrap_or(0.0))
    }
}

/// Expands compact `nbits` (4 bytes, big-endian as transmitted) into a full target, the way
/// Bitcoin-family consensus rules do, but built directly on `num-bigint` instead of depending on
/// the `bitcoin` crate for a single conversion this system otherwise has no use for.
pub fn compact_to_target(nbits: u32) -> BigUint {
    let exponent = nbits >> 24;
    let mantissa = nbits & 0x007f_ffff;

    let mantissa = BigUint::from(mantissa);

    if exponent <= 3 {
        mantissa >> (8 * (3 - exponent))
    } else {
        mantissa << (8 * (exponent - 3))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, num_traits::ToPrimitive};

    #[test]
    fn difficulty_from_target_is_inverse_of_target_from_difficulty() {
        let pow_limit = BigRational::from_integer(BigUint::from(1u32 << 30).into());
        let difficulty = BigRational::from_integer(4u32.into());
        let info = DifficultyInfo::from_difficulty(difficulty.clone(), pow_limit.clone());
        assert_eq!(info.difficulty, difficulty);
        assert_eq!(&info.pow_limit / &info.target, difficulty);
    }

    #[test]
    fn compact_to_target_matches_known_mainnet_genesis_bits() {
        // 0x1d00ffff expands to the well known genesis target.
        let target = compact_to_target(0x1d00ffff);
        assert_eq!(
            target.to_str_radix(16),
            "ffff0000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn compact_to_target_handles_small_exponent() {
        let target = compact_to_target(0x01003456);
        assert_eq!(target.to_u64(), Some(0x00));
    }
}
