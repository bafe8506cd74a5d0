use super::*;

/// Block header hash, Blake256 over the raw header bytes (Decred-style proof of work), reduced
/// to a big-endian unsigned integer for target comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockHash([u8; 32]);

impl Display for BlockHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl BlockHash {
    pub fn compute(header: &[u8]) -> Self {
        use blake_hash::Digest;
        let digest = blake_hash::Blake256::digest(header);
        Self(digest.into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Interprets the hash as a big-endian integer for comparison against a target.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }
}
