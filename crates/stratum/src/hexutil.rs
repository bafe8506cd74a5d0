use super::*;

/// Fixed field offsets (in hex characters) within the pre-assembled current-work hex string
/// that `update_work` splices and slices. These are a wire contract, not magic numbers.
pub const CURRENT_WORK_VERSION_OFFSET: (usize, usize) = (0, 8);
pub const CURRENT_WORK_PREVBLOCK_OFFSET: (usize, usize) = (8, 72);
pub const CURRENT_WORK_GEN_TX1_OFFSET: (usize, usize) = (72, 288);
pub const CURRENT_WORK_NBITS_OFFSET: (usize, usize) = (232, 240);
pub const CURRENT_WORK_HEIGHT_OFFSET: (usize, usize) = (256, 264);
pub const CURRENT_WORK_NTIME_OFFSET: (usize, usize) = (272, 280);
pub const CURRENT_WORK_GEN_TX2_OFFSET: (usize, usize) = (352, 360);

/// The gap between `gen_tx1` and `gen_tx2` (hex 288..352, 32 bytes) is where a submission's
/// extranonce1, extranonce2 and nonce are spliced to assemble the solved header, per §4.3.
pub const SPLICE_EXTRANONCE1_OFFSET: (usize, usize) = (288, 296);
pub const SPLICE_EXTRANONCE2_OFFSET: (usize, usize) = (296, 304);
pub const SPLICE_NONCE_OFFSET: (usize, usize) = (304, 312);

/// Reverses the byte sequence of a hex string (pairs of hex chars), used for vendor variants
/// that expect a fully big/little-endian-swapped field.
pub fn hex_reversed(hex: &str) -> std::result::Result<String, HexUtilError> {
    if !hex.len().is_multiple_of(2) {
        return Err(HexUtilError::OddLength);
    }

    let bytes = Vec::from_hex(hex).map_err(|_| HexUtilError::InvalidHex)?;
    Ok(hex::encode(bytes.iter().rev().copied().collect::<Vec<u8>>()))
}

/// Reverses byte order within each 32-bit (8 hex char) word of a hex string, leaving word order
/// unchanged. Used for vendor variants that byte-swap each word of the previous-block hash but
/// keep the words themselves in place.
pub fn reverse_prev_block_words(hex: &str) -> std::result::Result<String, HexUtilError> {
    if !hex.len().is_multiple_of(8) {
        return Err(HexUtilError::NotWordAligned);
    }

    let mut out = String::with_capacity(hex.len());
    for word in hex.as_bytes().chunks(8) {
        let word = std::str::from_utf8(word).unwrap();
        let bytes = Vec::from_hex(word).map_err(|_| HexUtilError::InvalidHex)?;
        out.push_str(&hex::encode(bytes.iter().rev().copied().collect::<Vec<u8>>()));
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum HexUtilError {
    #[snafu(display("hex string has odd length"))]
    OddLength,
    #[snafu(display("hex string is not 32-bit word aligned"))]
    NotWordAligned,
    #[snafu(display("invalid hex string"))]
    InvalidHex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_reversed_is_involution() {
        let h = "4d16b6f85af6e2198f44ae2a6de67f78487ae5611b77c6c0440b921e00000000";
        let once = hex_reversed(h).unwrap();
        let twice = hex_reversed(&once).unwrap();
        assert_eq!(twice, h);
    }

    #[test]
    fn hex_reversed_rejects_odd_length() {
        assert_eq!(hex_reversed("abc"), Err(HexUtilError::OddLength));
    }

    #[test]
    fn reverse_prev_block_words_is_involution() {
        let h = "0123456789abcdef00000000deadbeef";
        let h = &h[..32];
        let once = reverse_prev_block_words(h).unwrap();
        let twice = reverse_prev_block_words(&once).unwrap();
        assert_eq!(twice, h);
    }

    #[test]
    fn reverse_prev_block_words_reverses_each_word_independently() {
        let h = "0000000100000002";
        let reversed = reverse_prev_block_words(h).unwrap();
        assert_eq!(reversed, "0100000002000000");
    }
}
