//! Digest encoding.

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Encode bytes as lowercase hex, two characters per byte.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        out.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
        out.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty() {
        assert_eq!(hex_encode(&[]), "");
    }

    #[test]
    fn test_encode_matches_hex_crate() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(hex_encode(&bytes), hex::encode(&bytes));
    }

    #[test]
    fn test_encode_pads_low_nibbles() {
        assert_eq!(hex_encode(&[0x00, 0x0a, 0xf0, 0xff]), "000af0ff");
    }
}
