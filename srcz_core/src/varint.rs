//! LEB128 unsigned varints used for header counts, text lengths and codes.

use crate::error::CorruptStreamError;

/// Longest valid encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

pub fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Number of bytes [`write_varint`] emits for `value`.
pub fn varint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Decode a varint at `data[pos..]`, returning the value and bytes consumed.
///
/// `what` names the field for the truncation error.
pub fn read_varint(
    data: &[u8],
    pos: usize,
    what: &'static str,
) -> Result<(u64, usize), CorruptStreamError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    let mut consumed = 0;

    loop {
        let byte = *data
            .get(pos + consumed)
            .ok_or(CorruptStreamError::Truncated { what, offset: pos })?;
        consumed += 1;

        let bits = (byte & 0x7F) as u64;
        // The tenth byte may only carry the single remaining bit.
        if consumed == MAX_VARINT_LEN && bits > 1 {
            return Err(CorruptStreamError::VarintOverflow { offset: pos });
        }
        value |= bits << shift;

        if byte & 0x80 == 0 {
            return Ok((value, consumed));
        }
        if consumed == MAX_VARINT_LEN {
            return Err(CorruptStreamError::VarintOverflow { offset: pos });
        }
        shift += 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_match_encoding() {
        for value in [0u64, 1, 127, 128, 300, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
            let mut buf = Vec::new();
            write_varint(&mut buf, value);
            assert_eq!(buf.len(), varint_len(value), "value {value}");
            assert_eq!(read_varint(&buf, 0, "test"), Ok((value, buf.len())));
        }
    }

    #[test]
    fn known_encodings() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 300);
        assert_eq!(buf, [0xAC, 0x02]);
    }

    #[test]
    fn truncated_varint_is_rejected() {
        let err = read_varint(&[0x80, 0x80], 0, "entry count").unwrap_err();
        assert_eq!(
            err,
            CorruptStreamError::Truncated {
                what: "entry count",
                offset: 0
            }
        );
    }

    #[test]
    fn overlong_varint_is_rejected() {
        let data = [0xFF; 11];
        assert!(matches!(
            read_varint(&data, 0, "test"),
            Err(CorruptStreamError::VarintOverflow { .. })
        ));
        let mut too_big = vec![0xFF; 9];
        too_big.push(0x02);
        assert!(matches!(
            read_varint(&too_big, 0, "test"),
            Err(CorruptStreamError::VarintOverflow { .. })
        ));
    }
}
