// src/utils/endian.rs
use crate::error::{ResDumpError, Result};
use crate::types::Endian;
use byteorder::{BigEndian, ByteOrder, LittleEndian};

pub const DWORD_SIZE: usize = 4;

/// Read the dword at `offset`, failing if it runs past the end of `bytes`
pub fn read_dword(bytes: &[u8], offset: usize, endian: Endian) -> Result<u32> {
    let end = offset
        .checked_add(DWORD_SIZE)
        .filter(|end| *end <= bytes.len())
        .ok_or_else(|| {
            ResDumpError::truncated(offset, DWORD_SIZE, bytes.len().saturating_sub(offset))
        })?;

    let word = &bytes[offset..end];
    Ok(match endian {
        Endian::Little => LittleEndian::read_u32(word),
        Endian::Big => BigEndian::read_u32(word),
    })
}

pub fn write_dword(buf: &mut [u8], endian: Endian, value: u32) {
    match endian {
        Endian::Little => LittleEndian::write_u32(buf, value),
        Endian::Big => BigEndian::write_u32(buf, value),
    }
}

#[inline]
pub fn low_word(dword: u32) -> u16 {
    (dword & 0xFFFF) as u16
}

#[inline]
pub fn high_word(dword: u32) -> u16 {
    (dword >> 16) as u16
}

#[inline]
pub fn bit(dword: u32, index: u32) -> bool {
    dword & (1 << index) != 0
}

/// Reverse the bytes of every dword in place
pub fn swap_dword_bytes(data: &mut [u8]) {
    for chunk in data.chunks_exact_mut(DWORD_SIZE) {
        chunk.reverse();
    }
}

/// Text fields are packed big-endian inside each dword. In a little-endian
/// buffer every dword is reversed, so restore reading order before decoding.
/// The operation is its own inverse and is also used when encoding.
pub fn text_bytes_in_order(raw: &[u8], endian: Endian) -> Vec<u8> {
    let mut bytes = raw.to_vec();
    if !endian.is_big_endian() {
        swap_dword_bytes(&mut bytes);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_dword_both_orders() {
        let bytes = [0x07, 0x00, 0x00, 0x00];
        assert_eq!(read_dword(&bytes, 0, Endian::Little).unwrap(), 7);
        assert_eq!(read_dword(&bytes, 0, Endian::Big).unwrap(), 0x0700_0000);
    }

    #[test]
    fn test_read_dword_past_end() {
        let bytes = [0u8; 6];
        let err = read_dword(&bytes, 4, Endian::Little).unwrap_err();
        assert!(matches!(
            err,
            ResDumpError::TruncatedBuffer { offset: 4, needed: 4, available: 2 }
        ));
        assert!(read_dword(&bytes, usize::MAX, Endian::Big).is_err());
    }

    #[test]
    fn test_word_split() {
        let dword = 0xFFFF_0003;
        assert_eq!(high_word(dword), 0xFFFF);
        assert_eq!(low_word(dword), 3);
        assert!(bit(0b100, 2));
        assert!(!bit(0b100, 1));
    }

    #[test]
    fn test_text_order_correction() {
        let packed = *b" daB gsm";
        assert_eq!(text_bytes_in_order(&packed, Endian::Little), b"Bad msg ".to_vec());
        assert_eq!(text_bytes_in_order(&packed, Endian::Big), packed.to_vec());
    }
}
