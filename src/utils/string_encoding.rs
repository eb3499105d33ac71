// src/utils/string_encoding.rs

/// Decode a fixed-width text slot: stop at the first NUL, drop trailing
/// spaces, replace invalid UTF-8.
pub fn decode_padded_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}

/// Encode `text` into a NUL-padded slot of `width` bytes, truncating if needed
pub fn encode_padded_text(text: &str, width: usize) -> Vec<u8> {
    let mut slot = vec![0u8; width];
    let len = text.len().min(width);
    slot[..len].copy_from_slice(&text.as_bytes()[..len]);
    slot
}
