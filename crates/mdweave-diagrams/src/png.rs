//! PNG header inspection.

/// Extract width and height from PNG image data.
///
/// PNG format: 8-byte signature, then IHDR chunk with width/height at bytes
/// 16-24 (big-endian). Returns `None` for anything that is not a PNG.
#[must_use]
pub fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 24 || &data[0..8] != b"\x89PNG\r\n\x1a\n" {
        return None;
    }

    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Some((width, height))
}

#[cfg(test)]
pub(crate) fn test_png(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"\x89PNG\r\n\x1a\n");
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[0; 5]);
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_dimensions() {
        assert_eq!(png_dimensions(&test_png(100, 50)), Some((100, 50)));
    }

    #[test]
    fn test_png_dimensions_invalid() {
        assert_eq!(png_dimensions(b"not a png"), None);
        assert_eq!(png_dimensions(b""), None);
    }

    #[test]
    fn test_png_dimensions_truncated() {
        assert_eq!(png_dimensions(b"\x89PNG\r\n\x1a\n"), None);
    }
}
