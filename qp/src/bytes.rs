//! Hex formatting of byte buffers.
//!
//! ```
//! use qp::bytes::HexBytes;
//!
//! let data = [2u8, 3, 4, 5, 6, 7, 8, 9, 10, 11];
//! assert_eq!(HexBytes::new(&data).to_string(), "0203040506070809 0a0b");
//! ```

use std::fmt;

use crate::constants::{HEX_GROUP_BYTES, HEX_ROW_BYTES};

/// Bytes as one hex run, with a space every 8 bytes.
#[derive(Debug, Clone, Copy)]
pub struct HexBytes<'a>(&'a [u8]);

impl<'a> HexBytes<'a> {
    /// Wrap anything that views as bytes.
    #[must_use]
    pub fn new<T: AsRef<[u8]> + ?Sized>(bytes: &'a T) -> Self {
        Self(bytes.as_ref())
    }
}

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 && i % HEX_GROUP_BYTES == 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Bytes as a multi-line dump: a header, then 16 bytes per row.
///
/// ```text
/// DUMP 20 bytes from 0x7ffd5c0e1a10:
/// DUMP +0000:  00 01 02 03 04 05 06 07  08 09 0a 0b 0c 0d 0e 0f
/// DUMP +0010:  10 11 12 13
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HexBlock<'a>(&'a [u8]);

impl<'a> HexBlock<'a> {
    /// Wrap anything that views as bytes.
    #[must_use]
    pub fn new<T: AsRef<[u8]> + ?Sized>(bytes: &'a T) -> Self {
        Self(bytes.as_ref())
    }

    fn write_rows(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.0.chunks(HEX_ROW_BYTES).enumerate() {
            write!(f, "\nDUMP +{:04x}:", row * HEX_ROW_BYTES)?;
            for (i, byte) in chunk.iter().enumerate() {
                if i % HEX_GROUP_BYTES == 0 {
                    f.write_str(" ")?;
                }
                write!(f, " {byte:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for HexBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DUMP {} bytes from {:p}:", self.0.len(), self.0.as_ptr())?;
        self.write_rows(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_bytes_groups() {
        let data: Vec<u8> = (0..18).collect();
        assert_eq!(
            HexBytes::new(&data).to_string(),
            "0001020304050607 08090a0b0c0d0e0f 1011"
        );
        assert_eq!(HexBytes::new(&[0xffu8; 8]).to_string(), "ffffffffffffffff");
        assert_eq!(HexBytes::new(b"").to_string(), "");
    }

    #[test]
    fn test_hex_block_rows() {
        let data: Vec<u8> = (0..20).collect();
        let text = HexBlock::new(&data).to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("DUMP 20 bytes from 0x"));
        assert!(lines[0].ends_with(':'));
        assert_eq!(
            lines[1],
            "DUMP +0000:  00 01 02 03 04 05 06 07  08 09 0a 0b 0c 0d 0e 0f"
        );
        assert_eq!(lines[2], "DUMP +0010:  10 11 12 13");
    }

    #[test]
    fn test_hex_block_empty() {
        let text = HexBlock::new(b"").to_string();
        assert!(text.starts_with("DUMP 0 bytes from "));
        assert_eq!(text.lines().count(), 1);
    }
}
