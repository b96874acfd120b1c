// Text encodings used by ID3 tags

use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// Character encoding selected by the one-byte marker that leads every
/// ID3v2 text payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Latin1,
    /// UTF-16 with a byte-order mark.
    Utf16,
    /// UTF-16 without a byte-order mark, big-endian.
    Utf16Be,
    Utf8,
}

impl TextEncoding {
    /// Unknown markers fall back to Latin-1, the format's documented
    /// default for untagged strings.
    pub fn from_marker(byte: u8) -> Self {
        match byte {
            1 => TextEncoding::Utf16,
            2 => TextEncoding::Utf16Be,
            3 => TextEncoding::Utf8,
            _ => TextEncoding::Latin1,
        }
    }

    /// Width in bytes of the NUL terminator for strings in this encoding.
    pub fn nul_width(self) -> usize {
        match self {
            TextEncoding::Utf16 | TextEncoding::Utf16Be => 2,
            _ => 1,
        }
    }
}

/// Decode `data` with the given encoding.
///
/// Never fails: invalid sequences are replaced rather than aborting the
/// parse. Trailing NUL padding and surrounding whitespace are stripped.
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    let decoded = match encoding {
        TextEncoding::Latin1 => WINDOWS_1252.decode(data).0,
        TextEncoding::Utf16 => {
            if data.len() >= 2 && data[..2] == [0xFF, 0xFE] {
                UTF_16LE.decode(&data[2..]).0
            } else if data.len() >= 2 && data[..2] == [0xFE, 0xFF] {
                UTF_16BE.decode(&data[2..]).0
            } else {
                // No BOM: big-endian, matching the ID3v2 marker 0x02 case
                UTF_16BE.decode(data).0
            }
        }
        TextEncoding::Utf16Be => UTF_16BE.decode(data).0,
        TextEncoding::Utf8 => UTF_8.decode(data).0,
    };

    decoded.trim_matches('\0').trim().to_string()
}
