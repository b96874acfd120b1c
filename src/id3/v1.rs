// ID3v1 tag parsing
//
// The tag is a fixed 128-byte trailer of concatenated fixed-width fields,
// all Latin-1. A missing "TAG" signature means the tag is absent, which
// is not an error.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use crate::util::encoding::{self, TextEncoding};

/// Decoded ID3v1 tag.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    /// ID3v1.1 track number, when the comment field carries one.
    pub track: Option<u8>,
    /// Raw genre code, resolved through the genre table by the caller.
    pub genre_code: u8,
}

impl Id3v1Tag {
    pub const SIZE: usize = 128;
    const SIGNATURE: [u8; 3] = *b"TAG";

    /// Read the trailing 128 bytes of `file` and parse them.
    ///
    /// Returns `Ok(None)` when the file is too short to hold a tag or the
    /// signature is absent.
    pub fn read_from(file: &mut File) -> std::io::Result<Option<Self>> {
        let file_size = file.metadata()?.len();
        if file_size < Self::SIZE as u64 {
            return Ok(None);
        }

        file.seek(SeekFrom::End(-(Self::SIZE as i64)))?;
        let mut buffer = [0u8; Self::SIZE];
        file.read_exact(&mut buffer)?;

        Ok(Self::parse(&buffer))
    }

    /// Parse a 128-byte tag buffer. `None` when the signature is absent.
    pub fn parse(buffer: &[u8; 128]) -> Option<Self> {
        if buffer[0..3] != Self::SIGNATURE {
            return None;
        }

        let title = field_text(&buffer[3..33]);
        let artist = field_text(&buffer[33..63]);
        let album = field_text(&buffer[63..93]);
        let year = field_text(&buffer[93..97]);

        // ID3v1.1: a zeroed byte 28 of the comment field marks byte 29 as
        // the track number
        let (comment, track) = if buffer[125] == 0 && buffer[126] != 0 {
            (field_text(&buffer[97..125]), Some(buffer[126]))
        } else {
            (field_text(&buffer[97..127]), None)
        };

        let genre_code = buffer[127];

        Some(Id3v1Tag {
            title,
            artist,
            album,
            year,
            comment,
            track,
            genre_code,
        })
    }
}

/// Decode a fixed-width Latin-1 field, cut at the first NUL and trimmed.
fn field_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    encoding::decode_text(&bytes[..end], TextEncoding::Latin1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_buffer(
        title: &str,
        artist: &str,
        album: &str,
        year: &str,
        comment: &str,
        genre: u8,
    ) -> [u8; 128] {
        let mut buffer = [0u8; 128];
        buffer[0..3].copy_from_slice(b"TAG");
        buffer[3..3 + title.len()].copy_from_slice(title.as_bytes());
        buffer[33..33 + artist.len()].copy_from_slice(artist.as_bytes());
        buffer[63..63 + album.len()].copy_from_slice(album.as_bytes());
        buffer[93..93 + year.len()].copy_from_slice(year.as_bytes());
        buffer[97..97 + comment.len()].copy_from_slice(comment.as_bytes());
        buffer[127] = genre;
        buffer
    }

    #[test]
    fn test_fixed_offsets() {
        let buffer = tag_buffer("Title", "Artist", "Album", "1999", "a comment", 17);
        let tag = Id3v1Tag::parse(&buffer).unwrap();
        assert_eq!(tag.title, "Title");
        assert_eq!(tag.artist, "Artist");
        assert_eq!(tag.album, "Album");
        assert_eq!(tag.year, "1999");
        assert_eq!(tag.comment, "a comment");
        assert_eq!(tag.genre_code, 17);
        assert_eq!(tag.track, None);
    }

    #[test]
    fn test_padding_independence() {
        // NUL padding and space padding decode to the same trimmed text
        let nul_padded = tag_buffer("Song", "", "", "", "", 0);
        let mut space_padded = nul_padded;
        for b in &mut space_padded[7..33] {
            *b = b' ';
        }
        let a = Id3v1Tag::parse(&nul_padded).unwrap();
        let b = Id3v1Tag::parse(&space_padded).unwrap();
        assert_eq!(a.title, "Song");
        assert_eq!(a.title, b.title);
    }

    #[test]
    fn test_v1_1_track_number() {
        let mut buffer = tag_buffer("T", "A", "B", "2001", "", 1);
        buffer[125] = 0;
        buffer[126] = 7;
        let tag = Id3v1Tag::parse(&buffer).unwrap();
        assert_eq!(tag.track, Some(7));
    }

    #[test]
    fn test_missing_signature() {
        let mut buffer = tag_buffer("Title", "", "", "", "", 0);
        buffer[0..3].copy_from_slice(b"XXX");
        assert_eq!(Id3v1Tag::parse(&buffer), None);
    }

    #[test]
    fn test_latin1_field() {
        let mut buffer = tag_buffer("", "", "", "", "", 0);
        buffer[3..7].copy_from_slice(&[b'C', b'a', b'f', 0xE9]);
        let tag = Id3v1Tag::parse(&buffer).unwrap();
        assert_eq!(tag.title, "Café");
    }
}
