// ID3v2 tag parsing
//
// The tag is a 10-byte header followed by length-prefixed frames. The
// outer tag size is a synch-safe integer (7 bits per byte, so the tag
// never contains a false MPEG sync pattern). Frame sizes are plain
// big-endian u32 through v2.3 and synch-safe from v2.4 on.

use std::fs::File;
use std::io::Read;

use crate::id3::frames::{self, FrameKind};
use crate::id3::genre;
use crate::util::cursor::{TagCursor, Underrun};
use crate::util::encoding::{self, TextEncoding};
use crate::CoverArt;

/// Size in bytes of a frame header: identifier, size field, flags.
const FRAME_HEADER_SIZE: usize = 10;

/// Decoded ID3v2 outer header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3v2Header {
    /// Major version and revision, e.g. `(3, 0)` for ID3v2.3.0.
    pub version: (u8, u8),
    pub flags: u8,
    /// Size of the tag body following this header.
    pub size: u32,
}

impl Id3v2Header {
    pub const SIZE: usize = 10;
    const SIGNATURE: [u8; 3] = *b"ID3";

    /// Parse the 10-byte header. `None` when the signature is absent.
    pub fn parse(buffer: &[u8; 10]) -> Option<Self> {
        if buffer[0..3] != Self::SIGNATURE {
            return None;
        }

        Some(Id3v2Header {
            version: (buffer[3], buffer[4]),
            flags: buffer[5],
            size: synchsafe_u32([buffer[6], buffer[7], buffer[8], buffer[9]]),
        })
    }
}

/// Decode a synch-safe integer: 7 significant bits per byte.
pub fn synchsafe_u32(bytes: [u8; 4]) -> u32 {
    ((bytes[0] as u32 & 0x7F) << 21)
        | ((bytes[1] as u32 & 0x7F) << 14)
        | ((bytes[2] as u32 & 0x7F) << 7)
        | (bytes[3] as u32 & 0x7F)
}

/// Fields collected from an ID3v2 frame walk.
///
/// Frames the reader does not consume are skipped over, never stored.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Id3v2Tag {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub track: Option<String>,
    pub year: Option<String>,
    pub comment: Option<String>,
    pub cover: Option<CoverArt>,
}

impl Id3v2Tag {
    /// Read the tag from the start of `file`.
    ///
    /// Returns `Ok(None)` when no ID3v2 header is present. Only the
    /// declared tag region is buffered; when the size field claims more
    /// bytes than the file holds, the short buffer makes the frame loop
    /// stop at the first underrun.
    pub fn read_from(file: &mut File) -> std::io::Result<Option<Self>> {
        let mut header_bytes = [0u8; Id3v2Header::SIZE];
        if file.read_exact(&mut header_bytes).is_err() {
            return Ok(None);
        }
        let header = match Id3v2Header::parse(&header_bytes) {
            Some(h) => h,
            None => return Ok(None),
        };

        let mut body = Vec::new();
        file.take(header.size as u64).read_to_end(&mut body)?;

        Ok(Some(Self::parse(&header, &body)))
    }

    /// Walk the frames of a tag body.
    ///
    /// The loop ends on exhausted tag bytes, a read underrun, a zero size
    /// field or non-printable identifier bytes (padding). All of these are
    /// normal completion.
    pub fn parse(header: &Id3v2Header, body: &[u8]) -> Self {
        let mut tag = Id3v2Tag::default();
        let mut cursor = TagCursor::new(body);

        while cursor.remaining() >= FRAME_HEADER_SIZE {
            let id = match cursor.read_bytes(4) {
                Ok(bytes) => [bytes[0], bytes[1], bytes[2], bytes[3]],
                Err(Underrun) => break,
            };
            if !frames::is_frame_id(&id) {
                break;
            }

            let size = match read_frame_size(&mut cursor, header.version.0) {
                Ok(size) => size,
                Err(Underrun) => break,
            };
            if size == 0 {
                break;
            }
            cursor.skip(2); // frame flags, unused

            let payload = match cursor.read_bytes(size as usize) {
                Ok(payload) => payload,
                Err(Underrun) => break,
            };

            match frames::kind_for(&id) {
                FrameKind::Title => tag.title = Some(text_payload(payload)),
                FrameKind::Artist => tag.artist = Some(text_payload(payload)),
                FrameKind::Album => tag.album = Some(text_payload(payload)),
                FrameKind::Genre => tag.genre = Some(genre::resolve(&text_payload(payload))),
                FrameKind::Track => tag.track = Some(text_payload(payload)),
                FrameKind::Year => tag.year = Some(text_payload(payload)),
                FrameKind::Comment => tag.comment = comment_payload(payload),
                FrameKind::Picture => tag.cover = picture_payload(payload),
                FrameKind::Skip => {}
            }
        }

        tag
    }
}

/// Per-frame sizes switched to synch-safe encoding in v2.4.
fn read_frame_size(cursor: &mut TagCursor<'_>, major_version: u8) -> Result<u32, Underrun> {
    let bytes = cursor.read_bytes(4)?;
    let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if major_version >= 4 {
        Ok(synchsafe_u32(raw))
    } else {
        Ok(u32::from_be_bytes(raw))
    }
}

/// Text frame: one encoding marker byte, then the encoded string.
fn text_payload(payload: &[u8]) -> String {
    match payload.split_first() {
        Some((&marker, rest)) => encoding::decode_text(rest, TextEncoding::from_marker(marker)),
        None => String::new(),
    }
}

/// COMM frame: encoding marker, 3-byte language code, a NUL-terminated
/// short description, then the comment text.
fn comment_payload(payload: &[u8]) -> Option<String> {
    let mut cursor = TagCursor::new(payload);
    let text_encoding = TextEncoding::from_marker(cursor.read_u8().ok()?);
    cursor.skip(3); // language
    cursor.read_terminated(text_encoding.nul_width()).ok()?;
    let rest = cursor.remaining();
    let text = cursor.read_bytes(rest).ok()?;
    Some(encoding::decode_text(text, text_encoding))
}

/// APIC frame: encoding marker, NUL-terminated Latin-1 MIME type, one
/// picture-type byte, a description terminated per the marker encoding,
/// then the raw image data up to the frame's end.
fn picture_payload(payload: &[u8]) -> Option<CoverArt> {
    let mut cursor = TagCursor::new(payload);
    let text_encoding = TextEncoding::from_marker(cursor.read_u8().ok()?);
    let mime = cursor.read_terminated(1).ok()?;
    let picture_type = cursor.read_u8().ok()?;
    let description = cursor.read_terminated(text_encoding.nul_width()).ok()?;

    let rest = cursor.remaining();
    let data = cursor.read_bytes(rest).ok()?;
    if data.is_empty() {
        return None;
    }

    Some(CoverArt {
        mime_type: encoding::decode_text(mime, TextEncoding::Latin1),
        picture_type,
        description: encoding::decode_text(description, text_encoding),
        data: data.to_vec(),
    })
}
