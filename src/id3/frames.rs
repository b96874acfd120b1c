// ID3v2 frame identifiers and dispatch

/// What the reader does with a frame, keyed by its 4-character identifier.
///
/// Every identifier not in the table maps to `Skip`, so unknown or
/// unhandled frames never abort a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Title,
    Artist,
    Album,
    Genre,
    Track,
    Year,
    Comment,
    Picture,
    Skip,
}

/// Map a frame identifier to its handler.
pub fn kind_for(id: &[u8; 4]) -> FrameKind {
    match id {
        b"TIT2" => FrameKind::Title,
        b"TPE1" => FrameKind::Artist,
        b"TALB" => FrameKind::Album,
        b"TCON" => FrameKind::Genre,
        b"TRCK" => FrameKind::Track,
        // TYER is the v2.3 year frame, TDRC its v2.4 replacement
        b"TYER" | b"TDRC" => FrameKind::Year,
        b"COMM" => FrameKind::Comment,
        b"APIC" => FrameKind::Picture,
        _ => FrameKind::Skip,
    }
}

/// Frame identifiers are uppercase ASCII letters and digits; anything
/// else means the loop has run into padding or corruption.
pub fn is_frame_id(id: &[u8; 4]) -> bool {
    id.iter()
        .all(|&b| b.is_ascii_uppercase() || b.is_ascii_digit())
}
