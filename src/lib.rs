// minim - a lightweight audio metadata reader
//
// Decodes ID3v1 and ID3v2 tags into a uniform AudioMetadata record. A
// file with no readable tag still yields a record with placeholder values
// and its path intact, so batch scans are never aborted by one bad file.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub mod id3;

mod error;
mod util;

pub use error::Error;

use id3::{genre, Id3v1Tag, Id3v2Tag};

/// Tag family a file carries, decided from its leading 3 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagVersion {
    /// ID3v1, the fixed 128-byte trailer.
    Legacy,
    /// ID3v2, the frame-based header.
    Frame,
    Unsupported,
}

impl TagVersion {
    /// Pure signature check: `"ID3"` means a frame tag, anything else is
    /// assumed to be legacy-tagged (the format's only other defined
    /// representation). Fewer than 3 bytes cannot be classified.
    pub fn detect(leading: &[u8]) -> Self {
        if leading.len() < 3 {
            TagVersion::Unsupported
        } else if &leading[0..3] == b"ID3" {
            TagVersion::Frame
        } else {
            TagVersion::Legacy
        }
    }
}

impl std::fmt::Display for TagVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagVersion::Legacy => write!(f, "ID3v1"),
            TagVersion::Frame => write!(f, "ID3v2"),
            TagVersion::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Embedded cover art extracted from an APIC frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverArt {
    pub mime_type: String,
    pub picture_type: u8,
    pub description: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl CoverArt {
    /// File extension matching the MIME type, for exported images.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            _ => "jpg",
        }
    }

    /// Write the raw image bytes to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.data)
    }
}

/// Metadata extracted from one audio file.
///
/// Every field is always populated; absent tag data falls back to the
/// `"Unknown ..."` / zero defaults instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub track: u32,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<CoverArt>,
    /// Path of the originating file, carried through unchanged.
    pub source_path: PathBuf,
}

/// Fields a format parser managed to extract. [`Reader`] fills in the
/// defaults for whatever is missing.
#[derive(Debug, Default, Clone)]
pub struct TagFields {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub track: Option<String>,
    pub year: Option<String>,
    pub cover: Option<CoverArt>,
}

impl TagFields {
    fn into_metadata(self, path: &Path) -> AudioMetadata {
        AudioMetadata {
            title: self.title.unwrap_or_else(|| "Unknown Title".to_string()),
            artist: self.artist.unwrap_or_else(|| "Unknown Artist".to_string()),
            album: self.album.unwrap_or_else(|| "Unknown Album".to_string()),
            genre: self.genre.unwrap_or_else(|| "Unknown Genre".to_string()),
            track: self.track.as_deref().map(parse_track).unwrap_or(0),
            year: self.year.as_deref().map(parse_year).unwrap_or(0),
            cover: self.cover,
            source_path: path.to_path_buf(),
        }
    }
}

/// Parser entry for one tag family. The registry owned by [`Reader`] maps
/// a detected [`TagVersion`] to one of these.
pub type ParseFn = fn(&mut File) -> std::io::Result<TagFields>;

/// The metadata reader.
///
/// Holds a registry of signature-dispatched tag parsers; ID3v1 and ID3v2
/// are registered by default. Each [`read`](Reader::read) call owns its
/// own file handle and buffers, so one reader can serve many threads.
#[derive(Debug, Clone)]
pub struct Reader {
    formats: Vec<(TagVersion, ParseFn)>,
}

impl Default for Reader {
    fn default() -> Self {
        Reader {
            formats: vec![
                (TagVersion::Frame, parse_frame_tag),
                (TagVersion::Legacy, parse_legacy_tag),
            ],
        }
    }
}

impl Reader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parser for a tag family, replacing any existing entry.
    pub fn register(&mut self, version: TagVersion, parse: ParseFn) {
        self.formats.retain(|(v, _)| *v != version);
        self.formats.push((version, parse));
    }

    /// Tag family of the file at `path`, from its content alone.
    pub fn detect(&self, path: impl AsRef<Path>) -> Result<TagVersion, Error> {
        let mut file = File::open(path.as_ref())?;
        Ok(detect_version(&mut file)?)
    }

    /// Read the metadata of the file at `path`.
    ///
    /// Fails with [`Error::UnsupportedFormat`] when the file matches no
    /// registered tag family, and with [`Error::Io`] when it cannot be
    /// read at all. Absent or malformed tag data is not an error: the
    /// returned record carries default values.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<AudioMetadata, Error> {
        let path = path.as_ref();
        let mut file = File::open(path)?;

        let version = detect_version(&mut file)?;
        let parse = self
            .formats
            .iter()
            .find(|(v, _)| *v == version)
            .map(|(_, parse)| *parse)
            .ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;

        let fields = parse(&mut file)?;
        Ok(fields.into_metadata(path))
    }
}

/// Read the metadata of a single file with the default parser registry.
pub fn read(path: impl AsRef<Path>) -> Result<AudioMetadata, Error> {
    Reader::new().read(path)
}

fn detect_version(file: &mut File) -> std::io::Result<TagVersion> {
    let mut leading = [0u8; 3];
    let mut filled = 0;
    while filled < leading.len() {
        let n = file.read(&mut leading[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(TagVersion::detect(&leading[..filled]))
}

/// ID3v1: last 128 bytes of the file.
fn parse_legacy_tag(file: &mut File) -> std::io::Result<TagFields> {
    let tag = match Id3v1Tag::read_from(file)? {
        Some(tag) => tag,
        None => return Ok(TagFields::default()),
    };

    Ok(TagFields {
        title: non_empty(tag.title),
        artist: non_empty(tag.artist),
        album: non_empty(tag.album),
        genre: genre::name_for(tag.genre_code).map(str::to_string),
        track: tag.track.map(|t| t.to_string()),
        year: non_empty(tag.year),
        cover: None,
    })
}

/// ID3v2: frame walk over the header-declared tag region. The reader is
/// positioned right after the 3 signature bytes, so rewind first.
fn parse_frame_tag(file: &mut File) -> std::io::Result<TagFields> {
    use std::io::{Seek, SeekFrom};
    file.seek(SeekFrom::Start(0))?;

    let tag = match Id3v2Tag::read_from(file)? {
        Some(tag) => tag,
        None => return Ok(TagFields::default()),
    };

    Ok(TagFields {
        title: tag.title.and_then(non_empty),
        artist: tag.artist.and_then(non_empty),
        album: tag.album.and_then(non_empty),
        genre: tag.genre.and_then(non_empty),
        track: tag.track.and_then(non_empty),
        year: tag.year.and_then(non_empty),
        cover: tag.cover,
    })
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Track text like `"3"` or `"3/12"`; non-numeric input means track 0.
fn parse_track(text: &str) -> u32 {
    text.split('/')
        .next()
        .and_then(|part| part.trim().parse().ok())
        .unwrap_or(0)
}

/// Year text like `"1975"` or a v2.4 timestamp like `"2024-01-15"`;
/// non-numeric input means year 0.
fn parse_year(text: &str) -> i32 {
    let digits: String = text.trim().chars().take(4).collect();
    digits.parse().unwrap_or(0)
}
