// End-to-end tests against synthetic tagged files on disk

use std::fs;
use std::path::PathBuf;

use minim::{Error, Reader, TagVersion};
use tempfile::TempDir;

const FAKE_AUDIO: &[u8] = &[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x11, 0x22, 0x33];

fn write_file(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path
}

fn v1_field(text: &str, width: usize) -> Vec<u8> {
    let mut field = text.as_bytes().to_vec();
    assert!(field.len() <= width);
    field.resize(width, 0);
    field
}

fn v1_file(title: &str, artist: &str, album: &str, year: &str, comment: &str, genre: u8) -> Vec<u8> {
    let mut data = FAKE_AUDIO.to_vec();
    data.extend_from_slice(&[0u8; 256]);
    data.extend_from_slice(b"TAG");
    data.extend(v1_field(title, 30));
    data.extend(v1_field(artist, 30));
    data.extend(v1_field(album, 30));
    data.extend(v1_field(year, 4));
    data.extend(v1_field(comment, 30));
    data.push(genre);
    data
}

fn synchsafe(n: u32) -> [u8; 4] {
    [
        ((n >> 21) & 0x7F) as u8,
        ((n >> 14) & 0x7F) as u8,
        ((n >> 7) & 0x7F) as u8,
        (n & 0x7F) as u8,
    ]
}

fn v2_text_frame(id: &[u8; 4], text: &str) -> Vec<u8> {
    let mut payload = vec![0u8]; // Latin-1 marker
    payload.extend_from_slice(text.as_bytes());
    v2_frame(id, &payload)
}

fn v2_frame(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(id);
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&[0, 0]);
    frame.extend_from_slice(payload);
    frame
}

fn v2_file(frames: &[Vec<u8>], padding: usize) -> Vec<u8> {
    let mut body = Vec::new();
    for frame in frames {
        body.extend_from_slice(frame);
    }
    body.extend(std::iter::repeat(0u8).take(padding));

    let mut data = Vec::new();
    data.extend_from_slice(b"ID3");
    data.extend_from_slice(&[3, 0, 0]); // v2.3.0, no flags
    data.extend_from_slice(&synchsafe(body.len() as u32));
    data.extend_from_slice(&body);
    data.extend_from_slice(FAKE_AUDIO);
    data
}

#[test]
fn legacy_tag_full_record() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "bohemian.mp3",
        &v1_file(
            "Bohemian Rhapsody",
            "Queen",
            "A Night at the Opera",
            "1975",
            "",
            17,
        ),
    );

    let metadata = minim::read(&path).unwrap();
    assert_eq!(metadata.title, "Bohemian Rhapsody");
    assert_eq!(metadata.artist, "Queen");
    assert_eq!(metadata.album, "A Night at the Opera");
    assert_eq!(metadata.year, 1975);
    assert_eq!(metadata.genre, "Rock");
    assert_eq!(metadata.track, 0);
    assert_eq!(metadata.cover, None);
    assert_eq!(metadata.source_path, path);
}

#[test]
fn frame_tag_with_picture() {
    let image: Vec<u8> = (0u8..=255).cycle().take(600).collect();
    let mut apic = vec![0u8]; // Latin-1 marker
    apic.extend_from_slice(b"image/jpeg\0");
    apic.push(3); // front cover
    apic.extend_from_slice(b"cover\0");
    apic.extend_from_slice(&image);

    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "framed.mp3",
        &v2_file(
            &[
                v2_text_frame(b"TIT2", "Paranoid Android"),
                v2_text_frame(b"TPE1", "Radiohead"),
                v2_text_frame(b"TALB", "OK Computer"),
                v2_text_frame(b"TRCK", "2/12"),
                v2_text_frame(b"TYER", "1997"),
                v2_text_frame(b"TCON", "Alternative"),
                v2_frame(b"APIC", &apic),
            ],
            32,
        ),
    );

    let metadata = minim::read(&path).unwrap();
    assert_eq!(metadata.title, "Paranoid Android");
    assert_eq!(metadata.artist, "Radiohead");
    assert_eq!(metadata.album, "OK Computer");
    assert_eq!(metadata.track, 2);
    assert_eq!(metadata.year, 1997);
    assert_eq!(metadata.genre, "Alternative");

    let cover = metadata.cover.expect("cover art present");
    assert_eq!(cover.mime_type, "image/jpeg");
    assert_eq!(cover.description, "cover");
    assert_eq!(cover.data, image);
}

#[test]
fn read_is_idempotent() {
    let image = vec![0x89, b'P', b'N', b'G', 1, 2, 3, 4];
    let mut apic = vec![0u8];
    apic.extend_from_slice(b"image/png\0");
    apic.push(3);
    apic.push(0); // empty description
    apic.extend_from_slice(&image);

    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "stable.mp3",
        &v2_file(
            &[v2_text_frame(b"TIT2", "Same Twice"), v2_frame(b"APIC", &apic)],
            0,
        ),
    );

    let first = minim::read(&path).unwrap();
    let second = minim::read(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn untagged_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let mut data = FAKE_AUDIO.to_vec();
    data.extend_from_slice(&[0x55; 400]);
    let path = write_file(&dir, "untagged.mp3", &data);

    let metadata = minim::read(&path).unwrap();
    assert_eq!(metadata.title, "Unknown Title");
    assert_eq!(metadata.artist, "Unknown Artist");
    assert_eq!(metadata.album, "Unknown Album");
    assert_eq!(metadata.genre, "Unknown Genre");
    assert_eq!(metadata.track, 0);
    assert_eq!(metadata.year, 0);
    assert_eq!(metadata.cover, None);
    assert_eq!(metadata.source_path, path);
}

#[test]
fn truncated_frame_tag_returns_partial_fields() {
    // Declared tag size far beyond the bytes actually present
    let mut data = Vec::new();
    data.extend_from_slice(b"ID3");
    data.extend_from_slice(&[3, 0, 0]);
    data.extend_from_slice(&synchsafe(100_000));
    data.extend_from_slice(&v2_text_frame(b"TIT2", "Before The Cut"));
    data.extend_from_slice(&v2_text_frame(b"TPE1", "Cut Artist")[..8]);

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "truncated.mp3", &data);

    let metadata = minim::read(&path).unwrap();
    assert_eq!(metadata.title, "Before The Cut");
    assert_eq!(metadata.artist, "Unknown Artist");
}

#[test]
fn tiny_file_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "tiny.mp3", &[0xFF]);

    match minim::read(&path) {
        Err(Error::UnsupportedFormat(p)) => assert_eq!(p, path),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn missing_file_is_io_error() {
    match minim::read("/no/such/file.mp3") {
        Err(Error::Io(_)) => {}
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn detect_reports_tag_family() {
    let dir = TempDir::new().unwrap();
    let reader = Reader::new();

    let framed = write_file(&dir, "framed.mp3", &v2_file(&[], 16));
    assert_eq!(reader.detect(&framed).unwrap(), TagVersion::Frame);

    let legacy = write_file(&dir, "legacy.mp3", &v1_file("T", "A", "B", "2000", "", 0));
    assert_eq!(reader.detect(&legacy).unwrap(), TagVersion::Legacy);

    let tiny = write_file(&dir, "tiny.mp3", &[1, 2]);
    assert_eq!(reader.detect(&tiny).unwrap(), TagVersion::Unsupported);
}

#[test]
fn legacy_track_number_v1_1() {
    let mut data = v1_file("Song", "Artist", "Album", "1990", "", 5);
    let tag_start = data.len() - 128;
    data[tag_start + 125] = 0;
    data[tag_start + 126] = 9;

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "tracked.mp3", &data);

    let metadata = minim::read(&path).unwrap();
    assert_eq!(metadata.track, 9);
}
