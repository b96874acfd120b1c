// CLI command implementations

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use glob::glob;

use minim::id3::Id3v2Header;
use minim::{Reader, TagVersion};

use crate::cli::output::OutputFormatter;

/// Read metadata from files and print each record.
pub fn command_read(
    files: &[String],
    output: Option<&str>,
    formatter: &OutputFormatter,
) -> anyhow::Result<()> {
    anyhow::ensure!(!files.is_empty(), "no files specified");

    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create {}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout()),
    };

    let reader = Reader::new();
    for file_path in files {
        match reader.read(file_path) {
            Ok(metadata) => {
                formatter.output_metadata(&metadata, &mut *writer)?;
                writeln!(writer)?;
            }
            Err(e) => formatter.print_error(&format!("{}: {}", file_path, e)),
        }
    }

    Ok(())
}

/// Detect the tag family of each file.
pub fn command_detect(files: &[String], formatter: &OutputFormatter) -> anyhow::Result<()> {
    anyhow::ensure!(!files.is_empty(), "no files specified");

    let reader = Reader::new();
    for file_path in files {
        match reader.detect(file_path) {
            Ok(version) => {
                let detail = match version {
                    TagVersion::Frame => frame_version(file_path),
                    _ => None,
                };
                match detail {
                    Some(detail) => formatter.print_info(&format!("{}: {}", file_path, detail)),
                    None => formatter.print_info(&format!("{}: {}", file_path, version)),
                }
            }
            Err(e) => formatter.print_error(&format!("{}: {}", file_path, e)),
        }
    }

    Ok(())
}

/// Exact ID3v2 version string, e.g. "ID3v2.3.0".
fn frame_version(path: &str) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let mut buffer = [0u8; Id3v2Header::SIZE];
    file.read_exact(&mut buffer).ok()?;
    let header = Id3v2Header::parse(&buffer)?;
    Some(format!("ID3v2.{}.{}", header.version.0, header.version.1))
}

/// Scan a directory tree for matching files and read them all.
///
/// One unreadable or foreign file never aborts the scan; it is reported
/// and counted, and the walk continues.
pub fn command_scan(
    directory: &str,
    pattern: &str,
    formatter: &OutputFormatter,
) -> anyhow::Result<()> {
    let glob_pattern = if pattern.contains('*') || pattern.contains('?') {
        format!("{}/**/{}", directory, pattern)
    } else {
        format!("{}/**/*.{}", directory, pattern.trim_start_matches('.'))
    };

    let mut files = Vec::new();
    for entry in glob(&glob_pattern).context("invalid glob pattern")? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => formatter.print_error(&format!("error reading path: {}", e)),
        }
    }

    if files.is_empty() {
        formatter.print_info("no files found matching pattern");
        return Ok(());
    }
    formatter.print_info(&format!("scanning {} files...", files.len()));

    let reader = Reader::new();
    let mut success_count = 0;
    let mut error_count = 0;
    let mut stdout = std::io::stdout();

    for path in &files {
        match reader.read(path) {
            Ok(metadata) => {
                formatter.output_metadata(&metadata, &mut stdout)?;
                writeln!(stdout)?;
                success_count += 1;
            }
            Err(e) => {
                formatter.print_error(&format!("{}: {}", path.display(), e));
                error_count += 1;
            }
        }
    }

    formatter.print_info(&format!(
        "completed: {} read, {} errors",
        success_count, error_count
    ));
    Ok(())
}

/// Export embedded cover art to an image file.
pub fn command_cover(
    file: &str,
    output: Option<&str>,
    formatter: &OutputFormatter,
) -> anyhow::Result<()> {
    let metadata = Reader::new()
        .read(file)
        .with_context(|| format!("cannot read {}", file))?;

    let cover = match metadata.cover {
        Some(cover) => cover,
        None => {
            formatter.print_info(&format!("{}: no embedded cover art", file));
            return Ok(());
        }
    };

    let target = match output {
        Some(path) => path.to_string(),
        None => {
            let stem = Path::new(file)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "cover".to_string());
            format!("{}.{}", stem, cover.extension())
        }
    };

    cover
        .save(&target)
        .with_context(|| format!("cannot write {}", target))?;
    formatter.print_success(&format!(
        "exported {} ({} bytes) to {}",
        cover.mime_type,
        cover.data.len(),
        target
    ));
    Ok(())
}

/// Show file-level information: size, mtime, tag family.
pub fn command_info(files: &[String], formatter: &OutputFormatter) -> anyhow::Result<()> {
    anyhow::ensure!(!files.is_empty(), "no files specified");

    let reader = Reader::new();
    for file_path in files {
        let fs_metadata = std::fs::metadata(file_path)
            .with_context(|| format!("cannot stat {}", file_path))?;

        println!("{}", file_path);
        println!("  size: {} bytes", fs_metadata.len());
        if let Ok(modified) = fs_metadata.modified() {
            let timestamp: DateTime<Utc> = modified.into();
            println!("  modified: {}", timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        match reader.detect(file_path) {
            Ok(TagVersion::Frame) => {
                let detail =
                    frame_version(file_path).unwrap_or_else(|| TagVersion::Frame.to_string());
                println!("  tag: {}", detail);
            }
            Ok(version) => println!("  tag: {}", version),
            Err(e) => formatter.print_error(&format!("{}: {}", file_path, e)),
        }
    }

    Ok(())
}
