// Output formatting for the CLI

use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use clap::ValueEnum;

use minim::AudioMetadata;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// Formats metadata records and status messages.
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Write one metadata record.
    pub fn output_metadata(
        &self,
        metadata: &AudioMetadata,
        writer: &mut dyn Write,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Pretty => self.output_pretty(metadata, writer)?,
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string_pretty(&to_json(metadata))?)?;
            }
        }
        Ok(())
    }

    fn output_pretty(&self, metadata: &AudioMetadata, writer: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(writer, "Title:  {}", metadata.title)?;
        writeln!(writer, "Artist: {}", metadata.artist)?;
        writeln!(writer, "Album:  {}", metadata.album)?;
        writeln!(writer, "Genre:  {}", metadata.genre)?;
        writeln!(writer, "Track:  {}", metadata.track)?;
        writeln!(writer, "Year:   {}", metadata.year)?;
        if let Some(cover) = &metadata.cover {
            writeln!(
                writer,
                "Cover:  {} ({} bytes)",
                cover.mime_type,
                cover.data.len()
            )?;
        }
        writeln!(writer, "Path:   {}", metadata.source_path.display())?;
        Ok(())
    }

    /// Print success message.
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message.
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message.
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}

/// JSON rendering of a record; cover-art bytes go in as base64.
fn to_json(metadata: &AudioMetadata) -> serde_json::Value {
    let mut value = serde_json::json!({
        "title": metadata.title,
        "artist": metadata.artist,
        "album": metadata.album,
        "genre": metadata.genre,
        "track": metadata.track,
        "year": metadata.year,
        "source_path": metadata.source_path.display().to_string(),
    });

    if let Some(cover) = &metadata.cover {
        value["cover"] = serde_json::json!({
            "mime_type": cover.mime_type,
            "picture_type": cover.picture_type,
            "description": cover.description,
            "data": BASE64.encode(&cover.data),
        });
    }

    value
}
