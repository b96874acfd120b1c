// CLI binary entry point for minim

use clap::{Parser, Subcommand};
use std::process;

mod cli;

use cli::{commands, OutputFormat, OutputFormatter};

/// minim - read ID3 metadata from audio files
#[derive(Parser, Debug)]
#[command(name = "minim")]
#[command(about = "Read ID3v1 and ID3v2 metadata from audio files", long_about = None)]
#[command(version)]
struct Args {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read metadata from audio file(s)
    Read {
        /// Audio file path(s)
        files: Vec<String>,

        /// Output to file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Detect the tag family of audio file(s)
    Detect {
        /// Audio file path(s)
        files: Vec<String>,
    },
    /// Scan a directory tree and read every matching file
    Scan {
        /// Directory to scan
        directory: String,

        /// File pattern or extension (e.g. "*.mp3" or "mp3")
        #[arg(short, long, default_value = "mp3")]
        pattern: String,
    },
    /// Export embedded cover art to an image file
    Cover {
        /// Audio file path
        file: String,

        /// Output image path (default: derived from the file name)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show file-level information
    Info {
        /// Audio file path(s)
        files: Vec<String>,
    },
}

fn main() {
    let args = Args::parse();
    let formatter = OutputFormatter::new(args.format, args.quiet);

    let result = match &args.command {
        Commands::Read { files, output } => {
            commands::command_read(files, output.as_deref(), &formatter)
        }
        Commands::Detect { files } => commands::command_detect(files, &formatter),
        Commands::Scan { directory, pattern } => {
            commands::command_scan(directory, pattern, &formatter)
        }
        Commands::Cover { file, output } => {
            commands::command_cover(file, output.as_deref(), &formatter)
        }
        Commands::Info { files } => commands::command_info(files, &formatter),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}
