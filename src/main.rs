use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use columnar::cli::{decode_file, encode_file, show_info, show_info_json};
use columnar::codec::CodecOptions;
use columnar::header::Format;
use columnar::pipeline::{PadBytes, Transform, DEFAULT_FILLER, DEFAULT_SENTINEL};
use columnar::{BlockGeometry, Result};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("COLUMNAR_VERSION");
const BUILD: &str = env!("COLUMNAR_BUILD");
const PROFILE: &str = env!("COLUMNAR_PROFILE");
const GIT_HASH: &str = env!("COLUMNAR_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "columnar")]
#[command(author, about = "Columnar transposition block cipher", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Log codec progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pad and transpose a file into blocks
    #[command(alias = "e")]
    Encode(CodecArgs),

    /// Reverse the transposition and strip the padding
    #[command(alias = "d")]
    Decode(CodecArgs),

    /// Show information about a framed file
    #[command(alias = "i")]
    Info {
        /// Framed file to inspect
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct CodecArgs {
    /// Block dimension (block size is DIM*DIM bytes)
    dim: usize,

    /// Input file (must exist)
    input: PathBuf,

    /// Output file (created or truncated)
    output: PathBuf,

    /// Pass 1 to disable transposition (padding only)
    mode: Option<u32>,

    /// Disable transposition (padding only)
    #[arg(long)]
    no_transpose: bool,

    /// Container format
    #[arg(long, default_value = "framed", value_parser = parse_format)]
    format: Format,

    /// Padding sentinel: a single character, decimal or 0x-hex byte
    #[arg(long, value_parser = parse_byte)]
    sentinel: Option<u8>,

    /// Padding filler: a single character, decimal or 0x-hex byte
    #[arg(long, value_parser = parse_byte)]
    filler: Option<u8>,
}

impl CodecArgs {
    fn options(&self) -> Result<CodecOptions> {
        BlockGeometry::new(self.dim)?;
        let transform = if self.no_transpose || self.mode == Some(1) {
            eprintln!("Warning: Transposition disabled");
            Transform::Identity
        } else {
            Transform::Transpose
        };
        let pad = PadBytes::new(
            self.sentinel.unwrap_or(DEFAULT_SENTINEL),
            self.filler.unwrap_or(DEFAULT_FILLER),
        )?;

        Ok(CodecOptions {
            dim: self.dim,
            transform,
            format: self.format,
            pad,
        })
    }
}

fn parse_format(s: &str) -> std::result::Result<Format, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_byte(s: &str) -> std::result::Result<u8, String> {
    if s.len() == 1 {
        return Ok(s.as_bytes()[0]);
    }
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|_| format!("'{}' is not a single character or a byte value", s))
}

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().unwrap();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_logging(cli.verbose);

    if cli.version {
        println!("columnar {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            Cli::command().print_help().unwrap();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Encode(args) => args.options().and_then(|options| {
            let summary = encode_file(&args.input, &args.output, &options)?;
            println!(
                "Encoded {} bytes into {} blocks ({} bytes) -> {}",
                summary.bytes_in,
                summary.blocks,
                summary.bytes_out,
                args.output.display()
            );
            Ok(())
        }),

        Commands::Decode(args) => args.options().and_then(|options| {
            let summary = decode_file(&args.input, &args.output, &options)?;
            println!(
                "Decoded {} blocks into {} bytes -> {}",
                summary.blocks,
                summary.bytes_out,
                args.output.display()
            );
            Ok(())
        }),

        Commands::Info { file, json } => {
            let report = if json {
                show_info_json(&file).map(|s| s + "\n")
            } else {
                show_info(&file)
            };
            report.map(|text| print!("{}", text))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
