// Command-line interface for rlelz.
//
// Thin wrapper over `crate::io`: each command reads one file, runs one
// codec call, and writes the result unchanged. Reporting goes to stderr.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::codec::token::{RleTokens, WindowTokens};
use crate::codec::window::{DEFAULT_MIN_MATCH, DEFAULT_WINDOW_SIZE};
use crate::codec::{self, Algorithm, CodecError, RleToken, WindowConfig, WindowToken};
use crate::frame;
use crate::io::{self, CompressOptions, IoError, Overwrite};
use crate::select;

// ---------------------------------------------------------------------------
// Algorithm argument parsing
// ---------------------------------------------------------------------------

/// `-a` value for `compress`: a codec, or `auto` for the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlgorithmChoice {
    Auto,
    Fixed(Algorithm),
}

fn parse_algorithm(s: &str) -> Result<Algorithm, String> {
    s.parse::<Algorithm>().map_err(|e| e.to_string())
}

fn parse_algorithm_choice(s: &str) -> Result<AlgorithmChoice, String> {
    if s.trim().eq_ignore_ascii_case("auto") {
        Ok(AlgorithmChoice::Auto)
    } else {
        parse_algorithm(s).map(AlgorithmChoice::Fixed)
    }
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// RLE and window-match byte codecs.
#[derive(Parser, Debug)]
#[command(
    name = "rlelz",
    version,
    about = "RLE / LZ-lite file compressor",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compress a file.
    Compress(CompressArgs),
    /// Decompress a file.
    Decompress(DecompressArgs),
    /// Show which codec the selector recommends for a file.
    Select(PathArgs),
    /// List the tokens of a compressed file.
    Inspect(InspectArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct WindowTuningArgs {
    /// Window-match search distance in bytes (0-255).
    #[arg(long = "window-size", value_parser = clap::value_parser!(u16).range(0..=255), default_value_t = DEFAULT_WINDOW_SIZE as u16)]
    window_size: u16,

    /// Shortest window match worth a back-reference (1-255).
    #[arg(long = "min-match", value_parser = clap::value_parser!(u16).range(1..=255), default_value_t = DEFAULT_MIN_MATCH as u16)]
    min_match: u16,

    /// Only match against bytes before the current position.
    #[arg(long = "no-overlap")]
    no_overlap: bool,
}

#[derive(Args, Debug)]
struct CompressArgs {
    /// Codec: rle, lz, or auto (selector decides).
    #[arg(short = 'a', long, value_parser = parse_algorithm_choice, default_value = "auto")]
    algorithm: AlgorithmChoice,

    /// Prefix the output with a codec tag so decompress needs no -a.
    #[arg(long)]
    framed: bool,

    #[command(flatten)]
    tuning: WindowTuningArgs,

    /// Input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output file.
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct DecompressArgs {
    /// Codec that produced the input; omit for framed input.
    #[arg(short = 'a', long, value_parser = parse_algorithm)]
    algorithm: Option<Algorithm>,

    /// Compressed input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output file.
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct PathArgs {
    /// Input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Codec that produced the input; omit for framed input.
    #[arg(short = 'a', long, value_parser = parse_algorithm)]
    algorithm: Option<Algorithm>,

    /// Compressed input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Compress,
    Decompress,
    Select,
    Inspect,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    algorithm: AlgorithmChoice,
    framed: bool,
    window: WindowConfig,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

fn resolve_options(cli: Cli) -> Options {
    let mut opts = Options {
        command: Command::Config,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
        algorithm: AlgorithmChoice::Auto,
        framed: false,
        window: WindowConfig::default(),
        input_file: None,
        output_file: None,
    };

    match cli.command {
        Cmd::Compress(args) => {
            opts.command = Command::Compress;
            opts.algorithm = args.algorithm;
            opts.framed = args.framed;
            opts.window = WindowConfig {
                window_size: args.tuning.window_size as usize,
                min_match: args.tuning.min_match as usize,
                allow_overlap: !args.tuning.no_overlap,
            };
            opts.input_file = Some(args.input);
            opts.output_file = Some(args.output);
        }
        Cmd::Decompress(args) => {
            opts.command = Command::Decompress;
            opts.algorithm = fixed_or_framed(args.algorithm);
            opts.input_file = Some(args.input);
            opts.output_file = Some(args.output);
        }
        Cmd::Select(args) => {
            opts.command = Command::Select;
            opts.input_file = Some(args.input);
        }
        Cmd::Inspect(args) => {
            opts.command = Command::Inspect;
            opts.algorithm = fixed_or_framed(args.algorithm);
            opts.input_file = Some(args.input);
        }
        Cmd::Config => {}
    }

    opts
}

/// For decoding commands, `Auto` means "read the frame tag".
fn fixed_or_framed(algorithm: Option<Algorithm>) -> AlgorithmChoice {
    algorithm.map_or(AlgorithmChoice::Auto, AlgorithmChoice::Fixed)
}

impl AlgorithmChoice {
    fn fixed(self) -> Option<Algorithm> {
        match self {
            Self::Auto => None,
            Self::Fixed(algorithm) => Some(algorithm),
        }
    }
}

impl Options {
    fn overwrite(&self) -> Overwrite {
        if self.force {
            Overwrite::Allow
        } else {
            Overwrite::Deny
        }
    }

    fn required_input(&self) -> Result<&PathBuf, IoError> {
        self.input_file
            .as_ref()
            .ok_or_else(|| std::io::Error::other("an input file is required").into())
    }

    fn required_output(&self) -> Result<&PathBuf, IoError> {
        self.output_file
            .as_ref()
            .ok_or_else(|| std::io::Error::other("an output file is required").into())
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("rlelz".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> Result<(), IoError> {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("rlelz version {version}");

    let file_io = cfg!(feature = "file-io") as u8;
    eprintln!("FILE_IO={file_io}");
    eprintln!("DEFAULT_WINDOW_SIZE={DEFAULT_WINDOW_SIZE}");
    eprintln!("DEFAULT_MIN_MATCH={DEFAULT_MIN_MATCH}");
    eprintln!("RLE_REPEAT_RATIO={}", select::RLE_REPEAT_RATIO);
    eprintln!("FRAME_TAG_RLE={:#04x}", frame::TAG_RLE);
    eprintln!("FRAME_TAG_LZ={:#04x}", frame::TAG_WINDOW_MATCH);
    Ok(())
}

// ---------------------------------------------------------------------------
// Compress / decompress commands
// ---------------------------------------------------------------------------

fn cmd_compress(opts: &Options) -> Result<(), IoError> {
    let input = opts.required_input()?;
    let output = opts.required_output()?;

    let compress_opts = CompressOptions {
        algorithm: opts.algorithm.fixed(),
        window: opts.window,
        framed: opts.framed,
        overwrite: opts.overwrite(),
    };
    let stats = io::compress_file(input, output, &compress_opts)?;

    if !opts.quiet {
        eprintln!("rlelz: using {} algorithm", stats.algorithm.name().to_uppercase());
        eprintln!("rlelz: original size: {} bytes", stats.original_size);
        eprintln!("rlelz: compressed size: {} bytes", stats.compressed_size);
        eprintln!("rlelz: compression ratio: {:.2}%", stats.ratio());
    }
    if opts.verbose > 0
        && !opts.quiet
        && let Some(digest) = stats.input_sha256
    {
        eprintln!("rlelz: input sha256: {}", hex(&digest));
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "compress",
            "algorithm": stats.algorithm.name(),
            "framed": stats.framed,
            "original_size": stats.original_size,
            "compressed_size": stats.compressed_size,
            "ratio": stats.ratio(),
            "input_sha256": stats.input_sha256.map(|d| hex(&d)),
        });
        eprintln!("{json:#}");
    }

    Ok(())
}

fn cmd_decompress(opts: &Options) -> Result<(), IoError> {
    let input = opts.required_input()?;
    let output = opts.required_output()?;

    let stats = io::decompress_file(input, output, opts.algorithm.fixed(), opts.overwrite())?;

    if !opts.quiet {
        eprintln!(
            "rlelz: decompressed {} -> {} bytes ({})",
            stats.compressed_size, stats.output_size, stats.algorithm
        );
    }
    if opts.verbose > 0
        && !opts.quiet
        && let Some(digest) = stats.output_sha256
    {
        eprintln!("rlelz: output sha256: {}", hex(&digest));
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "decompress",
            "algorithm": stats.algorithm.name(),
            "compressed_size": stats.compressed_size,
            "output_size": stats.output_size,
            "output_sha256": stats.output_sha256.map(|d| hex(&d)),
        });
        eprintln!("{json:#}");
    }

    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

// ---------------------------------------------------------------------------
// Select command
// ---------------------------------------------------------------------------

fn cmd_select(opts: &Options) -> Result<(), IoError> {
    let data = std::fs::read(opts.required_input()?)?;
    let stats = select::analyze(&data);

    if opts.json_output {
        let json = serde_json::json!({
            "command": "select",
            "size": stats.len,
            "adjacent_repeats": stats.repeats,
            "ratio": stats.ratio,
            "recommended": stats.recommended.name(),
        });
        eprintln!("{json:#}");
    } else {
        println!("size:             {}", stats.len);
        println!("adjacent repeats: {}", stats.repeats);
        println!("repeat ratio:     {:.4}", stats.ratio);
        println!("recommended:      {}", stats.recommended);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Inspect command
// ---------------------------------------------------------------------------

/// Token listing for one stream: printable lines plus counts.
#[derive(Debug, Default, PartialEq, Eq)]
struct TokenListing {
    lines: Vec<String>,
    literals: usize,
    references: usize,
    decoded_len: usize,
}

fn list_tokens(
    algorithm: Algorithm,
    payload: &[u8],
    base: usize,
) -> Result<TokenListing, CodecError> {
    let mut listing = TokenListing::default();

    match algorithm {
        Algorithm::Rle => {
            for token in RleTokens::new(payload) {
                let (pos, token) = token?;
                listing.decoded_len += token.decoded_len();
                let line = match token {
                    RleToken::Literal(value) => {
                        listing.literals += 1;
                        format!("{:>8}  LITERAL {value:#04x}", base + pos)
                    }
                    RleToken::Run { value, count } => {
                        listing.references += 1;
                        format!("{:>8}  RUN     value={value:#04x} count={count}", base + pos)
                    }
                };
                listing.lines.push(line);
            }
        }
        Algorithm::WindowMatch => {
            for token in WindowTokens::new(payload) {
                let (pos, token) = token?;
                listing.decoded_len += token.decoded_len();
                let line = match token {
                    WindowToken::Literal(value) => {
                        listing.literals += 1;
                        format!("{:>8}  LITERAL {value:#04x}", base + pos)
                    }
                    WindowToken::Match { offset, length } => {
                        listing.references += 1;
                        format!("{:>8}  MATCH   offset={offset} length={length}", base + pos)
                    }
                };
                listing.lines.push(line);
            }
        }
    }

    // Token framing can be valid while offsets are not.
    codec::decode(algorithm, payload)?;
    Ok(listing)
}

fn cmd_inspect(opts: &Options) -> Result<(), IoError> {
    let data = std::fs::read(opts.required_input()?)?;

    let (algorithm, payload, base) = match opts.algorithm.fixed() {
        Some(algorithm) => (algorithm, &data[..], 0),
        None => (frame::peek_algorithm(&data)?, &data[1..], 1),
    };

    let listing = list_tokens(algorithm, payload, base)?;
    println!("codec: {algorithm}");
    for line in &listing.lines {
        println!("{line}");
    }
    println!(
        "tokens: {} ({} literal, {} {}), encoded {} bytes, decoded {} bytes",
        listing.literals + listing.references,
        listing.literals,
        listing.references,
        match algorithm {
            Algorithm::Rle => "run",
            Algorithm::WindowMatch => "match",
        },
        payload.len(),
        listing.decoded_len
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(opts.verbose)),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    let result = match opts.command {
        Command::Compress => cmd_compress(&opts),
        Command::Decompress => cmd_decompress(&opts),
        Command::Select => cmd_select(&opts),
        Command::Inspect => cmd_inspect(&opts),
        Command::Config => cmd_config(),
    };

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("rlelz: {e}");
            process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_opts(args: &[&str]) -> Options {
        let argv: Vec<String> = std::iter::once("rlelz".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        let cli = Cli::try_parse_from(argv).expect("cli parse failed");
        resolve_options(cli)
    }

    fn parse_err(args: &[&str]) -> String {
        let argv: Vec<String> = std::iter::once("rlelz".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        Cli::try_parse_from(argv).unwrap_err().to_string()
    }

    #[test]
    fn compress_subcommand_maps_correctly() {
        let opts = parse_opts(&["compress", "-a", "lz", "--framed", "in.bin", "out.rlz"]);
        assert_eq!(opts.command, Command::Compress);
        assert_eq!(opts.algorithm, AlgorithmChoice::Fixed(Algorithm::WindowMatch));
        assert!(opts.framed);
        assert_eq!(opts.window, WindowConfig::default());
        assert_eq!(opts.input_file, Some(PathBuf::from("in.bin")));
        assert_eq!(opts.output_file, Some(PathBuf::from("out.rlz")));
    }

    #[test]
    fn compress_defaults_to_auto() {
        let opts = parse_opts(&["compress", "in", "out"]);
        assert_eq!(opts.algorithm, AlgorithmChoice::Auto);
        assert!(!opts.framed);
    }

    #[test]
    fn window_tuning_flags_parse() {
        let opts = parse_opts(&[
            "compress",
            "--window-size",
            "255",
            "--min-match",
            "4",
            "--no-overlap",
            "in",
            "out",
        ]);
        assert_eq!(
            opts.window,
            WindowConfig {
                window_size: 255,
                min_match: 4,
                allow_overlap: false,
            }
        );
        assert!(parse_err(&["compress", "--window-size", "256", "in", "out"]).contains("256"));
        assert!(parse_err(&["compress", "--min-match", "0", "in", "out"]).contains("0"));
    }

    #[test]
    fn decompress_subcommand_maps_correctly() {
        let opts = parse_opts(&["--quiet", "decompress", "--algorithm", "rle", "in", "out"]);
        assert_eq!(opts.command, Command::Decompress);
        assert_eq!(opts.algorithm.fixed(), Some(Algorithm::Rle));
        assert!(opts.quiet);

        let framed = parse_opts(&["decompress", "in", "out"]);
        assert_eq!(framed.algorithm.fixed(), None);
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let msg = parse_err(&["compress", "-a", "zip", "in", "out"]);
        assert!(msg.contains("unsupported algorithm 'zip'"), "{msg}");
        let msg = parse_err(&["decompress", "-a", "auto", "in", "out"]);
        assert!(msg.contains("unsupported algorithm 'auto'"), "{msg}");
    }

    #[test]
    fn global_flags() {
        let opts = parse_opts(&["--force", "--json", "select", "in"]);
        assert!(opts.force);
        assert!(opts.json_output);
        assert_eq!(opts.overwrite(), Overwrite::Allow);
        assert_eq!(opts.command, Command::Select);
    }

    #[test]
    fn verbose_is_capped() {
        let opts = parse_opts(&["-v", "-v", "-v", "compress", "in", "out"]);
        assert_eq!(opts.verbose, 2);
        assert_eq!(log_filter(opts.verbose), "debug");
    }

    #[test]
    fn inspect_and_config_map() {
        assert_eq!(parse_opts(&["inspect", "in"]).command, Command::Inspect);
        assert_eq!(parse_opts(&["config"]).command, Command::Config);
    }

    #[test]
    fn token_listing_counts() {
        let encoded = codec::encode(Algorithm::WindowMatch, b"AAAAA");
        let listing = list_tokens(Algorithm::WindowMatch, &encoded, 0).unwrap();
        assert_eq!(listing.literals, 1);
        assert_eq!(listing.references, 1);
        assert_eq!(listing.decoded_len, 5);
        assert!(listing.lines[1].contains("MATCH   offset=1 length=4"));

        let encoded = codec::encode(Algorithm::Rle, b"xyyyyz");
        let listing = list_tokens(Algorithm::Rle, &encoded, 1).unwrap();
        assert_eq!((listing.literals, listing.references), (2, 1));
        assert!(listing.lines[1].starts_with("       2  RUN"));
    }

    #[test]
    fn token_listing_rejects_bad_offsets() {
        let err = list_tokens(Algorithm::WindowMatch, &[0x01, 1, 3], 0).unwrap_err();
        assert!(matches!(err, CodecError::MalformedStream { .. }));
    }

    #[test]
    fn hex_formats_lowercase() {
        assert_eq!(hex(&[0x00, 0xAB, 0x7f]), "00ab7f");
    }
}
