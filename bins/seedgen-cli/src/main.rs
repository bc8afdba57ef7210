//! seedgen — command-line mnemonic and key generator.
//!
//! Generates 12/24-word mnemonics from mixed entropy, searches for mnemonics
//! containing chosen words, derives seeds and master keys, and converts
//! private keys to and from Wallet Import Format. Results go to stdout, logs
//! to stderr.

mod config;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use seedgen_core::keys::{format_creation_time, parse_creation_time};
use seedgen_core::wif::{self, Network};
use seedgen_core::{Generator, GeneratorConfig, KeyReport, Mnemonic, MnemonicCodec, WordCount, WordList};
use tracing::{debug, info};

use crate::config::Settings;

/// Multi-source entropy mnemonic generator.
#[derive(Parser)]
#[command(name = "seedgen")]
#[command(version, about = "Mnemonic, seed and WIF key generator")]
struct Cli {
    /// Word-list file (2048 newline-separated words) instead of English.
    #[arg(long, global = true)]
    wordlist: Option<std::path::PathBuf>,

    /// Log filter, e.g. "debug" or "seedgen_core=trace".
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Entropy collector time budget in milliseconds.
    #[arg(long, global = true)]
    collect_budget_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random mnemonic and its keys.
    Generate(GenerateArgs),
    /// Find a 12-word mnemonic containing chosen words.
    Custom(CustomArgs),
    /// Derive the seed and keys of an existing mnemonic.
    Derive(DeriveArgs),
    /// Check a mnemonic's words and checksum.
    Verify(VerifyArgs),
    /// Encode a private key as WIF, or decode a WIF string.
    Wif(WifArgs),
}

#[derive(Args)]
struct KeyOutputArgs {
    /// Export the WIF key for testnet.
    #[arg(long, conflicts_with = "mainnet")]
    testnet: bool,

    /// Export the WIF key for mainnet, overriding SEEDGEN_NETWORK.
    #[arg(long)]
    mainnet: bool,

    /// Export the WIF key for an uncompressed public key.
    #[arg(long)]
    uncompressed: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of words (12 or 24).
    #[arg(short, long, default_value = "12", value_parser = parse_word_count)]
    words: WordCount,

    #[command(flatten)]
    output: KeyOutputArgs,
}

#[derive(Args)]
struct CustomArgs {
    /// Word to place; pair each with a --position.
    #[arg(long = "word", required = true)]
    words: Vec<String>,

    /// 1-based position (1-12) for the matching --word.
    #[arg(long = "position", required = true)]
    positions: Vec<usize>,

    /// Give up after this many attempts.
    #[arg(long)]
    max_attempts: Option<u32>,

    #[command(flatten)]
    output: KeyOutputArgs,
}

#[derive(Args)]
struct DeriveArgs {
    /// Mnemonic phrase. If not provided, will prompt securely.
    #[arg(short, long)]
    mnemonic: Option<String>,

    /// Creation time, "YYYY-MM-DD HH:MM:SS".
    #[arg(short, long)]
    timestamp: String,

    #[command(flatten)]
    output: KeyOutputArgs,
}

#[derive(Args)]
struct VerifyArgs {
    /// Mnemonic phrase. If not provided, will prompt securely.
    #[arg(short, long)]
    mnemonic: Option<String>,
}

#[derive(Args)]
struct WifArgs {
    /// Hex-encoded 32-byte private key.
    #[arg(long, conflicts_with = "decode", required_unless_present = "decode")]
    key: Option<String>,

    /// WIF string to decode.
    #[arg(long)]
    decode: Option<String>,

    /// Encode for testnet.
    #[arg(long, conflicts_with = "mainnet")]
    testnet: bool,

    /// Encode for mainnet, overriding SEEDGEN_NETWORK.
    #[arg(long)]
    mainnet: bool,

    /// Encode for an uncompressed public key.
    #[arg(long)]
    uncompressed: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    if cli.wordlist.is_some() {
        settings.wordlist = cli.wordlist;
    }
    if cli.log_level.is_some() {
        settings.log_level = cli.log_level;
    }
    if cli.collect_budget_ms.is_some() {
        settings.collect_budget_ms = cli.collect_budget_ms;
    }

    init_tracing(settings.log_level.as_deref());

    match cli.command {
        Commands::Generate(args) => cmd_generate(&settings, args),
        Commands::Custom(args) => cmd_custom(&settings, args),
        Commands::Derive(args) => cmd_derive(&settings, args),
        Commands::Verify(args) => cmd_verify(&settings, args),
        Commands::Wif(args) => cmd_wif(&settings, args),
    }
}

/// Install the stderr subscriber. `--log-level` wins over `RUST_LOG`.
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(directive) => tracing_subscriber::EnvFilter::new(directive),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Generate a random mnemonic.
fn cmd_generate(settings: &Settings, args: GenerateArgs) -> Result<ExitCode> {
    let generator = build_generator(settings, &args.output)?;
    let (mnemonic, created) = generator.generate_random(args.words);
    print_report(&generator.report(&mnemonic, created), args.output.json)?;
    Ok(ExitCode::SUCCESS)
}

/// Search for a mnemonic with fixed words.
fn cmd_custom(settings: &Settings, args: CustomArgs) -> Result<ExitCode> {
    let mut settings = settings.clone();
    if args.max_attempts.is_some() {
        settings.max_attempts = args.max_attempts;
    }
    let generator = build_generator(&settings, &args.output)?;
    info!(
        max_attempts = generator.config().max_attempts,
        "searching for custom mnemonic"
    );
    let (mnemonic, created) = generator
        .generate_custom(&args.words, &args.positions)
        .context("Custom mnemonic search failed")?;
    print_report(&generator.report(&mnemonic, created), args.output.json)?;
    Ok(ExitCode::SUCCESS)
}

/// Derive keys from a mnemonic and its creation time.
fn cmd_derive(settings: &Settings, args: DeriveArgs) -> Result<ExitCode> {
    let generator = build_generator(settings, &args.output)?;
    let created = parse_creation_time(&args.timestamp)
        .context("Invalid timestamp (expected \"YYYY-MM-DD HH:MM:SS\")")?;
    let phrase = read_mnemonic(args.mnemonic)?;
    let mnemonic = Mnemonic::parse(&phrase).context("Invalid mnemonic")?;
    generator
        .codec()
        .decode(&mnemonic)
        .context("Invalid mnemonic")?;

    print_report(&generator.report(&mnemonic, created), args.output.json)?;
    Ok(ExitCode::SUCCESS)
}

/// Check a mnemonic. Exit status 1 when it does not verify.
fn cmd_verify(settings: &Settings, args: VerifyArgs) -> Result<ExitCode> {
    let wordlist = load_wordlist(settings)?;
    let codec = MnemonicCodec::new(wordlist);
    let phrase = read_mnemonic(args.mnemonic)?;

    let outcome = Mnemonic::parse(&phrase).and_then(|m| codec.decode(&m).map(|_| m.words().len()));
    match outcome {
        Ok(words) => {
            println!("valid ({words} words)");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("invalid: {e}");
            Ok(ExitCode::from(1))
        }
    }
}

/// Encode or decode a WIF string.
fn cmd_wif(settings: &Settings, args: WifArgs) -> Result<ExitCode> {
    if let Some(text) = args.decode {
        let decoded = wif::decode_wif(&text).context("Invalid WIF")?;
        println!("Network:     {}", decoded.network);
        println!("Compressed:  {}", decoded.compressed);
        println!("Private key: {}", hex::encode(decoded.private_key));
        return Ok(ExitCode::SUCCESS);
    }

    let Some(key_hex) = args.key else {
        bail!("Either --key or --decode is required");
    };
    let bytes = hex::decode(key_hex.trim()).context("Invalid hex private key")?;
    let key: [u8; 32] = match bytes.try_into() {
        Ok(key) => key,
        Err(bytes) => bail!("Private key must be exactly 32 bytes, got {}", bytes.len()),
    };
    let network = resolve_network(settings, args.testnet, args.mainnet);
    println!("{}", wif::encode_for(&key, !args.uncompressed, network));
    Ok(ExitCode::SUCCESS)
}

/// Build a generator from settings plus the per-command WIF flags.
fn build_generator(settings: &Settings, output: &KeyOutputArgs) -> Result<Generator> {
    let mut config: GeneratorConfig = settings.generator_config();
    config.network = resolve_network(settings, output.testnet, output.mainnet);
    if output.uncompressed {
        config.compressed = false;
    }
    debug!(?config, "generator config");
    Ok(Generator::new(config, load_wordlist(settings)?))
}

/// Network flags win over `SEEDGEN_NETWORK`, which wins over mainnet.
fn resolve_network(settings: &Settings, testnet: bool, mainnet: bool) -> Network {
    if testnet {
        Network::Testnet
    } else if mainnet {
        Network::Mainnet
    } else {
        settings.network.unwrap_or_default()
    }
}

fn load_wordlist(settings: &Settings) -> Result<Arc<WordList>> {
    let list = match settings.wordlist.as_deref() {
        Some(path) => read_wordlist(path)?,
        None => WordList::english(),
    };
    Ok(Arc::new(list))
}

fn read_wordlist(path: &Path) -> Result<WordList> {
    WordList::from_file(path).with_context(|| format!("Failed to load word-list {}", path.display()))
}

/// Use the given phrase or prompt for one without echo.
fn read_mnemonic(given: Option<String>) -> Result<String> {
    match given {
        Some(phrase) => Ok(phrase),
        None => rpassword::prompt_password("Mnemonic: ").context("Failed to read mnemonic"),
    }
}

fn print_report(report: &KeyReport, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{text}");
        return Ok(());
    }
    println!("Mnemonic:    {}", report.mnemonic);
    println!("Created:     {}", format_creation_time(report.created_at));
    println!("Seed:        {}", report.seed_hex);
    println!("Master key:  {}", report.private_key_hex);
    println!("Chain code:  {}", report.chain_code_hex);
    println!(
        "WIF:         {} ({}, {})",
        report.wif,
        report.network,
        if report.compressed { "compressed" } else { "uncompressed" }
    );
    println!("\nKeep the creation time: the seed cannot be re-derived without it.");
    Ok(())
}

fn parse_word_count(s: &str) -> std::result::Result<WordCount, String> {
    let n: usize = s.parse().map_err(|_| format!("not a number: {s}"))?;
    WordCount::try_from(n).map_err(|e| e.to_string())
}
