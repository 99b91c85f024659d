use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use flate2::write::GzEncoder;
use flate2::Compression as GzCompression;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use srcz_codecs::{codec_by_id, Lz4Codec, PassThroughCodec, SourceCodec, ZstdCodec};
use srcz_core::format::CODEC_SOURCE;
use srcz_core::{
    identify_language, read_header, Codec, CompressedStream, LanguageProfile, Reader, Scanner,
    SpanKind, Writer,
};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "srcz",
    about = "Syntax-aware compression for source files (SRCZ1 format)",
    version
)]
struct Cli {
    /// Print engine debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a source file into SRCZ1 format
    Compress {
        /// Source file to compress ("-" reads stdin)
        input: PathBuf,
        /// Destination SRCZ1 file
        output: PathBuf,
        /// Codec to use: source | zstd | lz4 | passthrough
        #[arg(short, long, default_value = "source")]
        codec: String,
        /// Keyword profile (c, go, rust, java, javascript, python, bash, css, html, swift).
        /// Detected from the input extension when omitted.
        #[arg(short, long)]
        language: Option<String>,
        /// Zstd compression level (1–22, only used with --codec zstd)
        #[arg(long, default_value_t = 3)]
        zstd_level: i32,
    },
    /// Decompress an SRCZ1 file back to raw bytes
    Decompress {
        /// Source SRCZ1 file
        input: PathBuf,
        /// Destination file ("-" writes to stdout)
        output: PathBuf,
    },
    /// Print header metadata and, for source payloads, the dictionary
    Inspect {
        /// SRCZ1 file to inspect
        file: PathBuf,
        /// List every dictionary entry
        #[arg(long)]
        entries: bool,
    },
    /// Dump the span classification of a source file
    Scan {
        /// Source file to scan
        file: PathBuf,
        /// Keyword profile; detected from the extension when omitted
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Compare output sizes of every codec (and gzip) on one file
    Compare {
        /// Source file to measure
        file: PathBuf,
        /// Keyword profile; detected from the extension when omitted
        #[arg(short, long)]
        language: Option<String>,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("srcz_core=debug,srcz_codecs=debug,srcz=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Explicit `--language` wins; otherwise the file extension decides, and
/// unknown extensions fall back to the C profile.
fn resolve_profile(language: Option<&str>, path: &Path) -> anyhow::Result<LanguageProfile> {
    if let Some(name) = language {
        return LanguageProfile::by_name(name);
    }
    match identify_language(path) {
        Ok(profile) => {
            debug!(profile = profile.name, path = ?path, "detected language");
            Ok(profile)
        }
        Err(err) => {
            warn!("{err}; using the {} profile", LanguageProfile::default().name);
            Ok(LanguageProfile::default())
        }
    }
}

fn codec_from_name(
    name: &str,
    profile: LanguageProfile,
    zstd_level: i32,
) -> anyhow::Result<Box<dyn Codec>> {
    match name {
        "source" | "src" | "s" => Ok(Box::new(SourceCodec::with_profile(profile))),
        "passthrough" | "pass" | "none" => Ok(Box::new(PassThroughCodec)),
        "zstd" | "z" => Ok(Box::new(ZstdCodec::new(zstd_level))),
        "lz4" | "l" => Ok(Box::new(Lz4Codec)),
        other => anyhow::bail!(
            "unknown codec '{}'. Valid options: source, passthrough, zstd, lz4",
            other
        ),
    }
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path.to_str() == Some("-") {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(path).with_context(|| format!("reading input file {:?}", path))
    }
}

/// Open an SRCZ1 file with whichever codec its header names.
fn open_reader(path: &Path) -> anyhow::Result<Reader> {
    let header = read_header(path).with_context(|| format!("reading header of {:?}", path))?;
    let codec = codec_by_id(header.codec_id)?;
    Reader::open(path, codec)
}

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

/// Render span or entry text on one line, escaping control bytes.
fn preview(text: &[u8], max: usize) -> String {
    let mut out = String::new();
    for &b in text.iter().take(max) {
        match b {
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            b if b.is_ascii_graphic() || b == b' ' => out.push(b as char),
            b => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    if text.len() > max {
        out.push('…');
    }
    out
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_compress(
    input: PathBuf,
    output: PathBuf,
    codec_name: &str,
    language: Option<&str>,
    zstd_level: i32,
) -> anyhow::Result<()> {
    let profile = resolve_profile(language, &input)?;
    let codec = codec_from_name(codec_name, profile, zstd_level)?;
    let codec_display = codec.name().to_string();
    let codec_id = codec.id();

    let raw = read_input(&input)?;
    let t0 = Instant::now();

    let mut writer = Writer::create(&output, codec)
        .with_context(|| format!("creating output file {:?}", output))?;
    writer.write(&raw)?;
    let summary = writer.finish()?;
    let elapsed = t0.elapsed();

    eprintln!("  codec       : {}", codec_display);
    if codec_id == CODEC_SOURCE {
        eprintln!("  language    : {}", profile.name);
    }
    eprintln!("  raw size    : {}", human_bytes(summary.raw_len));
    eprintln!("  compressed  : {}", human_bytes(summary.file_len));
    eprintln!("  ratio       : {:.2}x", summary.ratio());
    eprintln!(
        "  throughput  : {}/s",
        human_bytes((summary.raw_len as f64 / elapsed.as_secs_f64()) as u64)
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_decompress(input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let reader = open_reader(&input)?;

    let t0 = Instant::now();
    let raw = reader.read_all()?;
    let elapsed = t0.elapsed();

    let is_stdout = output.to_str() == Some("-");
    let mut dst: Box<dyn Write> = if is_stdout {
        Box::new(io::stdout())
    } else {
        Box::new(
            File::create(&output).with_context(|| format!("creating output file {:?}", output))?,
        )
    };
    dst.write_all(&raw)?;
    dst.flush()?;

    eprintln!("  codec       : {}", reader.codec().name());
    eprintln!("  raw size    : {}", human_bytes(raw.len() as u64));
    eprintln!(
        "  throughput  : {}/s",
        human_bytes((raw.len() as f64 / elapsed.as_secs_f64()) as u64)
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_inspect(file: PathBuf, show_entries: bool) -> anyhow::Result<()> {
    let reader = open_reader(&file)?;
    let file_size = std::fs::metadata(&file)?.len();

    println!("=== SRCZ1 File: {:?} ===", file);
    println!();
    println!("  format version : {}", reader.header.version);
    println!(
        "  codec          : {} (id={})",
        reader.codec().name(),
        reader.header.codec_id
    );
    println!("  raw size       : {}", human_bytes(reader.raw_size()));
    println!("  compressed     : {}", human_bytes(reader.compressed_size()));
    println!("  file on disk   : {}", human_bytes(file_size));
    println!("  ratio          : {:.2}x", reader.ratio());
    println!("  flags          : 0x{:08x}", reader.header.flags);
    println!("  checksum       : {:016x}", reader.header.checksum);

    if reader.header.codec_id != CODEC_SOURCE {
        return Ok(());
    }

    let stream = CompressedStream::from_bytes(reader.payload())
        .context("source payload is not a valid stream")?;
    println!("  stream mode    : {}", stream.mode().name());

    let CompressedStream::Dictionary {
        dictionary,
        payload,
    } = &stream
    else {
        return Ok(());
    };
    println!("  escape byte    : 0x{:02x}", dictionary.escape());
    println!("  entries        : {}", dictionary.len());
    println!(
        "  header bytes   : {}",
        human_bytes((reader.payload().len() - payload.len()) as u64)
    );
    println!("  payload bytes  : {}", human_bytes(payload.len() as u64));

    if show_entries {
        println!();
        println!(
            "  {:>6}  {:<11}  {:>6}  {:>9}  text",
            "index", "kind", "len", "frequency"
        );
        println!("  {}", "-".repeat(56));
        for (i, e) in dictionary.entries().iter().enumerate() {
            println!(
                "  {:>6}  {:<11}  {:>6}  {:>9}  {}",
                i,
                e.kind.name(),
                e.text.len(),
                e.frequency,
                preview(&e.text, 40)
            );
        }
    }

    Ok(())
}

fn run_scan(file: PathBuf, language: Option<&str>) -> anyhow::Result<()> {
    let profile = resolve_profile(language, &file)?;
    let data = read_input(&file)?;
    let spans = Scanner::new(profile).scan(&data);

    println!("=== Spans: {:?} ({} profile) ===", file, profile.name);
    println!();
    println!("  {:>8}  {:<11}  {:>6}  text", "offset", "kind", "len");
    println!("  {}", "-".repeat(56));
    let mut totals: BTreeMap<u8, (usize, usize)> = BTreeMap::new();
    for span in &spans {
        println!(
            "  {:>8}  {:<11}  {:>6}  {}",
            span.offset,
            span.kind.name(),
            span.len(),
            preview(span.text, 40)
        );
        let t = totals.entry(span.kind.tag()).or_default();
        t.0 += 1;
        t.1 += span.len();
    }

    println!();
    println!("  {:<11}  {:>8}  {:>10}", "kind", "spans", "bytes");
    for kind in SpanKind::ALL {
        if let Some((count, bytes)) = totals.get(&kind.tag()) {
            println!("  {:<11}  {:>8}  {:>10}", kind.name(), count, bytes);
        }
    }
    println!("  {:<11}  {:>8}  {:>10}", "total", spans.len(), data.len());
    Ok(())
}

fn gzip_len(data: &[u8]) -> anyhow::Result<usize> {
    let mut enc = GzEncoder::new(Vec::new(), GzCompression::default());
    enc.write_all(data)?;
    Ok(enc.finish()?.len())
}

fn run_compare(file: PathBuf, language: Option<&str>) -> anyhow::Result<()> {
    let profile = resolve_profile(language, &file)?;
    let data = read_input(&file)?;

    let codecs: Vec<Box<dyn Codec>> = vec![
        Box::new(PassThroughCodec),
        Box::new(SourceCodec::with_profile(profile)),
        Box::new(ZstdCodec::default()),
        Box::new(Lz4Codec),
    ];

    println!(
        "=== Compare: {:?} ({}, {} profile) ===",
        file,
        human_bytes(data.len() as u64),
        profile.name
    );
    println!();
    println!(
        "  {:<12}  {:>12}  {:>8}  {:>10}",
        "codec", "size", "ratio", "time"
    );
    println!("  {}", "-".repeat(48));

    let print_row = |name: &str, size: usize, secs: f64| {
        let ratio = if size == 0 {
            1.0
        } else {
            data.len() as f64 / size as f64
        };
        println!(
            "  {:<12}  {:>12}  {:>7.2}x  {:>8.3}ms",
            name,
            human_bytes(size as u64),
            ratio,
            secs * 1000.0
        );
    };

    for codec in &codecs {
        let t0 = Instant::now();
        let packed = codec.compress(&data)?;
        let elapsed = t0.elapsed();
        let restored = codec.decompress(&packed)?;
        if restored != data {
            anyhow::bail!("{} did not round-trip {:?}", codec.name(), file);
        }
        print_row(codec.name(), packed.len(), elapsed.as_secs_f64());
    }

    let t0 = Instant::now();
    let gz = gzip_len(&data)?;
    print_row("gzip", gz, t0.elapsed().as_secs_f64());
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Compress {
            input,
            output,
            codec,
            language,
            zstd_level,
        } => run_compress(input, output, &codec, language.as_deref(), zstd_level),
        Commands::Decompress { input, output } => run_decompress(input, output),
        Commands::Inspect { file, entries } => run_inspect(file, entries),
        Commands::Scan { file, language } => run_scan(file, language.as_deref()),
        Commands::Compare { file, language } => run_compare(file, language.as_deref()),
    }
}
