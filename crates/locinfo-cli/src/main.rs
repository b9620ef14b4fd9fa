//! locinfo - Inspect, encode and decode log4j-compatible location records
//!
//! This tool derives the short file, method and class names of a call site
//! and writes or reads `org.apache.log4j.spi.LocationInfo` object streams.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use locinfo_core::{
    read_file, FullInfoStyle, LocationInfo, LocationSerializer, ObjectOutputStream, Record,
    SerializerConfig,
};
use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, Level};
use tracing_subscriber::EnvFilter;

/// Inspect, encode and decode log4j-compatible location records
#[derive(Parser, Debug)]
#[command(name = "locinfo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the names derived from a call site
    Inspect(SiteArgs),

    /// Serialize a call site as a Java object stream
    Encode {
        #[command(flatten)]
        site: SiteArgs,

        /// Output file (hex dump to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How fullInfo is built from the signature
        #[arg(long, value_enum, default_value = "qualified")]
        style: StyleArg,

        /// Use the short file name in fullInfo
        #[arg(long)]
        short_file_names: bool,

        /// Append an unavailable location after the call site
        #[arg(long)]
        null: bool,

        /// Overwrite existing files without prompting
        #[arg(long)]
        force: bool,
    },

    /// Print the records of a serialized stream
    Decode {
        /// Stream file to read
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SiteArgs {
    /// Full path of the source file
    #[arg(short, long)]
    file: String,

    /// Raw function signature, e.g. "int ns::Class::method(int)"
    #[arg(short, long)]
    signature: String,

    /// Line number
    #[arg(short, long)]
    line: u32,
}

impl SiteArgs {
    fn location(&self) -> LocationInfo {
        LocationInfo::new(self.file.clone(), self.signature.clone(), self.line)
    }
}

/// fullInfo construction style
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    /// ns.Bar.baz(Foo.cpp:42)
    Qualified,
    /// ns::Bar.baz(int)(Foo.cpp:42)
    Legacy,
}

impl From<StyleArg> for FullInfoStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Qualified => FullInfoStyle::Qualified,
            StyleArg::Legacy => FullInfoStyle::Legacy,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Inspect(site) => {
            print!("{}", inspect(&site.location()));
            Ok(())
        }
        Command::Encode {
            site,
            output,
            style,
            short_file_names,
            null,
            force,
        } => {
            let config = SerializerConfig::new()
                .style((*style).into())
                .short_file_names(*short_file_names);
            let mut locations = vec![site.location()];
            if *null {
                locations.push(LocationInfo::default());
            }
            let bytes = encode(&locations, config)?;

            match output {
                Some(path) => {
                    write_output_file(path, &bytes, *force)?;
                    println!("Wrote {} ({} bytes)", path.display(), bytes.len());
                }
                None => print!("{}", hex_dump(&bytes)),
            }
            Ok(())
        }
        Command::Decode { input } => {
            for line in decode_file(input)? {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

/// Render every derived view of a location
fn inspect(location: &LocationInfo) -> String {
    let qualified = LocationSerializer::new().full_info(location);
    let legacy = LocationSerializer::with_config(
        SerializerConfig::new().style(FullInfoStyle::Legacy),
    )
    .full_info(location);

    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "file:       {}", location.file_name());
    let _ = writeln!(out, "short file: {}", location.short_file_name());
    let _ = writeln!(out, "signature:  {}", location.signature());
    let _ = writeln!(out, "method:     {}", location.method_name());
    let _ = writeln!(out, "class:      {}", location.class_name());
    let _ = writeln!(out, "line:       {}", location.line_number());
    let _ = writeln!(out, "fullInfo:   {}", qualified);
    let _ = writeln!(out, "legacy:     {}", legacy);
    out
}

/// Serialize locations into a complete object stream
fn encode(locations: &[LocationInfo], config: SerializerConfig) -> Result<Vec<u8>> {
    let serializer = LocationSerializer::with_config(config);
    let mut stream = ObjectOutputStream::in_memory().context("Failed to start object stream")?;

    for location in locations {
        trace!("Encoding {}", location);
        serializer
            .write(location, &mut stream)
            .with_context(|| format!("Failed to serialize location: {}", location))?;
    }

    let bytes = stream.into_bytes();
    debug!("Encoded {} location(s) into {} bytes", locations.len(), bytes.len());
    Ok(bytes.to_vec())
}

/// Read a stream file and render one line per record
fn decode_file(input: &Path) -> Result<Vec<String>> {
    if !input.is_file() {
        bail!("Input path is not a file: {}", input.display());
    }

    let records = read_file(input)
        .with_context(|| format!("Failed to decode stream: {}", input.display()))?;
    info!("Decoded {} record(s) from {}", records.len(), input.display());

    Ok(records
        .into_iter()
        .map(|record| match record {
            Record::Null => "null".to_string(),
            Record::FullInfo(full_info) => full_info,
        })
        .collect())
}

/// Format bytes as 16 hex pairs per line
fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for chunk in bytes.chunks(16) {
        let line: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Write the stream to disk, refusing to clobber unless forced
fn write_output_file(output_path: &Path, bytes: &[u8], force: bool) -> Result<()> {
    // Create parent directories
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    if output_path.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            output_path.display()
        );
    }

    let mut file = fs::File::create(output_path)
        .with_context(|| format!("Failed to create file: {}", output_path.display()))?;

    file.write_all(bytes)
        .with_context(|| format!("Failed to write file: {}", output_path.display()))?;

    Ok(())
}
