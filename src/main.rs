//! `huff` - compress, decompress and inspect files with Huffman coding.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use huffman_toolkit::report::{CodeReport, FrequencyReport, StatsReport, TreeDiagram};
use huffman_toolkit::{compress_file, decompress, HuffmanCodec};

#[derive(Parser, Debug)]
#[command(name = "huff")]
#[command(version)]
#[command(about = "Huffman coding toolkit", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file
    Compress {
        /// File to compress
        input: PathBuf,
        /// Where to write the compressed artifact
        output: PathBuf,
    },

    /// Decompress an artifact
    Decompress {
        /// Compressed artifact
        input: PathBuf,
        /// Where to write the result (default: stdout)
        output: Option<PathBuf>,
    },

    /// Show frequencies, codes, tree and stats for some input
    Inspect {
        /// File to inspect
        #[arg(conflicts_with = "text", required_unless_present = "text")]
        input: Option<PathBuf>,
        /// Inspect this text instead of a file
        #[arg(long)]
        text: Option<String>,
        /// Skip the tree diagram
        #[arg(long)]
        no_tree: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    match args.command {
        Command::Compress { input, output } => {
            let stats = compress_file(&input, &output)
                .with_context(|| format!("compressing {}", input.display()))?;
            info!("wrote {} ({} bytes)", output.display(), stats.artifact_bytes);
            print!("{}", StatsReport(&stats));
        }
        Command::Decompress { input, output } => {
            let artifact =
                std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let decoded =
                decompress(&artifact).with_context(|| format!("decompressing {}", input.display()))?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &decoded)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("saved {} bytes to {}", decoded.len(), path.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&decoded)?;
                    stdout.flush()?;
                }
            }
        }
        Command::Inspect {
            input,
            text,
            no_tree,
        } => {
            let data = match (input, text) {
                (_, Some(text)) => text.into_bytes(),
                (Some(path), None) => {
                    std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?
                }
                (None, None) => bail!("nothing to inspect"),
            };
            if data.is_empty() {
                bail!("can't inspect empty input");
            }

            let codec = HuffmanCodec::from_bytes(&data)?;
            println!("{}", FrequencyReport(codec.frequencies()));
            println!("{}", CodeReport(codec.code_table()));
            if !no_tree {
                println!("{}", TreeDiagram(codec.tree()));
            }
            print!("{}", StatsReport(&codec.stats()));
        }
    }

    Ok(())
}
