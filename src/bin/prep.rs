//! Offline corpus preparation tool.
//!
//! Runs one corpus through scan → split → shard → metadata and prints a
//! summary plus the collected validation diagnostics, so missing or
//! oversized clips can be remediated before a re-run.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use open_speech::{
    CommonVoiceConfig, LibriSpeechConfig, PipelineError, PrepareReport, VoxForgeConfig,
    prepare_common_voice, prepare_librispeech, prepare_voxforge,
};

#[derive(Parser)]
#[command(name = "open-speech-prep", about = "Prepare speech corpora into sharded record files")]
struct Cli {
    #[command(subcommand)]
    corpus: Corpus,
}

#[derive(Subcommand)]
enum Corpus {
    /// Prepare a Common Voice tree (tab-separated split manifests).
    CommonVoice {
        /// Directory holding dev.tsv, test.tsv and train.tsv.
        #[arg(long)]
        extracted: PathBuf,
        /// Directory holding the corpus wav files.
        #[arg(long)]
        audio: PathBuf,
        /// Output directory for shards and metadata.
        #[arg(long)]
        out: PathBuf,
        /// Seed for the shard shuffle.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Prepare a LibriSpeech tree (per-chapter transcript files).
    Librispeech {
        /// The extracted LibriSpeech root.
        #[arg(long)]
        extracted: PathBuf,
        /// Output directory for shards and metadata.
        #[arg(long)]
        out: PathBuf,
        /// Seed for the shard shuffle.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Prepare a VoxForge tree (prompt-file archives, stratified split).
    Voxforge {
        /// Directory holding the extracted archive directories.
        #[arg(long)]
        extracted: PathBuf,
        /// Output directory for shards and metadata.
        #[arg(long)]
        out: PathBuf,
        /// Seed for the stratified split and shard shuffle.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn run(cli: Cli) -> Result<PrepareReport, PipelineError> {
    match cli.corpus {
        Corpus::CommonVoice {
            extracted,
            audio,
            out,
            seed,
        } => {
            let mut config = CommonVoiceConfig::new(extracted, audio, out);
            config.shard.seed = seed;
            prepare_common_voice(&config)
        }
        Corpus::Librispeech { extracted, out, seed } => {
            let mut config = LibriSpeechConfig::new(extracted, out);
            config.shard.seed = seed;
            prepare_librispeech(&config)
        }
        Corpus::Voxforge { extracted, out, seed } => {
            let mut config = VoxForgeConfig::new(extracted, out);
            config.shard.seed = seed;
            config.split_seed = seed;
            prepare_voxforge(&config)
        }
    }
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(report) => {
            println!("Prepared corpus: {}", report.corpus);
            for (label, rows) in &report.split_rows {
                println!("  {label}: {rows} examples");
            }
            if !report.errors.is_empty() {
                println!("\nErrors:");
                for error in &report.errors {
                    println!("{error}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("preparation failed: {err}");
            ExitCode::FAILURE
        }
    }
}
