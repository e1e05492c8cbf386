//! Firmware provenance lane CLI
//!
//! Entry point for the `fwprov` command-line tool.

use clap::{Parser, Subcommand};
use fw_provenance::metadata::METADATA_FILENAME;
use fw_provenance::{
    verify_binary_identity, BuildMetadata, ConfigError, LaneConfig, VersionStore, CONFIG_PATH,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "fwprov")]
#[command(about = "Firmware build provenance and identity lane", version)]
struct Cli {
    /// Path to lane config file (default: .fw/provenance.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Increment the patch component of the version store
    Bump,

    /// Reconcile version metadata into <output_dir>/version.json
    Stamp {
        /// Version override (default: read from the version store)
        version: Option<String>,

        /// Build description override
        description: Option<String>,
    },

    /// Verify a device-reported SHA256 prefix against a build artifact
    Verify {
        /// Path to the reference artifact (the built ELF)
        artifact: PathBuf,

        /// Digest prefix reported by the running firmware
        reported: String,
    },

    /// Show the current version store state
    Show,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Bump => run_bump(&config),
        Commands::Stamp {
            version,
            description,
        } => run_stamp(&config, version, description),
        Commands::Verify { artifact, reported } => run_verify(&config, &artifact, &reported),
        Commands::Show => run_show(&config),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<LaneConfig, ConfigError> {
    match path {
        // An explicitly-given config file must exist and parse
        Some(p) => LaneConfig::from_file(&p),
        None => LaneConfig::load_or_default(Path::new(CONFIG_PATH)),
    }
}

fn run_bump(config: &LaneConfig) {
    let mut store = match VersionStore::load(&config.store_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            println!("Failed to increment version");
            process::exit(1);
        }
    };

    match store.bump_patch() {
        Ok((old, new)) => {
            println!("Incremented patch version: {} -> {}", old, new);
            println!("Version incremented successfully");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            println!("Failed to increment version");
            process::exit(1);
        }
    }
}

fn run_stamp(config: &LaneConfig, version: Option<String>, description: Option<String>) {
    // Assembly never fails: every input has a fallback
    let metadata = BuildMetadata::collect(version, description, config, Path::new("."));

    match metadata.write_to_dir(&config.output_dir) {
        Ok(path) => {
            println!("Updated {} with:", path.display());
            println!("  Version: {}", metadata.version);
            println!("  Build Date: {}", metadata.build_date);
            println!("  Git Commit: {}", metadata.git_commit);
            println!("  Git Version: {}", metadata.git_version);
        }
        Err(e) => {
            eprintln!("Error writing build metadata: {}", e);
            process::exit(1);
        }
    }
}

fn run_verify(config: &LaneConfig, artifact: &Path, reported: &str) {
    match verify_binary_identity(artifact, reported, config.min_prefix_len) {
        Ok(expected) => {
            println!("Artifact SHA256: {}", expected);
            println!("Reported SHA256: {}", reported);
            println!("Binary identity verified");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_show(config: &LaneConfig) {
    let store = match VersionStore::load(&config.store_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let record = store.record();
    println!("Version store: {}", store.path().display());
    println!("  Version: {}", record);
    println!("  Composed string: \"{}\"", store.composed());
    if !store.is_consistent() {
        println!("  Warning: composed string does not match components");
    }
    println!(
        "  Metadata output: {}",
        config.output_dir.join(METADATA_FILENAME).display()
    );
    println!("  Target: {}", config.target);
}
