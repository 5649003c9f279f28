use clap::Parser;
use std::path::PathBuf;

/// Resolve the latest tag of every manylinux/musllinux build image and write
/// them to the pinned images file
#[derive(Parser)]
#[command(name = "docker-pins")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File to write (defaults to cibuildwheel/resources/pinned_docker_images.cfg
    /// under the repository root)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Config file with registry endpoints and the default output path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the resolved pins to stdout instead of writing the file
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
