//! skinlight - run the shading passes of a scene file
//!
//! Loads a TOML scene, runs the lighting, depth or shadow pass over its
//! vertex stream and prints one JSON record per vertex.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use skinlight_cli::{load_scene, CheckReport, DepthReport, ShadeReport, ShadowReport};

#[derive(Parser)]
#[command(name = "skinlight")]
#[command(about = "Skinning, lighting and shadow-depth reference passes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the lighting pass
    Shade {
        /// Path to the scene file
        scene: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Run the depth pass and report packed depths
    Depth {
        /// Path to the scene file
        scene: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Run the shadow pass against the scene's depth map
    Shadow {
        /// Path to the scene file
        scene: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a scene without running any pass
    Check {
        /// Path to the scene file
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Shade {
            scene,
            output,
            pretty,
        } => {
            tracing::info!("Shading {:?}", scene);
            let loaded = load_scene(&scene)?;
            emit(&ShadeReport::build(&loaded), output.as_deref(), pretty)?;
        }

        Commands::Depth {
            scene,
            output,
            pretty,
        } => {
            tracing::info!("Depth pass over {:?}", scene);
            let loaded = load_scene(&scene)?;
            emit(&DepthReport::build(&loaded), output.as_deref(), pretty)?;
        }

        Commands::Shadow {
            scene,
            output,
            pretty,
        } => {
            tracing::info!("Shadow pass over {:?}", scene);
            let loaded = load_scene(&scene)?;
            let report = ShadowReport::build(&loaded)
                .with_context(|| format!("Cannot run shadow pass on {:?}", scene))?;
            emit(&report, output.as_deref(), pretty)?;
        }

        Commands::Check { scene } => {
            tracing::info!("Checking scene {:?}", scene);
            let loaded = load_scene(&scene)?;
            emit(&CheckReport::build(&loaded), None, false)?;
            tracing::info!("Scene is valid!");
        }
    }

    Ok(())
}

fn emit<T: Serialize>(report: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            tracing::info!("Wrote {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
