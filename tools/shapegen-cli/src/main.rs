//! shapegen - build packed primitive meshes
//!
//! Reads a scene description (TOML), generates every submesh, packs them
//! into one vertex/index buffer pair and writes an OBJ plus a JSON region
//! manifest.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shapegen::export::{write_manifest, write_merged_obj};
use shapegen::{SceneDescription, build_scene};

#[derive(Parser)]
#[command(name = "shapegen")]
#[command(about = "Procedural primitive mesh generator and packer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and pack a scene
    Build {
        /// Path to scene.toml (default: built-in shapes demo)
        scene: Option<PathBuf>,

        /// Output OBJ file
        #[arg(short, long, default_value = "shapes.obj")]
        output: PathBuf,

        /// Also write a JSON region manifest
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Validate a scene without generating anything
    Check {
        /// Path to scene.toml
        scene: PathBuf,
    },

    /// Print per-submesh vertex and index counts
    Counts {
        /// Path to scene.toml (default: built-in shapes demo)
        scene: Option<PathBuf>,
    },

    /// Print the built-in shapes demo as TOML
    Demo,
}

fn load_scene(path: Option<&Path>) -> Result<SceneDescription> {
    match path {
        Some(path) => SceneDescription::load(path)
            .with_context(|| format!("Failed to load scene {:?}", path)),
        None => Ok(SceneDescription::shapes_demo()),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    Ok(BufWriter::new(file))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            scene,
            output,
            manifest,
        } => {
            let description = load_scene(scene.as_deref())?;
            let merged = build_scene(&description)?;

            tracing::info!("Writing {:?}", output);
            let mut writer = create(&output)?;
            write_merged_obj(&merged, &mut writer)?;
            writer.flush()?;

            if let Some(path) = manifest {
                tracing::info!("Writing {:?}", path);
                let mut writer = create(&path)?;
                write_manifest(&merged, &mut writer)?;
                writer.flush()?;
            }
            tracing::info!("Build complete!");
        }

        Commands::Check { scene } => {
            tracing::info!("Checking scene {:?}", scene);
            let description = load_scene(Some(&scene))?;
            description.validate()?;
            tracing::info!(
                "Scene is valid! ({} submeshes)",
                description.submeshes.len()
            );
        }

        Commands::Counts { scene } => {
            let description = load_scene(scene.as_deref())?;
            let mut out = std::io::stdout().lock();
            for (name, counts) in description.counts()? {
                writeln!(
                    out,
                    "{name:<16} {:>8} vertices {:>8} indices",
                    counts.vertices, counts.indices
                )?;
            }
            let total = description.total_counts()?;
            writeln!(
                out,
                "{:<16} {:>8} vertices {:>8} indices",
                "total", total.vertices, total.indices
            )?;
        }

        Commands::Demo => {
            print!("{}", SceneDescription::shapes_demo().to_toml_string()?);
        }
    }

    Ok(())
}
