//! meshquote: measure an STL or OBJ model and estimate its print price.
//!
//! # Usage
//!
//! ```text
//! meshquote part.stl
//! meshquote part.obj --material asa-abs --quality fine --quantity 4
//! meshquote part.stl --no-shell --json
//! meshquote part.stl --wall 1.6 --bottom 2.0 --catalog prices.json
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `warn`); each
//! `-v` raises it one level.

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use mesh::ingest::ingest_bytes;
use mesh::io::write_stl_binary;
use mesh::pricing::{MaterialCatalog, PrintSettings, QualityTier, ShellCorrectionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Measure a 3D model and estimate what it costs to print.
#[derive(Debug, Parser)]
#[command(name = "meshquote")]
#[command(about = "Measure an STL or OBJ model and estimate its print price", long_about = None)]
#[command(version)]
struct Cli {
    /// Model file (.stl or .obj)
    #[arg(name = "FILE")]
    path: PathBuf,

    /// Material id from the catalog
    #[arg(long, short, default_value = "pla-petg")]
    material: String,

    /// Print quality tier (standard, fine)
    #[arg(long, short, default_value = "standard")]
    quality: QualityTier,

    /// Price the measured volume instead of the shell estimate
    #[arg(long)]
    no_shell: bool,

    /// Side wall thickness for the shell estimate, in mm
    #[arg(long, value_name = "MM")]
    wall: Option<f64>,

    /// Floor thickness for the shell estimate, in mm
    #[arg(long, value_name = "MM")]
    bottom: Option<f64>,

    /// Number of copies
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// JSON price list to use instead of the built-in one
    #[arg(long, value_name = "JSON")]
    catalog: Option<PathBuf>,

    /// Print a JSON report instead of the table
    #[arg(long)]
    json: bool,

    /// Also write the model, centered on its bounding box, as binary STL
    #[arg(long, value_name = "STL")]
    export_centered: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> PrintSettings {
        let mut shell = ShellCorrectionConfig::default().with_enabled(!self.no_shell);
        if let Some(wall) = self.wall {
            shell = shell.with_wall_thickness(wall);
        }
        if let Some(bottom) = self.bottom {
            shell = shell.with_bottom_thickness(bottom);
        }

        PrintSettings::default()
            .with_material(self.material.clone())
            .with_quality(self.quality)
            .with_shell(shell)
            .with_quantity(self.quantity)
    }

    fn catalog(&self) -> Result<MaterialCatalog> {
        match &self.catalog {
            Some(path) => MaterialCatalog::from_json_file(path)
                .with_context(|| format!("failed to load catalog {}", path.display())),
            None => Ok(MaterialCatalog::default()),
        }
    }

    const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    let catalog = cli.catalog()?;
    let settings = cli.settings();

    let file_name = cli
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bytes = std::fs::read(&cli.path)
        .with_context(|| format!("failed to read {}", cli.path.display()))?;

    let model = ingest_bytes(&file_name, &bytes).map_err(|e| {
        let notice = e.notice();
        anyhow::Error::new(e).context(notice)
    })?;
    let estimate = model
        .quote(&settings, &catalog)
        .with_context(|| format!("failed to price {file_name}"))?;

    if let Some(out) = &cli.export_centered {
        let file = std::fs::File::create(out)
            .with_context(|| format!("failed to create {}", out.display()))?;
        write_stl_binary(&model.centered_mesh(), std::io::BufWriter::new(file))
            .with_context(|| format!("failed to write {}", out.display()))?;
        info!(path = %out.display(), "wrote centered model");
    }

    if cli.json {
        report::print_json(&model, &settings, &estimate)?;
    } else {
        report::print_table(&model, &settings, &catalog, &estimate);
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("meshquote").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_the_order_form() {
        let cli = parse(&["part.stl"]);
        let settings = cli.settings();

        assert_eq!(settings, PrintSettings::default());
        assert!(settings.shell.enabled);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn options_flow_into_settings() {
        let cli = parse(&[
            "part.obj",
            "--material",
            "tpu",
            "-q",
            "fine",
            "--no-shell",
            "--wall",
            "1.6",
            "--quantity",
            "5",
            "-vv",
        ]);
        let settings = cli.settings();

        assert_eq!(settings.material, "tpu");
        assert_eq!(settings.quality, QualityTier::Fine);
        assert!(!settings.shell.enabled);
        assert!((settings.shell.wall_thickness_mm - 1.6).abs() < f64::EPSILON);
        assert!((settings.shell.bottom_thickness_mm - 2.4).abs() < f64::EPSILON);
        assert_eq!(settings.quantity, 5);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn unknown_quality_is_rejected() {
        let args = ["meshquote", "part.stl", "--quality", "draft"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let cli = parse(&["part.stl", "--catalog", "/nonexistent/prices.json"]);
        let err = cli.catalog().unwrap_err();
        assert!(err.to_string().contains("prices.json"));
    }
}
