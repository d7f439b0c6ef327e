//! Terminal and JSON output.

use anyhow::Result;
use mesh::ingest::AnalyzedModel;
use mesh::measure::{MeasurementAdvisory, ModelStatistics};
use mesh::pricing::{MaterialCatalog, PriceEstimate, PrintSettings, VolumeSource};
use owo_colors::OwoColorize;
use serde::Serialize;

const RULE: &str = "──────────────────────────────────────────────";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    file: &'a str,
    format: String,
    statistics: &'a ModelStatistics,
    advisories: Vec<&'static str>,
    settings: &'a PrintSettings,
    estimate: &'a PriceEstimate,
}

/// Print the whole report as one JSON document on stdout.
pub fn print_json(
    model: &AnalyzedModel,
    settings: &PrintSettings,
    estimate: &PriceEstimate,
) -> Result<()> {
    let report = JsonReport {
        file: &model.file_name,
        format: model.format.to_string(),
        statistics: model.statistics(),
        advisories: model
            .measurement
            .advisories
            .iter()
            .map(MeasurementAdvisory::message)
            .collect(),
        settings,
        estimate,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Print statistics and the price breakdown as a table.
pub fn print_table(
    model: &AnalyzedModel,
    settings: &PrintSettings,
    catalog: &MaterialCatalog,
    estimate: &PriceEstimate,
) {
    let stats = model.statistics();

    println!();
    println!(
        "{}",
        format!("{} ({})", model.file_name, model.format)
            .bright_white()
            .bold()
    );
    println!("{}", RULE.bright_white());
    row("Polygons", &stats.polygons.to_string());
    row(
        "Dimensions",
        &format!(
            "{:.2} × {:.2} × {:.2} cm",
            stats.dimensions_cm.x, stats.dimensions_cm.y, stats.dimensions_cm.z
        ),
    );
    row("Volume", &format!("{:.2} cm³", stats.volume_cm3));
    row("Surface area", &format!("{:.2} cm²", stats.surface_area_cm2));
    row("Bounding box", &format!("{:.2} cm³", stats.bbox_volume_cm3));

    let material_name = catalog
        .get(&settings.material)
        .map_or(settings.material.as_str(), |m| m.name.as_str());

    println!("{}", RULE.bright_white());
    row("Material", material_name);
    row("Quality", settings.quality.as_str());

    match estimate {
        PriceEstimate::NotComputable => {
            println!("{}", RULE.bright_white());
            println!("{}", "No volume to price.".yellow());
        }
        PriceEstimate::Quoted(quote) => {
            if let (VolumeSource::ShellCorrected, Some(shell)) = (quote.source, &quote.shell) {
                let [x, y, z] = shell.inner_dimensions_mm;
                row(
                    "Shell",
                    &format!(
                        "{:.2} − {:.2} cm³ (cavity {x:.1} × {y:.1} × {z:.1} mm)",
                        shell.outer_volume_cm3, shell.inner_volume_cm3
                    ),
                );
            }
            row("Print volume", &format!("{:.2} cm³", quote.effective_volume_cm3));
            row("Density", &format!("{} g/cm³", quote.density_g_cm3));
            row("Weight", &format!("{:.1} g", quote.weight_g));
            row(
                "Rate",
                &format!("{:.2} {}/g", quote.price_per_gram, quote.currency),
            );
            if quote.quantity > 1 {
                row(
                    "Unit price",
                    &format!("{:.2} {}", quote.unit_price, quote.currency),
                );
                row("Quantity", &quote.quantity.to_string());
            }
            println!("{}", RULE.bright_white());
            println!(
                "  {:<14} {}",
                "Estimate".bold(),
                format!("{:.2} {}", quote.total, quote.currency)
                    .green()
                    .bold()
            );
        }
    }

    println!();
    for advisory in &model.measurement.advisories {
        println!("{} {}", "note:".cyan(), advisory.message());
    }
}

fn row(label: &str, value: &str) {
    println!("  {label:<14} {value}");
}
