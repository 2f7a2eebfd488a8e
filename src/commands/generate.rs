use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::layout;
use crate::preset::Preset;
use crate::render::render_document;

use super::{load_importers, parse_date};

const DATE_FORMAT: &str = "%Y/%m/%d";

pub fn run(preset: Preset, start: &str, end: &str, output: Option<PathBuf>) -> Result<()> {
    let start = parse_date(start, DATE_FORMAT, "start date")?;
    let end = parse_date(end, DATE_FORMAT, "end date")?;
    if end < start {
        anyhow::bail!("End date {} is before start date {}", end, start);
    }

    let importers = load_importers(&preset)?;
    let pages = layout::pages(preset.mode, start, end);
    let document = render_document(preset.mode, &pages, &importers);

    let output = output.unwrap_or(preset.output);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&output, document)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!("{} pages written", pages.len());
    println!("{} generated successfully!", output.display());

    Ok(())
}
