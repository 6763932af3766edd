use anyhow::{Context, Result};
use inquiry_core::report::{SectionKind, remove_sections};
use std::path::Path;

pub fn run(file: &Path, exclude: &[SectionKind]) -> Result<()> {
    let document = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    print!("{}", remove_sections(&document, |section| exclude.contains(&section)));
    Ok(())
}
