//! Batch processing over an image directory.
//!
//! Thin driver around the orchestrator: one recognition job per image,
//! sequentially, with per-image failures reported and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::extract::{Classifier, LineLabel};
use crate::ocr::{JobOrchestrator, NvcfClient};
use crate::output::LeadTables;

/// File extensions accepted as input images.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Process every image in `image_dir` and write the lead tables.
pub async fn run(image_dir: &Path, output_dir: &Path, settings: Settings) -> anyhow::Result<()> {
    let images = collect_images(image_dir)?;
    if images.is_empty() {
        println!("No images found in {}", image_dir.display());
        return Ok(());
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let client = NvcfClient::new(settings.clone());
    let orchestrator = JobOrchestrator::new(
        client,
        Classifier::default(),
        settings.poll_interval,
        settings.max_poll_attempts,
    );

    let progress = ProgressBar::new(images.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut tables = LeadTables::new();
    let mut failed = Vec::new();

    for path in &images {
        let image_id = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        progress.set_message(image_id.clone());

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(image = %image_id, error = %e, "failed to read image");
                failed.push(image_id);
                progress.inc(1);
                continue;
            }
        };

        match orchestrator.run(&bytes, &image_id).await {
            Ok(records) => {
                tracing::info!(
                    image = %image_id,
                    names = records.names.len(),
                    companies = records.companies.len(),
                    "image processed"
                );
                tables.add(&image_id, &records);
            }
            Err(e) => {
                tracing::error!(image = %image_id, error = %e, "image failed");
                failed.push(image_id);
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    tables
        .write_to(output_dir)
        .with_context(|| format!("writing tables to {}", output_dir.display()))?;

    println!(
        "{} {} names, {} companies from {} of {} images",
        style("Done:").green().bold(),
        tables.name_count(),
        tables.company_count(),
        images.len() - failed.len(),
        images.len(),
    );
    if !failed.is_empty() {
        println!("{} {}", style("Failed:").red().bold(), failed.join(", "));
    }

    Ok(())
}

/// Classify a local text file and print labeled lines.
pub fn classify_file(file: &Path) -> anyhow::Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;

    let classifier = Classifier::default();
    for raw_line in text.split('\n') {
        if let Some(line) = classifier.classify_line(raw_line) {
            let label = match line.label {
                LineLabel::Company => "company",
                LineLabel::Name => "name",
            };
            println!("{label:<8} {}", line.cleaned);
        }
    }

    Ok(())
}

/// Collect image files from a directory, sorted by filename.
fn collect_images(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        if matches!(ext.as_deref(), Some(e) if IMAGE_EXTENSIONS.contains(&e)) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.PNG", "notes.txt", "c.jpeg", "d.gif"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.jpg")).unwrap();

        let images = collect_images(dir.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.jpg", "c.jpeg"]);
    }
}
