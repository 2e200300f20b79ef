//! CSV table output for extracted leads.
//!
//! Two tables keyed by source image: one row per extracted person name in
//! `names.csv`, one row per company in `companies.csv`. Rows appear in
//! extraction order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::extract::ExtractedRecords;

/// Accumulates per-image records and writes the output tables.
#[derive(Debug, Default)]
pub struct LeadTables {
    name_rows: Vec<(String, String)>,
    company_rows: Vec<(String, String)>,
}

impl LeadTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one image's records, preserving extraction order.
    pub fn add(&mut self, image_id: &str, records: &ExtractedRecords) {
        for name in &records.names {
            self.name_rows.push((image_id.to_string(), name.clone()));
        }
        for company in &records.companies {
            self.company_rows
                .push((image_id.to_string(), company.clone()));
        }
    }

    pub fn name_count(&self) -> usize {
        self.name_rows.len()
    }

    pub fn company_count(&self) -> usize {
        self.company_rows.len()
    }

    /// Write `names.csv` and `companies.csv` into `dir`.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<()> {
        write_table(&dir.join("names.csv"), "image,name", &self.name_rows)?;
        write_table(
            &dir.join("companies.csv"),
            "image,company",
            &self.company_rows,
        )?;
        Ok(())
    }
}

fn write_table(path: &Path, header: &str, rows: &[(String, String)]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{header}")?;
    for (image, value) in rows {
        writeln!(out, "{},{}", csv_field(image), csv_field(value))?;
    }
    out.flush()
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
