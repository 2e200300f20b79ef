//! Text cleaning and lead classification.
//!
//! Recognized text comes back from OCR as a loose blob of lines. This
//! module normalizes each line and sorts it into one of two record kinds:
//! person names and company names. The decision rule is a case-insensitive
//! substring search against a fixed vocabulary of organizational markers;
//! any hit labels the line a company, everything else is a name.

/// Marker tokens that conventionally denote a business entity.
pub const DEFAULT_MARKERS: &[&str] = &[
    "corp",
    "inc",
    "llc",
    "ltd",
    "company",
    "group",
    "solutions",
    "services",
    "technologies",
];

/// Label assigned to a cleaned line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLabel {
    Name,
    Company,
}

/// A single cleaned unit of recognized text.
#[derive(Debug, Clone)]
pub struct ExtractedLine {
    /// Text as it appeared in the source.
    pub raw: String,
    /// Text after control-character stripping and whitespace collapse.
    pub cleaned: String,
    /// Classification of the cleaned text.
    pub label: LineLabel,
}

/// Ordered classification output for one recognized-text blob.
///
/// Both sequences preserve order of appearance in the source text and
/// retain duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecords {
    pub names: Vec<String>,
    pub companies: Vec<String>,
}

impl ExtractedRecords {
    /// Total number of extracted entries across both kinds.
    pub fn len(&self) -> usize {
        self.names.len() + self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.companies.is_empty()
    }
}

/// Normalize a raw line of recognized text.
///
/// Strips non-printable characters (Unicode `Cc`), collapses whitespace
/// runs (spaces, tabs, newlines) to a single space, and trims. Total and
/// idempotent; all-noise input yields the empty string.
pub fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Classifies cleaned lines as company or person names.
///
/// The marker vocabulary is fixed at construction and read-only afterward.
#[derive(Debug, Clone)]
pub struct Classifier {
    markers: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS.iter().map(|m| m.to_string()))
    }
}

impl Classifier {
    /// Create a classifier with a custom marker vocabulary.
    pub fn new(markers: impl IntoIterator<Item = String>) -> Self {
        Self {
            markers: markers.into_iter().map(|m| m.to_lowercase()).collect(),
        }
    }

    /// Label a single cleaned line.
    ///
    /// An empty string carries no marker and falls through to `Name`;
    /// callers that do not want empty entries must filter first, as
    /// [`Classifier::parse`] does.
    pub fn classify(&self, cleaned: &str) -> LineLabel {
        let lower = cleaned.to_lowercase();
        if self.markers.iter().any(|m| lower.contains(m.as_str())) {
            LineLabel::Company
        } else {
            LineLabel::Name
        }
    }

    /// Clean and classify one raw line, or `None` if it cleans to nothing.
    pub fn classify_line(&self, raw: &str) -> Option<ExtractedLine> {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            return None;
        }
        let label = self.classify(&cleaned);
        Some(ExtractedLine {
            raw: raw.to_string(),
            cleaned,
            label,
        })
    }

    /// Split a recognized-text blob into classified records.
    ///
    /// Lines that clean down to nothing are dropped without being
    /// classified. Relative order of appearance is preserved within each
    /// output sequence.
    pub fn parse(&self, raw_text: &str) -> ExtractedRecords {
        let mut records = ExtractedRecords::default();
        for raw_line in raw_text.split('\n') {
            let Some(line) = self.classify_line(raw_line) else {
                continue;
            };
            match line.label {
                LineLabel::Company => records.companies.push(line.cleaned),
                LineLabel::Name => records.names.push(line.cleaned),
            }
        }
        records
    }
}
