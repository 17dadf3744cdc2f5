//! CSV and JSON sniffing.
//!
//! Neither sniffer computes statistics; they only look at shape and header
//! names to pick a description.

use serde::de::Error as _;
use serde_json::Value;

/// Shown when uploaded JSON cannot be parsed.
pub fn json_parse_issue(file_name: &str) -> String {
    format!(
        "📋 **JSON File**: {file_name}\n\n\
         I received the JSON file but encountered a parsing issue. Please ensure the file contains valid JSON format.\n\n\
         **Tip**: You can validate JSON at jsonlint.com"
    )
}

/// Domain guessed from CSV header names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDomain {
    Production,
    Safety,
    Quality,
    Generic,
}

impl DataDomain {
    pub fn from_headers(headers: &[String]) -> Self {
        let any_header = |words: &[&str]| {
            headers
                .iter()
                .any(|h| words.iter().any(|w| h.contains(w)))
        };

        if any_header(&["production", "output", "tonnes"]) {
            DataDomain::Production
        } else if any_header(&["safety", "incident", "accident"]) {
            DataDomain::Safety
        } else if any_header(&["quality", "ash", "moisture", "btu"]) {
            DataDomain::Quality
        } else {
            DataDomain::Generic
        }
    }

    fn title(&self) -> Option<&'static str> {
        match self {
            DataDomain::Production => Some("Production Data"),
            DataDomain::Safety => Some("Safety Records"),
            DataDomain::Quality => Some("Coal Quality Data"),
            DataDomain::Generic => None,
        }
    }

    fn analyses(&self) -> [&'static str; 4] {
        match self {
            DataDomain::Production => [
                "Production trends over time",
                "Output comparisons by shift/area",
                "Efficiency metrics calculation",
                "Target vs actual comparison",
            ],
            DataDomain::Safety => [
                "Incident frequency rates",
                "Trend analysis over time",
                "Root cause categorization",
                "Risk area identification",
            ],
            DataDomain::Quality => [
                "Quality parameter trends",
                "Grade distribution analysis",
                "Specification compliance check",
                "Value calculation",
            ],
            DataDomain::Generic => [
                "Statistical summary",
                "Trend visualization",
                "Correlation analysis",
                "Anomaly detection",
            ],
        }
    }
}

/// Shape of a CSV payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSummary {
    /// Data rows, excluding the header line
    pub rows: usize,
    /// Header names, trimmed and lowercased
    pub headers: Vec<String>,
}

impl CsvSummary {
    pub fn domain(&self) -> DataDomain {
        DataDomain::from_headers(&self.headers)
    }
}

pub fn sniff_csv(content: &str) -> CsvSummary {
    let lines: Vec<&str> = content.trim().split('\n').collect();
    let headers = lines
        .first()
        .map(|header| {
            header
                .split(',')
                .map(|h| h.trim().to_lowercase())
                .collect::<Vec<String>>()
        })
        .unwrap_or_default();

    CsvSummary {
        rows: lines.len().saturating_sub(1),
        headers,
    }
}

pub fn analyze_csv(content: &str, file_name: &str) -> String {
    let summary = sniff_csv(content);
    let domain = summary.domain();

    let mut analysis = format!("📊 **CSV Data Analysis**: {file_name}\n\n");
    analysis.push_str(&format!(
        "**Overview**:\n• Rows: {}\n• Columns: {}\n\n",
        summary.rows,
        summary.headers.len()
    ));
    analysis.push_str(&format!(
        "**Detected Columns**:\n{}\n\n",
        bullet_list(&summary.headers)
    ));

    if let Some(title) = domain.title() {
        analysis.push_str(&format!("**Data Type**: {}\n\n", title));
    }
    analysis.push_str("**Available Analysis**:\n");
    for item in domain.analyses() {
        analysis.push_str(&format!("• {}\n", item));
    }

    analysis.push_str("\n**Next Steps**: Ask me specific questions about this data!");
    analysis
}

/// Top-level shape of a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonSummary {
    /// Array: element count and the field names of the first element
    Array { records: usize, fields: Vec<String> },
    /// Anything else: key count and all key names in document order
    Object { keys: Vec<String> },
}

/// Fails on invalid JSON and on a `null` where keys are listed (the document
/// itself, or the first element of an array).
pub fn sniff_json(content: &str) -> Result<JsonSummary, serde_json::Error> {
    let value: Value = serde_json::from_str(content)?;

    let summary = match value {
        Value::Null => return Err(serde_json::Error::custom("document is null")),
        Value::Array(items) => {
            if let Some(Value::Null) = items.first() {
                return Err(serde_json::Error::custom("first record is null"));
            }
            JsonSummary::Array {
                records: items.len(),
                fields: items.first().map(object_keys).unwrap_or_default(),
            }
        }
        other => JsonSummary::Object {
            keys: object_keys(&other),
        },
    };
    Ok(summary)
}

fn object_keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

const MAX_LISTED_KEYS: usize = 10;

pub fn render_json_summary(summary: &JsonSummary, file_name: &str) -> String {
    let mut analysis = format!("📋 **JSON Data Analysis**: {file_name}\n\n");

    match summary {
        JsonSummary::Array { records, fields } => {
            analysis.push_str(&format!("**Structure**: Array\n**Records**: {}\n\n", records));
            if *records > 0 {
                analysis.push_str(&format!("**Fields Detected**:\n{}\n\n", bullet_list(fields)));
            }
        }
        JsonSummary::Object { keys } => {
            analysis.push_str(&format!("**Structure**: Object\n**Keys**: {}\n\n", keys.len()));
            let shown: Vec<String> = keys.iter().take(MAX_LISTED_KEYS).cloned().collect();
            analysis.push_str(&format!("**Top-level Keys**:\n{}\n", bullet_list(&shown)));
            if keys.len() > MAX_LISTED_KEYS {
                analysis.push_str(&format!("• ... and {} more\n", keys.len() - MAX_LISTED_KEYS));
            }
            analysis.push('\n');
        }
    }

    analysis.push_str(
        "**I can help you**:\n\
         • Extract specific data points\n\
         • Analyze patterns and trends\n\
         • Generate summary statistics\n\
         • Compare with benchmarks\n\n\
         What would you like to know about this data?",
    );
    analysis
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
