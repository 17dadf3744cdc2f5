//! Upload analysis.
//!
//! Picks a canned analysis block from the MIME type and file name. Only CSV
//! and JSON content is ever read; images, spreadsheets and PDFs are judged by
//! name alone.

pub mod image;
pub mod tabular;

use std::path::Path;
use tracing::info;

/// Which analysis branch an upload falls into. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Csv,
    Json,
    Excel,
    Pdf,
    Other,
}

impl UploadKind {
    pub fn detect(file_name: &str, mime_type: &str) -> Self {
        let extension = file_extension(file_name);
        let ext = extension.as_str();

        if mime_type.starts_with("image/") {
            UploadKind::Image
        } else if mime_type == "text/csv" || ext == "csv" {
            UploadKind::Csv
        } else if mime_type == "application/json" || ext == "json" {
            UploadKind::Json
        } else if mime_type.contains("spreadsheet") || ext == "xlsx" || ext == "xls" {
            UploadKind::Excel
        } else if mime_type == "application/pdf" || ext == "pdf" {
            UploadKind::Pdf
        } else {
            UploadKind::Other
        }
    }

    /// Whether the branch needs the file's text.
    pub fn reads_content(&self) -> bool {
        matches!(self, UploadKind::Csv | UploadKind::Json)
    }
}

/// Lowercased extension without the dot, empty when there is none.
pub fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

/// MIME type for an upload: the declared one, or a guess from magic bytes
/// when the client sent none.
pub fn effective_mime_type(declared: &str, data: &[u8]) -> String {
    if !declared.trim().is_empty() {
        return declared.to_string();
    }
    infer::get(data)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_default()
}

/// One decimal, ties rounded up (1280 B is "1.3 KB").
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", round_tenths(bytes as f64 / KB as f64))
    } else {
        format!("{:.1} MB", round_tenths(bytes as f64 / MB as f64))
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Build the analysis text for an upload. Never fails: unreadable JSON turns
/// into a user-facing message.
pub fn classify(file_name: &str, mime_type: &str, size: u64, content: Option<&str>) -> String {
    let kind = UploadKind::detect(file_name, mime_type);
    info!("Analysing upload {} ({:?}, {} bytes)", file_name, kind, size);

    let content = content.unwrap_or_default();
    match kind {
        UploadKind::Image => image::analyze_image(file_name),
        UploadKind::Csv => tabular::analyze_csv(content, file_name),
        UploadKind::Json => match tabular::sniff_json(content) {
            Ok(summary) => tabular::render_json_summary(&summary, file_name),
            Err(e) => {
                info!("JSON upload {} did not parse: {}", file_name, e);
                tabular::json_parse_issue(file_name)
            }
        },
        UploadKind::Excel => format!(
            "📊 **Excel File Detected**: {file_name}\n\n\
             I've received your Excel file ({}). For full Excel parsing, please export to CSV format or share specific data points you'd like me to analyze.\n\n\
             **Tip**: You can ask me about:\n\
             • Production trends\n\
             • Quality metrics\n\
             • Safety statistics\n\
             • Cost analysis",
            format_file_size(size)
        ),
        UploadKind::Pdf => format!(
            "📄 **PDF Document**: {file_name}\n\n\
             I've received your PDF ({}). This appears to be a document related to mining operations.\n\n\
             **I can help you with**:\n\
             • Summarizing key findings\n\
             • Extracting production data\n\
             • Analyzing safety reports\n\
             • Reviewing geological surveys\n\n\
             Please tell me what specific information you're looking for.",
            format_file_size(size)
        ),
        UploadKind::Other => format!(
            "📁 **File Received**: {file_name}\n\n\
             File type: {}\n\
             Size: {}\n\n\
             I've received your file. Please describe what analysis you'd like me to perform on this data.",
            if mime_type.is_empty() { "unknown" } else { mime_type },
            format_file_size(size)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_order() {
        assert_eq!(UploadKind::detect("photo.csv", "image/png"), UploadKind::Image);
        assert_eq!(UploadKind::detect("data.CSV", ""), UploadKind::Csv);
        assert_eq!(UploadKind::detect("x", "application/json"), UploadKind::Json);
        assert_eq!(
            UploadKind::detect("report", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            UploadKind::Excel
        );
        assert_eq!(UploadKind::detect("old.xls", ""), UploadKind::Excel);
        assert_eq!(UploadKind::detect("plan.pdf", ""), UploadKind::Pdf);
        assert_eq!(UploadKind::detect("notes.txt", "text/plain"), UploadKind::Other);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_format_file_size_rounds_ties_up() {
        assert_eq!(format_file_size(1280), "1.3 KB");
        assert_eq!(format_file_size(2304), "2.3 KB");
        assert_eq!(format_file_size(1024 * 1024 + 256 * 1024), "1.3 MB");
    }

    #[test]
    fn test_effective_mime_type() {
        let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(effective_mime_type("", &png_magic), "image/png");
        assert_eq!(effective_mime_type("text/csv", &png_magic), "text/csv");
        assert_eq!(effective_mime_type("", b"plain words"), "");
    }

    #[test]
    fn test_other_reports_unknown_type() {
        let text = classify("blob.bin", "", 2048, None);
        assert!(text.contains("File type: unknown"));
        assert!(text.contains("Size: 2.0 KB"));
    }
}
