// src/utils/match_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::extractors::FieldTrace;
use crate::utils::error::AppError;

/// Renders a document with every rule match wrapped in `[[field]]...[[/field]]`,
/// preceded by a hit/miss summary per field.
pub fn render_trace(document: &str, traces: &[FieldTrace]) -> String {
    let mut out = String::from("=== FIELD MATCHES ===\n");
    for trace in traces {
        match &trace.matched {
            Some(text) => out.push_str(&format!("  {:<32} {:?}\n", trace.field, text)),
            None => out.push_str(&format!("  {:<32} (no match)\n", trace.field)),
        }
    }
    out.push_str("\n=== ANNOTATED DOCUMENT ===\n");

    let mut highlights: Vec<(usize, usize, &str)> = traces
        .iter()
        .filter_map(|t| t.span.map(|(start, end)| (start, end, t.field)))
        .collect();
    highlights.sort_by_key(|h| h.0); // Sort by position

    let mut last_pos = 0;
    for (start, end, field) in highlights {
        // Overlapping matches are listed above but only the first is marked inline
        if start < last_pos {
            continue;
        }
        out.push_str(&document[last_pos..start]);
        out.push_str(&format!("[[{}]]", field));
        out.push_str(&document[start..end]);
        out.push_str(&format!("[[/{}]]", field));
        last_pos = end;
    }

    // Add any remaining content
    if last_pos < document.len() {
        out.push_str(&document[last_pos..]);
    }
    out
}

/// Writes [`render_trace`] output to `filename`.
pub fn save_trace(document: &str, traces: &[FieldTrace], filename: &str) -> Result<(), AppError> {
    let path = Path::new(filename);
    let mut file = File::create(path)?;
    file.write_all(render_trace(document, traces).as_bytes())?;

    tracing::info!("Saved match trace to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ReportExtractor;

    #[test]
    fn test_render_marks_matches_inline() {
        let doc = "Campanha: Natal\nGasto Total: R$ 10,00\n";
        let traces = ReportExtractor::new().trace(doc);
        let rendered = render_trace(doc, &traces);

        assert!(rendered.contains("[[campaignName]]Campanha: Natal[[/campaignName]]"));
        assert!(rendered.contains("[[investment.totalSpent]]Gasto Total: R$ 10,00[[/investment.totalSpent]]"));
        assert!(rendered.contains("settings.status"));
        assert!(rendered.contains("(no match)"));
    }

    #[test]
    fn test_render_skips_overlapping_spans() {
        let traces = vec![
            FieldTrace { field: "a", span: Some((0, 5)), matched: Some("abcde".into()) },
            FieldTrace { field: "b", span: Some((2, 4)), matched: Some("cd".into()) },
        ];
        let rendered = render_trace("abcdefg", &traces);
        assert!(rendered.ends_with("[[a]]abcde[[/a]]fg"));
        assert!(!rendered.contains("[[b]]"));
    }
}
