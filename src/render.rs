//! Plain-text rendering of results, previews and history for the terminal shell.
//!
//! Absent optional fields are skipped entirely rather than printed as placeholders.

use std::fmt::Write;

use crate::model::{AnalysisResult, AnalysisState, PreviewResult, PreviewState};

const SNIPPET_CHARS: usize = 60;

pub fn analysis_card(r: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Verdict:    {}", r.classification.as_str());
    let _ = writeln!(out, "Confidence: {:.1}%", r.confidence_score);
    let _ = writeln!(out, "Origin:     {}", r.country_of_origin);
    let _ = writeln!(
        out,
        "Source:     {}",
        if r.is_verified { "verified" } else { "unverified" }
    );
    if let Some(meta) = &r.source_metadata {
        for (label, value) in [
            ("Name", &meta.name),
            ("Domain", &meta.domain),
            ("Author", &meta.author),
            ("Published", &meta.date),
        ] {
            if let Some(v) = value {
                let _ = writeln!(out, "  {label}: {v}");
            }
        }
    }
    if let Some(expl) = &r.explanation {
        let _ = writeln!(out, "{expl}");
    }
    out
}

pub fn analysis_state(s: &AnalysisState) -> String {
    match s {
        AnalysisState::Idle => String::new(),
        AnalysisState::Pending => "Analyzing...\n".to_string(),
        AnalysisState::Succeeded(r) => analysis_card(r),
        AnalysisState::Failed(e) => format!("Error: {}\n", e.message()),
    }
}

/// Image line only when the service returned an image; a broken image URL is the
/// viewer's problem, not a failed preview.
pub fn preview_card(p: &PreviewResult) -> String {
    let mut out = String::new();
    if let Some(img) = &p.image {
        let _ = writeln!(out, "[image] {img}");
    }
    if let Some(t) = &p.title {
        let _ = writeln!(out, "{t}");
    }
    if let Some(d) = &p.domain {
        let _ = writeln!(out, "{d}");
    }
    if let Some(desc) = &p.description {
        let _ = writeln!(out, "{desc}");
    }
    match (&p.author, &p.date) {
        (Some(a), Some(d)) => {
            let _ = writeln!(out, "By {a} · {d}");
        }
        (Some(a), None) => {
            let _ = writeln!(out, "By {a}");
        }
        (None, Some(d)) => {
            let _ = writeln!(out, "{d}");
        }
        (None, None) => {}
    }
    out
}

pub fn preview_state(s: &PreviewState) -> String {
    match s {
        PreviewState::Idle => String::new(),
        PreviewState::Pending => "Loading preview...\n".to_string(),
        PreviewState::Succeeded(p) => preview_card(p),
        PreviewState::Failed(e) => format!("Preview error: {}\n", e.message()),
    }
}

pub fn history_list(entries: &[AnalysisResult]) -> String {
    if entries.is_empty() {
        return "No analyses yet.\n".to_string();
    }
    let mut out = String::new();
    for (i, r) in entries.iter().enumerate() {
        let when = r
            .timestamp_utc()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| r.timestamp.clone());
        let _ = writeln!(
            out,
            "{i:>2}. [{} {:.0}%] {} ({when})",
            r.classification.as_str(),
            r.confidence_score,
            snippet(&r.content)
        );
    }
    out
}

fn snippet(s: &str) -> String {
    let one_line = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if one_line.chars().count() <= SNIPPET_CHARS {
        one_line
    } else {
        let mut cut: String = one_line.chars().take(SNIPPET_CHARS - 3).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::model::{Classification, SourceMetadata};

    fn result(content: &str) -> AnalysisResult {
        AnalysisResult {
            classification: Classification::Fake,
            confidence_score: 99.0,
            country_of_origin: "Unknown".into(),
            is_verified: false,
            source_metadata: Some(SourceMetadata {
                domain: Some("example.com".into()),
                ..SourceMetadata::default()
            }),
            explanation: None,
            content: content.into(),
            timestamp: "2025-09-06T09:15:00.000Z".into(),
        }
    }

    #[test]
    fn preview_without_image_has_no_image_line() {
        let p = PreviewResult {
            title: Some("Example".into()),
            domain: Some("example.com".into()),
            ..PreviewResult::default()
        };
        assert_eq!(preview_card(&p), "Example\nexample.com\n");
    }

    #[test]
    fn card_skips_absent_metadata() {
        let card = analysis_card(&result("x"));
        assert!(card.contains("Verdict:    Fake"));
        assert!(card.contains("  Domain: example.com"));
        assert!(!card.contains("Author"));
    }

    #[test]
    fn failed_states_show_message() {
        let s = PreviewState::Failed(ClientError::Request {
            status: 400,
            message: "Could not connect to the URL".into(),
        });
        assert_eq!(preview_state(&s), "Preview error: Could not connect to the URL\n");
        assert_eq!(analysis_state(&AnalysisState::Idle), "");
    }

    #[test]
    fn history_lines_are_indexed_and_truncated() {
        let long = "word ".repeat(40);
        let out = history_list(&[result("short one"), result(&long)]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], " 0. [Fake 99%] short one (09:15:00)");
        assert!(lines[1].starts_with(" 1. [Fake 99%] word word"));
        assert!(lines[1].contains("..."));
    }
}
