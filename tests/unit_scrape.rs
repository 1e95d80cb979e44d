// Unit tests for transcript extraction from article markup.
//
// Exercises the speaker-boundary rules on inline HTML fixtures; no network.

use earcall::error::PipelineError;
use earcall::scrape::transcript::TranscriptExtractor;

/// Build a page the way the transcript site lays one out: each speaker
/// heading is a <strong> inside its own paragraph, followed by their remarks.
fn transcript_page(blocks: &[(&str, Vec<&str>)]) -> String {
    let mut html = String::from("<html><body><div class=\"article\">");
    for (speaker, remarks) in blocks {
        html.push_str(&format!("<p><strong>{speaker}</strong></p>\n"));
        for remark in remarks {
            html.push_str(&format!("<p>{remark}</p>\n"));
        }
    }
    html.push_str("</div></body></html>");
    html
}

#[test]
fn extracts_prepared_remarks() {
    let html = transcript_page(&[
        ("Executives", vec!["Jane Doe - CFO", "Tim Roe - CEO"]),
        ("Operator", vec!["Good day and welcome to the call."]),
        ("Jane Doe", vec!["Thank you, operator."]),
        ("Tim Roe", vec!["Revenue grew 12% this quarter.", "Margins expanded."]),
        ("Question-and-Answer Session", vec![]),
        ("Operator", vec!["Our first question comes from..."]),
    ]);
    let ex = TranscriptExtractor::new().unwrap();
    let text = ex.extract(&html).unwrap();

    // Operator is strong[1], so the first speaker is strong[3] = "Tim Roe"
    assert!(text.starts_with("Tim Roe\n"), "{text:?}");
    assert!(text.contains("Revenue grew 12% this quarter."));
    assert!(text.contains("Margins expanded."));
    assert!(!text.contains("Question-and-Answer Session"));
    assert!(!text.contains("Our first question"));
}

#[test]
fn repeated_operator_shifts_first_speaker() {
    let html = transcript_page(&[
        ("Operator", vec!["Welcome."]),
        ("Ann Lee", vec!["Thanks."]),
        ("Operator", vec!["Please go ahead."]),
        ("Bob Ray", vec!["Results were strong."]),
        ("Question-and-Answer Session", vec![]),
    ]);
    let ex = TranscriptExtractor::new().unwrap();
    let text = ex.extract(&html).unwrap();
    assert!(text.starts_with("Bob Ray\n"), "{text:?}");
    assert!(text.contains("Results were strong."));
}

#[test]
fn early_qa_marker_falls_back_to_next_heading() {
    let html = transcript_page(&[
        ("Operator", vec!["Welcome."]),
        ("Ann Lee", vec!["Our quarter was solid."]),
        ("Question-and-Answer Session", vec![]),
        ("Operator", vec!["First question."]),
    ]);
    let ex = TranscriptExtractor::new().unwrap();
    let text = ex.extract(&html).unwrap();
    assert!(text.starts_with("Ann Lee\n"), "{text:?}");
    assert!(text.contains("Our quarter was solid."));
}

#[test]
fn ends_at_last_qa_marker() {
    let html = transcript_page(&[
        ("Operator", vec!["Welcome."]),
        ("Ann Lee", vec!["Hi."]),
        ("Bob Ray", vec!["We will take questions in the Question-and-Answer Session later."]),
        ("Question-and-Answer Session", vec![]),
    ]);
    let ex = TranscriptExtractor::new().unwrap();
    let text = ex.extract(&html).unwrap();
    assert!(text.contains("We will take questions in the "), "{text:?}");
}

#[test]
fn nested_markup_and_entities_are_cleaned() {
    let html = "<p><strong>Operator</strong></p><p><strong>A</strong></p>\
                <p><strong><span>Chief Executive</span></strong></p>\
                <p>Chief Executive</p><p>R&amp;D rose, <em>as planned</em>.</p>\
                <p><strong>Question-and-Answer Session</strong></p>";
    let ex = TranscriptExtractor::new().unwrap();
    let text = ex.extract(html).unwrap();
    assert!(text.starts_with("Chief Executive\n"), "{text:?}");
    assert!(text.contains("R&D rose, as planned."), "{text:?}");
}

#[test]
fn missing_qa_marker_is_format_error() {
    let html = transcript_page(&[
        ("Operator", vec!["Welcome."]),
        ("Ann Lee", vec!["Hi."]),
        ("Bob Ray", vec!["Numbers."]),
    ]);
    let ex = TranscriptExtractor::new().unwrap();
    assert!(matches!(ex.extract(&html), Err(PipelineError::ScrapeFormat(_))));
}

#[test]
fn page_without_headings_is_format_error() {
    let ex = TranscriptExtractor::new().unwrap();
    let result = ex.extract("<html><body><p>Access denied</p></body></html>");
    assert!(matches!(result, Err(PipelineError::ScrapeFormat(_))));
}
