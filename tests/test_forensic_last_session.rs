//! Integration test for the forensic last-session analyzer (C6), covering
//! the headline two-revision scenario: a page's `/Contents` is rewritten by
//! an incremental update to point at a freshly added content stream, and
//! `analyze_last_session` should recover that stream's text.

use pdf_oxide::document::PdfDocument;
use pdf_oxide::forensic::{self, FragmentKind};

/// Appends an `N 0 obj ... endobj` object to `buf`, returning its byte offset.
fn push_object(buf: &mut Vec<u8>, number: u32, body: &str) -> u64 {
    let offset = buf.len() as u64;
    buf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", number, body).as_bytes());
    offset
}

fn push_stream_object(buf: &mut Vec<u8>, number: u32, dict_extra: &str, content: &str) -> u64 {
    let body = format!(
        "<< {} /Length {} >>\nstream\n{}\nendstream",
        dict_extra,
        content.len(),
        content
    );
    push_object(buf, number, &body)
}

/// Builds a two-revision PDF: revision 1 has a single page showing
/// "Original"; revision 2 adds object 10 (a content stream showing
/// "Inserted") and rewrites the page's `/Contents` to reference it.
fn build_two_revision_pdf() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"%PDF-1.4\n");

    // Revision 1: objects 1 (Catalog), 2 (Pages), 3 (Page), 4 (Font), 5 (content).
    let mut offsets = vec![0u64; 11];
    offsets[1] = push_object(&mut buf, 1, "<< /Type /Catalog /Pages 2 0 R >>");
    offsets[2] = push_object(&mut buf, 2, "<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    offsets[3] = push_object(
        &mut buf,
        3,
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>",
    );
    offsets[4] = push_object(&mut buf, 4, "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>");
    offsets[5] = push_stream_object(&mut buf, 5, "", "BT /F1 12 Tf 72 700 Td (Original) Tj ET");

    let xref1_offset = buf.len() as u64;
    buf.extend_from_slice(b"xref\n0 6\n0000000000 65535 f \n");
    for num in 1..=5u32 {
        buf.extend_from_slice(format!("{:010} 00000 n \n", offsets[num as usize]).as_bytes());
    }
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size 6 /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            xref1_offset
        )
        .as_bytes(),
    );

    // Revision 2: object 3 (page) updated to point at a new object 10, which
    // carries the "Inserted" content stream.
    offsets[3] = push_object(
        &mut buf,
        3,
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 10 0 R >>",
    );
    offsets[10] = push_stream_object(&mut buf, 10, "", "BT /F1 12 Tf 72 700 Td (Inserted) Tj ET");

    let xref2_offset = buf.len() as u64;
    buf.extend_from_slice(b"xref\n");
    buf.extend_from_slice(format!("3 1\n{:010} 00000 n \n", offsets[3]).as_bytes());
    buf.extend_from_slice(format!("10 1\n{:010} 00000 n \n", offsets[10]).as_bytes());
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size 11 /Root 1 0 R /Prev {} >>\nstartxref\n{}\n%%EOF\n",
            xref1_offset, xref2_offset
        )
        .as_bytes(),
    );

    buf
}

#[test]
fn analyze_last_session_recovers_the_inserted_content_stream() {
    let pdf_bytes = build_two_revision_pdf();
    let path = std::env::temp_dir().join("pdf_oxide_forensic_two_revision_test.pdf");
    std::fs::write(&path, &pdf_bytes).expect("failed to write synthetic PDF fixture");

    let mut doc = PdfDocument::open(&path).expect("failed to open synthetic two-revision PDF");
    let report = forensic::analyze_last_session(&mut doc).expect("analyze_last_session failed");

    assert_eq!(report.mode, forensic::AnalysisMode::IncrementalUpdate);

    let inserted = report
        .fragments
        .iter()
        .find(|f| f.object_id == 10)
        .expect("expected a fragment for object 10");

    assert_eq!(inserted.kind, FragmentKind::ContentStream);
    assert_eq!(inserted.page_index, Some(0));
    assert_eq!(inserted.text.as_deref(), Some("Inserted"));

    let _ = std::fs::remove_file(&path);
}
