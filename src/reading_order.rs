//! Reading order assembly for page text (spec C4/C5).
//!
//! Runs are sorted by descending baseline y, then ascending x. Gaps wider
//! than ~3 units insert a space; a new line (y delta beyond half the current
//! font size) inserts a newline. See [`crate::layout::TextSpan`] for the
//! run representation this module consumes.

use crate::layout::TextSpan;

const LINE_BREAK_GAP: f32 = 3.0;

/// Sort text spans into reading order and join them into page text.
///
/// Spans are first ordered by descending y (top of page first), then by
/// ascending x on ties. Adjacent spans separated by more than
/// [`LINE_BREAK_GAP`] units of horizontal gap get a space inserted between
/// them; spans on a new baseline (more than half the font size away in y)
/// start a new line.
pub fn assemble_page_text(mut spans: Vec<TextSpan>) -> String {
    spans.sort_by(|a, b| {
        b.bbox
            .y
            .partial_cmp(&a.bbox.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                a.bbox
                    .x
                    .partial_cmp(&b.bbox.x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    let mut out = String::new();
    let mut prev: Option<&TextSpan> = None;

    for span in &spans {
        if let Some(p) = prev {
            let y_delta = (p.bbox.y - span.bbox.y).abs();
            let new_line = y_delta > p.font_size * 0.5;
            if new_line {
                out.push('\n');
            } else {
                let gap = span.bbox.x - (p.bbox.x + p.bbox.width);
                if gap > LINE_BREAK_GAP {
                    out.push(' ');
                }
            }
        }
        out.push_str(&span.text);
        prev = Some(span);
    }

    out
}

/// Order spans without concatenating them, for callers that need the
/// per-span sequence (e.g. header/footer band splitting).
pub fn order_spans(mut spans: Vec<TextSpan>) -> Vec<TextSpan> {
    spans.sort_by(|a, b| {
        b.bbox
            .y
            .partial_cmp(&a.bbox.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                a.bbox
                    .x
                    .partial_cmp(&b.bbox.x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn make_span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, Rect::new(x, y, 50.0, 12.0), "Test", 12.0)
    }

    #[test]
    fn orders_top_to_bottom() {
        let spans = vec![
            make_span("Bottom", 0.0, 50.0),
            make_span("Top", 0.0, 100.0),
            make_span("Middle", 0.0, 75.0),
        ];
        let ordered = order_spans(spans);
        assert_eq!(ordered[0].text, "Top");
        assert_eq!(ordered[1].text, "Middle");
        assert_eq!(ordered[2].text, "Bottom");
    }

    #[test]
    fn orders_left_to_right_on_same_line() {
        let spans = vec![
            make_span("Right", 100.0, 100.0),
            make_span("Left", 0.0, 100.0),
            make_span("Center", 50.0, 100.0),
        ];
        let ordered = order_spans(spans);
        assert_eq!(ordered[0].text, "Left");
        assert_eq!(ordered[1].text, "Center");
        assert_eq!(ordered[2].text, "Right");
    }

    #[test]
    fn inserts_newline_between_lines() {
        let spans = vec![make_span("First", 0.0, 100.0), make_span("Second", 0.0, 50.0)];
        let text = assemble_page_text(spans);
        assert_eq!(text, "First\nSecond");
    }

    #[test]
    fn inserts_space_across_gap() {
        let spans = vec![make_span("Hello", 0.0, 100.0), make_span("World", 60.0, 100.0)];
        let text = assemble_page_text(spans);
        assert_eq!(text, "Hello World");
    }
}
