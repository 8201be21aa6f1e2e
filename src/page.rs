//! Page Analyzer (C5): aggregates per-page artifacts into a single record.
//!
//! Given a page object, this walks its content stream via
//! [`crate::extractors::text`], splits the assembled runs into header/footer/body
//! bands, lists the fonts and images it uses, and records its annotations and
//! derived structural flags. This is the record [`crate::cache`] persists and
//! [`crate::query`] filters over.

use lazy_static::lazy_static;
use regex::Regex;

use crate::document::PdfDocument;
use crate::error::Result;
use crate::extractors::images::{describe_page_images, ImageDescriptor};
use crate::layout::TextSpan;
use crate::reading_order::{assemble_page_text, order_spans};

/// Fraction of page height above which a run is considered part of the header band.
const HEADER_BAND_THRESHOLD: f32 = 0.90;
/// Fraction of page height below which a run is considered part of the footer band.
const FOOTER_BAND_THRESHOLD: f32 = 0.10;
/// Fraction of page height below which a run falls in the signature region (C8).
const SIGNATURE_BAND_THRESHOLD: f32 = 0.30;

lazy_static! {
    /// Matches `R$` followed by digits, e.g. `R$ 1.234,56` or `R$10`.
    static ref RE_MONEY: Regex = Regex::new(r"R\$\s*\d").unwrap();
    /// Matches an 11-digit run or a dotted/dashed 3-3-3-2 national-id form (CPF).
    static ref RE_CPF: Regex =
        Regex::new(r"\d{11}|\d{3}[.\s]\d{3}[.\s]\d{3}-\d{2}").unwrap();
}

/// Page orientation, derived from the media box aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Width <= height.
    Portrait,
    /// Width > height.
    Landscape,
}

/// Everything the page analyzer records about one annotation, independent of
/// [`crate::annotations::Annotation`]'s richer editing-oriented fields.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSummary {
    /// `/Contents` string, if present.
    pub contents: Option<String>,
    /// `/T` (title/author) string, if present.
    pub title: Option<String>,
    /// `/Subj` string, if present.
    pub subject: Option<String>,
}

/// The analysis record for one page: what the cache store persists.
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    /// Zero-based page index.
    pub page_index: usize,
    /// Full page text, in baseline reading order.
    pub text: String,
    /// Text of runs in the top 10% of the page (by media-box height).
    pub header: String,
    /// Text of runs in the bottom 10% of the page.
    pub footer: String,
    /// Distinct font resource names used on the page.
    pub fonts: Vec<String>,
    /// Image descriptors (metadata only, no pixel data).
    pub images: Vec<ImageDescriptor>,
    /// Annotation summaries, in `/Annots` order.
    pub annotations: Vec<AnnotationSummary>,
    /// Whether the page body matches the monetary pattern.
    pub has_money: bool,
    /// Whether the page body matches the national-id pattern.
    pub has_cpf: bool,
    /// Portrait or landscape, by media-box aspect ratio.
    pub orientation: Orientation,
    /// Text of runs in the bottom 30% of the page — the region signatures live in.
    pub signature: String,
}

/// Analyze one page, producing its [`PageAnalysis`] record.
pub fn analyze_page(doc: &mut PdfDocument, page_index: usize) -> Result<PageAnalysis> {
    let info = doc.get_page_info(page_index)?;
    let page_height = info.media_box.height.max(1.0);

    // Sorted once up front so the band splits below preserve reading order,
    // and each band's `assemble_page_text` call resorts an already-sorted slice.
    let spans = order_spans(doc.extract_spans(page_index)?);
    let signature = signature_region_text(spans.clone(), page_height);
    let (header_spans, footer_spans, body_spans) = split_bands(spans, page_height);

    let text = assemble_page_text(body_spans);
    let header = assemble_page_text(header_spans);
    let footer = assemble_page_text(footer_spans);

    let resources = doc.get_page_resources(page_index)?;
    let fonts = list_font_names(doc, &resources)?;
    let images = describe_page_images(doc, &resources)?;
    let annotations = list_annotations(doc, page_index)?;

    let has_money = RE_MONEY.is_match(&text);
    let has_cpf = RE_CPF.is_match(&text);
    let orientation = if info.media_box.width <= info.media_box.height {
        Orientation::Portrait
    } else {
        Orientation::Landscape
    };

    Ok(PageAnalysis {
        page_index,
        text,
        header,
        footer,
        fonts,
        images,
        annotations,
        has_money,
        has_cpf,
        orientation,
        signature,
    })
}

/// Text of runs in the bottom 30% of the page — the region signatures live in.
fn signature_region_text(spans: Vec<TextSpan>, page_height: f32) -> String {
    let threshold = page_height * SIGNATURE_BAND_THRESHOLD;
    let region: Vec<TextSpan> = spans.into_iter().filter(|s| s.bbox.y <= threshold).collect();
    assemble_page_text(region)
}

/// Split runs into (header, footer, body) by their baseline y relative to page height.
fn split_bands(
    spans: Vec<TextSpan>,
    page_height: f32,
) -> (Vec<TextSpan>, Vec<TextSpan>, Vec<TextSpan>) {
    let header_y = page_height * HEADER_BAND_THRESHOLD;
    let footer_y = page_height * FOOTER_BAND_THRESHOLD;

    let mut header = Vec::new();
    let mut footer = Vec::new();
    let mut body = Vec::new();

    for span in spans {
        if span.bbox.y >= header_y {
            header.push(span);
        } else if span.bbox.y <= footer_y {
            footer.push(span);
        } else {
            body.push(span);
        }
    }

    (header, footer, body)
}

fn list_font_names(doc: &mut PdfDocument, resources: &crate::object::Object) -> Result<Vec<String>> {
    let fonts = crate::extractors::text::load_page_fonts(doc, resources)?;
    let mut names: Vec<String> = fonts.into_keys().collect();
    names.sort();
    Ok(names)
}

fn list_annotations(doc: &mut PdfDocument, page_index: usize) -> Result<Vec<AnnotationSummary>> {
    let annotations = doc.get_annotations(page_index)?;
    Ok(annotations
        .into_iter()
        .map(|a| AnnotationSummary {
            contents: a.contents,
            title: a.author,
            subject: a.subject,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn span(text: &str, y: f32) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            bbox: Rect::new(0.0, y, 10.0, 10.0),
            font_name: "F1".to_string(),
            font_size: 12.0,
        }
    }

    #[test]
    fn split_bands_assigns_by_baseline_fraction() {
        let spans = vec![span("top", 750.0), span("mid", 400.0), span("bottom", 20.0)];
        let (header, footer, body) = split_bands(spans, 792.0);
        assert_eq!(header.len(), 1);
        assert_eq!(footer.len(), 1);
        assert_eq!(body.len(), 1);
        assert_eq!(header[0].text, "top");
        assert_eq!(footer[0].text, "bottom");
        assert_eq!(body[0].text, "mid");
    }

    #[test]
    fn money_pattern_matches_reais_prefix() {
        assert!(RE_MONEY.is_match("Total: R$1234,56"));
        assert!(!RE_MONEY.is_match("No currency here"));
    }

    #[test]
    fn cpf_pattern_matches_dotted_and_plain_forms() {
        assert!(RE_CPF.is_match("123.456.789-01"));
        assert!(RE_CPF.is_match("12345678901"));
        assert!(!RE_CPF.is_match("short 123-45"));
    }
}
