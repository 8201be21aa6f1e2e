//! Forensic Analyzer (C6): recovers text added in a document's last editing session.
//!
//! Built directly on [`crate::revisions`], which isolates the unmerged xref
//! entries of each incremental update. When a document has been saved more
//! than once, the last revision's candidate set is classified and its text
//! recovered via the same content-stream interpretation [`crate::page`] uses.
//! When a document was only ever saved once, we fall back to
//! generation-numbered objects, and finally to reporting that nothing was
//! added after the document's single session.

use std::collections::HashMap;

use crate::document::PdfDocument;
use crate::error::Result;
use crate::object::{Object, ObjectRef};
use crate::reading_order::assemble_page_text;

/// What kind of object a candidate turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// A content stream embedded in a page's `/Contents`.
    ContentStream,
    /// An annotation dictionary (`/Type /Annot`).
    Annotation,
    /// A page object itself.
    PageObject,
    /// A font or other resource dictionary: no text payload to recover.
    Resource,
}

/// One piece of text traced back to the last revision (or fallback set).
#[derive(Debug, Clone)]
pub struct ForensicFragment {
    /// The candidate object's number.
    pub object_id: u32,
    /// The candidate object's generation.
    pub generation: u16,
    /// The page this fragment was found on, when one could be determined.
    pub page_index: Option<usize>,
    /// How the candidate was classified.
    pub kind: FragmentKind,
    /// Recovered text, when the kind carries one.
    pub text: Option<String>,
}

/// Which path produced a [`ForensicReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// The document has more than one `%%EOF`; fragments came from the last revision's candidate set.
    IncrementalUpdate,
    /// No incremental updates; fragments came from objects with generation > 0.
    ModifiedInPlace,
    /// Neither multiple revisions nor nonzero generations were found.
    SingleSession,
}

/// The result of analyzing a document's last editing session.
#[derive(Debug, Clone)]
pub struct ForensicReport {
    /// Which path determined this report.
    pub mode: AnalysisMode,
    /// Fragments, sorted by ascending page number then ascending object id.
    pub fragments: Vec<ForensicFragment>,
    /// `/Info /ModDate`, reported only when it differs from `/CreationDate`.
    /// Corroborating evidence only — never used to filter fragments.
    pub modification_timestamp: Option<String>,
}

/// Maps candidate object ids to the page they belong to, built once by
/// walking every page's `/Contents`, `/Annots`, and own object reference.
struct PageObjectIndex {
    content_ids: HashMap<u32, usize>,
    annot_ids: HashMap<u32, usize>,
    page_ids: HashMap<u32, usize>,
}

fn build_page_object_index(doc: &mut PdfDocument) -> Result<PageObjectIndex> {
    let mut index = PageObjectIndex {
        content_ids: HashMap::new(),
        annot_ids: HashMap::new(),
        page_ids: HashMap::new(),
    };

    let page_count = doc.page_count()?;
    for page_index in 0..page_count {
        let page_ref = doc.get_page_ref(page_index)?;
        index.page_ids.insert(page_ref.id, page_index);

        let page_obj = doc.load_object(page_ref)?;
        let Some(page_dict) = page_obj.as_dict() else {
            continue;
        };

        if let Some(contents) = page_dict.get("Contents") {
            for id in reference_ids(contents) {
                index.content_ids.insert(id, page_index);
            }
        }

        if let Some(annots) = page_dict.get("Annots") {
            if let Some(arr) = annots.as_array() {
                for item in arr {
                    for id in reference_ids(item) {
                        index.annot_ids.insert(id, page_index);
                    }
                }
            }
        }
    }

    Ok(index)
}

/// Object ids an (unresolved) `Contents`-style entry points at: either the
/// single reference itself, or each reference in an array of references.
fn reference_ids(obj: &Object) -> Vec<u32> {
    if let Some(r) = obj.as_reference() {
        vec![r.id]
    } else if let Some(arr) = obj.as_array() {
        arr.iter().filter_map(|item| item.as_reference()).map(|r| r.id).collect()
    } else {
        Vec::new()
    }
}

/// Analyze the document's last editing session and recover its added text.
pub fn analyze_last_session(doc: &mut PdfDocument) -> Result<ForensicReport> {
    let graph = doc.parse_revisions()?;
    let index = build_page_object_index(doc)?;

    let (mode, candidates): (AnalysisMode, Vec<(u32, u16)>) = if graph.has_incremental_updates() {
        let last = graph.last().expect("has_incremental_updates implies a last revision");
        let candidates = last
            .table
            .iter()
            .filter(|(&num, entry)| {
                num != 0 && entry.entry_type != crate::xref::XRefEntryType::Free
            })
            .map(|(&num, entry)| (num, entry.generation))
            .collect();
        (AnalysisMode::IncrementalUpdate, candidates)
    } else {
        let only = &graph.revisions[0];
        let candidates: Vec<(u32, u16)> = only
            .table
            .iter()
            .filter(|(_, entry)| entry.generation > 0)
            .map(|(&num, entry)| (num, entry.generation))
            .collect();
        if candidates.is_empty() {
            (AnalysisMode::SingleSession, Vec::new())
        } else {
            (AnalysisMode::ModifiedInPlace, candidates)
        }
    };

    let mut fragments = Vec::with_capacity(candidates.len());
    for (object_id, generation) in candidates {
        let obj_ref = ObjectRef::new(object_id, generation);
        let Ok(obj) = doc.load_object(obj_ref) else {
            continue;
        };
        fragments.push(classify_candidate(doc, &index, obj_ref, &obj)?);
    }

    fragments.sort_by_key(|f| (f.page_index.unwrap_or(usize::MAX), f.object_id));

    let modification_timestamp = info_timestamp_if_differs(doc)?;

    Ok(ForensicReport {
        mode,
        fragments,
        modification_timestamp,
    })
}

fn classify_candidate(
    doc: &mut PdfDocument,
    index: &PageObjectIndex,
    obj_ref: ObjectRef,
    obj: &Object,
) -> Result<ForensicFragment> {
    if let Some(&page_index) = index.content_ids.get(&obj_ref.id) {
        let text = extract_content_stream_text(doc, page_index, obj, obj_ref)?;
        return Ok(ForensicFragment {
            object_id: obj_ref.id,
            generation: obj_ref.gen,
            page_index: Some(page_index),
            kind: FragmentKind::ContentStream,
            text: Some(text),
        });
    }

    if is_annotation(obj) {
        let page_index = index.annot_ids.get(&obj_ref.id).copied();
        let text = annotation_text(obj);
        return Ok(ForensicFragment {
            object_id: obj_ref.id,
            generation: obj_ref.gen,
            page_index,
            kind: FragmentKind::Annotation,
            text,
        });
    }

    if let Some(&page_index) = index.page_ids.get(&obj_ref.id) {
        let spans = doc.extract_spans(page_index)?;
        let text = assemble_page_text(spans);
        return Ok(ForensicFragment {
            object_id: obj_ref.id,
            generation: obj_ref.gen,
            page_index: Some(page_index),
            kind: FragmentKind::PageObject,
            text: Some(text),
        });
    }

    Ok(ForensicFragment {
        object_id: obj_ref.id,
        generation: obj_ref.gen,
        page_index: None,
        kind: FragmentKind::Resource,
        text: None,
    })
}

fn extract_content_stream_text(
    doc: &mut PdfDocument,
    page_index: usize,
    obj: &Object,
    obj_ref: ObjectRef,
) -> Result<String> {
    let resources = doc.get_page_resources(page_index)?;
    let fonts = crate::extractors::text::load_page_fonts(doc, &resources)?;
    let decoded = doc.decode_stream_object(obj, obj_ref)?;
    let spans = crate::extractors::text::extract_spans(&decoded, &fonts)?;
    Ok(assemble_page_text(spans))
}

fn is_annotation(obj: &Object) -> bool {
    obj.as_dict()
        .and_then(|d| d.get("Type"))
        .and_then(|t| t.as_name())
        == Some("Annot")
}

fn annotation_text(obj: &Object) -> Option<String> {
    let dict = obj.as_dict()?;
    let mut parts = Vec::new();
    for key in ["Contents", "T", "Subj"] {
        if let Some(Object::String(bytes)) = dict.get(key) {
            parts.push(String::from_utf8_lossy(bytes).to_string());
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// `/Info /ModDate`, reported only when `/CreationDate` is also present and differs.
fn info_timestamp_if_differs(doc: &mut PdfDocument) -> Result<Option<String>> {
    let Some(info_ref) = doc.trailer().as_dict().and_then(|d| d.get("Info")).and_then(|o| o.as_reference())
    else {
        return Ok(None);
    };
    let info = doc.load_object(info_ref)?;
    let Some(info_dict) = info.as_dict() else {
        return Ok(None);
    };

    let creation = info_dict.get("CreationDate").and_then(pdf_string);
    let modified = info_dict.get("ModDate").and_then(pdf_string);

    match (creation, modified) {
        (Some(c), Some(m)) if c != m => Ok(Some(m)),
        _ => Ok(None),
    }
}

fn pdf_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        _ => None,
    }
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSS...`) into a UTC-naive timestamp,
/// for presenting [`ForensicReport::modification_timestamp`] in a readable form.
pub fn parse_pdf_date(raw: &str) -> Option<chrono::NaiveDateTime> {
    let digits: String = raw
        .trim_start_matches("D:")
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    let padded = format!("{:0<14}", digits);
    chrono::NaiveDateTime::parse_from_str(&padded, "%Y%m%d%H%M%S").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pdf_date_reads_full_timestamp() {
        let dt = parse_pdf_date("D:20230615120000").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2023-06-15 12:00:00");
    }

    #[test]
    fn parse_pdf_date_pads_date_only_values() {
        let dt = parse_pdf_date("D:20230615").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2023-06-15");
    }

    #[test]
    fn reference_ids_handles_single_and_array_forms() {
        let single = Object::Reference(ObjectRef::new(5, 0));
        assert_eq!(reference_ids(&single), vec![5]);

        let array = Object::Array(vec![
            Object::Reference(ObjectRef::new(1, 0)),
            Object::Reference(ObjectRef::new(2, 0)),
        ]);
        assert_eq!(reference_ids(&array), vec![1, 2]);
    }
}
