//! Revision boundary detection for forensic last-session analysis.
//!
//! The composed view built by [`crate::xref::parse_xref`] merges every
//! incremental update into one table and discards which entries came from
//! which revision. The forensic analyzer needs the opposite: the exact set
//! of object ids declared by the *last* revision's xref, independent of the
//! others. This module reverse-scans for every `%%EOF`/`startxref` pair and
//! parses each one's xref section on its own, via
//! [`crate::xref::parse_xref_level`].

use std::io::{Read, Seek, SeekFrom};

use lazy_static::lazy_static;

use crate::error::{Error, Result};
use crate::xref::{parse_xref_level, CrossRefTable, XRefEntryType};

lazy_static! {
    static ref RE_STARTXREF: regex::bytes::Regex =
        regex::bytes::Regex::new(r"startxref\s+(\d+)").unwrap();
}

/// One incremental update: its own (unmerged) cross-reference entries and
/// the trailer dictionary declared at that point in the file.
#[derive(Debug, Clone)]
pub struct Revision {
    /// Byte offset of this revision's `%%EOF` marker.
    pub eof_offset: usize,
    /// Byte offset of this revision's xref section (table or stream).
    pub xref_offset: u64,
    /// This revision's own cross-reference entries (not merged with others).
    pub table: CrossRefTable,
}

impl Revision {
    /// Object numbers this revision declares, excluding free entries and
    /// object 0 (per the spec's candidate-set definition).
    pub fn candidate_object_numbers(&self) -> Vec<u32> {
        self.table
            .iter()
            .filter(|(&num, entry)| num != 0 && entry.entry_type != XRefEntryType::Free)
            .map(|(&num, _)| num)
            .collect()
    }
}

/// Ordered sequence of revisions, oldest first.
#[derive(Debug, Clone)]
pub struct XrefGraph {
    /// Revisions in file order (the last element is the most recent).
    pub revisions: Vec<Revision>,
}

impl XrefGraph {
    /// The most recently written revision, if any were found.
    pub fn last(&self) -> Option<&Revision> {
        self.revisions.last()
    }

    /// Whether the document contains more than one `%%EOF`, i.e. has at
    /// least one incremental update applied after its initial save.
    pub fn has_incremental_updates(&self) -> bool {
        self.revisions.len() > 1
    }
}

/// Delineate revision boundaries by reverse-scanning for every `%%EOF` and
/// parsing the `startxref` offset that precedes each one independently.
///
/// Revisions are returned oldest-first. A document with a single save has
/// exactly one revision.
pub fn parse_revisions<R: Read + Seek>(reader: &mut R) -> Result<XrefGraph> {
    let mut data = Vec::new();
    reader.seek(SeekFrom::Start(0))?;
    reader.read_to_end(&mut data)?;

    let eof_positions = find_all_eof_markers(&data);
    if eof_positions.is_empty() {
        return Err(Error::InvalidPdf("no %%EOF marker found".to_string()));
    }

    let mut revisions = Vec::with_capacity(eof_positions.len());
    let mut search_start = 0usize;

    for &eof_offset in &eof_positions {
        let segment = &data[search_start..eof_offset];
        let Some(captures) = RE_STARTXREF.captures(segment) else {
            // No startxref precedes this %%EOF (e.g. trailing garbage); skip it.
            search_start = eof_offset;
            continue;
        };
        let xref_offset: u64 = std::str::from_utf8(&captures[1])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::InvalidPdf("unparsable startxref offset".to_string()))?;

        let mut cursor = std::io::Cursor::new(&data);
        let table = parse_xref_level(&mut cursor, xref_offset)?;

        revisions.push(Revision {
            eof_offset,
            xref_offset,
            table,
        });
        search_start = eof_offset;
    }

    if revisions.is_empty() {
        return Err(Error::InvalidPdf("no parsable revision found".to_string()));
    }

    Ok(XrefGraph { revisions })
}

/// Find the byte offset of every `%%EOF` marker in the file, in file order.
fn find_all_eof_markers(data: &[u8]) -> Vec<usize> {
    const MARKER: &[u8] = b"%%EOF";
    let mut offsets = Vec::new();
    let mut start = 0;
    while let Some(pos) = find_subslice(&data[start..], MARKER) {
        offsets.push(start + pos);
        start += pos + MARKER.len();
    }
    offsets
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn single_revision_pdf() -> Vec<u8> {
        b"%PDF-1.4\n\
            1 0 obj\n<< /Type /Catalog >>\nendobj\n\
            xref\n0 2\n0000000000 65535 f \n0000000009 00000 n \n\
            trailer\n<< /Size 2 /Root 1 0 R >>\n\
            startxref\n50\n%%EOF"
            .to_vec()
    }

    #[test]
    fn single_save_yields_one_revision() {
        let pdf = single_revision_pdf();
        let mut cursor = Cursor::new(pdf);
        let graph = parse_revisions(&mut cursor).unwrap();
        assert_eq!(graph.revisions.len(), 1);
        assert!(!graph.has_incremental_updates());
    }

    #[test]
    fn candidate_set_excludes_object_zero_and_free_entries() {
        let pdf = single_revision_pdf();
        let mut cursor = Cursor::new(pdf);
        let graph = parse_revisions(&mut cursor).unwrap();
        let candidates = graph.last().unwrap().candidate_object_numbers();
        assert_eq!(candidates, vec![1]);
    }

    #[test]
    fn two_saves_yield_two_revisions_in_order() {
        let mut pdf = single_revision_pdf();
        pdf.extend_from_slice(
            b"\n2 0 obj\n<< /Inserted true >>\nendobj\n\
            xref\n0 1\n0000000000 65535 f \n2 1\n0000000200 00000 n \n\
            trailer\n<< /Size 3 /Root 1 0 R /Prev 50 >>\n\
            startxref\n210\n%%EOF",
        );
        let mut cursor = Cursor::new(pdf);
        let graph = parse_revisions(&mut cursor).unwrap();
        assert_eq!(graph.revisions.len(), 2);
        assert!(graph.has_incremental_updates());
        assert_eq!(graph.last().unwrap().candidate_object_numbers(), vec![2]);
    }
}
