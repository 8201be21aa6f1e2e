//! Filter/Query Engine (C8): evaluates term and structural predicates over
//! cached pages, and parses the range-expression mini-language used to pick
//! which cached documents a query runs over.
//!
//! Plain positive term atoms can be answered by `page_fts` directly (the
//! fast path); anything else — OR/exclusion/fuzzy terms, structural flags,
//! regex, ranges — falls back to scanning candidate rows and evaluating the
//! predicate in process.

use std::collections::BTreeSet;

use regex::Regex;

use crate::cache::{CacheStore, CachedPage};
use crate::error::{Error, Result};
use crate::page::Orientation;

/// One atom of a term predicate.
#[derive(Debug, Clone)]
pub enum TermAtom {
    /// Matches if page text contains ANY of these alternatives (`a|b|c`).
    /// Tried as an exact (case-insensitive) substring first; if that fails,
    /// falls back to an accent-folded, whitespace-insensitive comparison.
    Positive(Vec<String>),
    /// Matches only if page text does NOT contain this term.
    Negative(String),
    /// Matches if the accent-folded, whitespace-insensitive text contains this term.
    Fuzzy(String),
}

impl TermAtom {
    /// A plain single-word positive atom, with no OR alternatives.
    fn is_plain_positive(&self) -> bool {
        matches!(self, TermAtom::Positive(alts) if alts.len() == 1)
    }
}

/// Which text band a term atom is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// The full page body.
    Body,
    /// Header band only.
    Header,
    /// Footer band only.
    Footer,
}

/// A full predicate: term atoms plus structural filters, all implicitly ANDed.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    /// Term atoms, matched against `band`.
    pub terms: Vec<TermAtom>,
    /// Band the term atoms are matched against.
    pub band: Option<Band>,
    /// Required `has_money` value, if filtering on it.
    pub has_money: Option<bool>,
    /// Required `has_cpf` value, if filtering on it.
    pub has_cpf: Option<bool>,
    /// Font name substring the page's font list must contain.
    pub font: Option<String>,
    /// Required page orientation.
    pub orientation: Option<Orientation>,
    /// Regex the page text must match.
    pub regex: Option<Regex>,
    /// Minimum word count (inclusive).
    pub min_words: Option<usize>,
    /// Maximum word count (inclusive).
    pub max_words: Option<usize>,
    /// A term that must appear in the signature region (bottom 30% of the page).
    pub signature_term: Option<String>,
}

impl Predicate {
    /// Whether this predicate can be answered entirely by an FTS query: only
    /// plain single-word positive term atoms against the full body, no other
    /// filters active.
    fn is_fts_fast_path(&self) -> bool {
        self.band.is_none_or(|b| b == Band::Body)
            && self.has_money.is_none()
            && self.has_cpf.is_none()
            && self.font.is_none()
            && self.orientation.is_none()
            && self.regex.is_none()
            && self.min_words.is_none()
            && self.max_words.is_none()
            && self.signature_term.is_none()
            && !self.terms.is_empty()
            && self.terms.iter().all(TermAtom::is_plain_positive)
    }

    /// The AND-joined FTS5 query string for the fast path, e.g. `"alpha" AND "beta"`.
    fn fts_query(&self) -> String {
        self.terms
            .iter()
            .map(|t| match t {
                TermAtom::Positive(alts) => format!("\"{}\"", alts[0].replace('"', "")),
                _ => unreachable!("fts_query only called when is_fts_fast_path() is true"),
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Evaluate every atom against one cached page.
    pub fn matches(&self, page: &CachedPage) -> bool {
        let band_text = match self.band {
            Some(Band::Header) => &page.header,
            Some(Band::Footer) => &page.footer,
            _ => &page.text,
        };

        for term in &self.terms {
            if !term_matches(term, band_text) {
                return false;
            }
        }

        if let Some(expected) = self.has_money {
            if page.has_money != expected {
                return false;
            }
        }

        if let Some(expected) = self.has_cpf {
            if page.has_cpf != expected {
                return false;
            }
        }

        if let Some(font) = &self.font {
            let lower = font.to_lowercase();
            if !page.fonts.iter().any(|f| f.to_lowercase().contains(&lower)) {
                return false;
            }
        }

        if let Some(expected) = self.orientation {
            if page.orientation != expected {
                return false;
            }
        }

        if let Some(regex) = &self.regex {
            if !regex.is_match(&page.text) {
                return false;
            }
        }

        if let Some(min) = self.min_words {
            if word_count(&page.text) < min {
                return false;
            }
        }

        if let Some(max) = self.max_words {
            if word_count(&page.text) > max {
                return false;
            }
        }

        if let Some(term) = &self.signature_term {
            if !fold(&page.signature).contains(&fold(term)) {
                return false;
            }
        }

        true
    }
}

/// Parse a `-w`/`--word`-style term expression into atoms: whitespace
/// separates atoms that AND together; within one atom, `|` ORs its
/// alternatives, a leading `!` negates, and wrapping the atom in `~...~`
/// marks it fuzzy.
pub fn parse_term_expression(expr: &str) -> Vec<TermAtom> {
    expr.split_whitespace().map(parse_term_token).collect()
}

fn parse_term_token(token: &str) -> TermAtom {
    if let Some(negated) = token.strip_prefix('!') {
        return TermAtom::Negative(negated.to_string());
    }

    if token.len() >= 2 && token.starts_with('~') && token.ends_with('~') {
        let inner = &token[1..token.len() - 1];
        return TermAtom::Fuzzy(inner.to_string());
    }

    if token.contains('|') {
        let alts = token.split('|').filter(|a| !a.is_empty()).map(str::to_string).collect();
        return TermAtom::Positive(alts);
    }

    TermAtom::Positive(vec![token.to_string()])
}

fn term_matches(term: &TermAtom, text: &str) -> bool {
    match term {
        TermAtom::Positive(alts) => {
            let lower = text.to_lowercase();
            let folded = fold(text);
            alts.iter()
                .any(|alt| lower.contains(&alt.to_lowercase()) || folded.contains(&fold(alt)))
        },
        TermAtom::Negative(word) => !text.to_lowercase().contains(&word.to_lowercase()),
        TermAtom::Fuzzy(word) => fold(text).contains(&fold(word)),
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Accent-fold and lowercase, dropping all whitespace — the normalization
/// fuzzy (`~...~`) terms and the signature-region term use for matching.
fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(strip_accent)
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Map a handful of common accented Latin letters to their unaccented form.
/// Narrow on purpose: this covers the Portuguese/Spanish diacritics the
/// source documents actually use, not a general Unicode decomposition.
fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        other => other,
    }
}

/// One query result: the cache it came from and the matching page number.
#[derive(Debug, Clone)]
pub struct QueryHit {
    /// Name of the cache entry the page belongs to.
    pub cache_name: String,
    /// Zero-based page number within that cache entry.
    pub page_number: usize,
}

/// Evaluate `predicate` over the pages of every cache in `cache_names`, in
/// (cache, page) order, capped at `limit` results.
pub fn query(
    store: &CacheStore,
    cache_names: &[String],
    predicate: &Predicate,
    limit: usize,
) -> Result<Vec<QueryHit>> {
    let mut hits = Vec::new();

    for name in cache_names {
        let Some(doc) = store.load(name)? else {
            continue;
        };

        let candidate_pages: Vec<&CachedPage> = if predicate.is_fts_fast_path() {
            fts_candidates(store, name, &doc.pages, &predicate.fts_query())?
        } else {
            doc.pages.iter().collect()
        };

        for page in candidate_pages {
            if predicate.matches(page) {
                hits.push(QueryHit {
                    cache_name: name.clone(),
                    page_number: page.page_number,
                });
                if hits.len() >= limit {
                    return Ok(hits);
                }
            }
        }
    }

    Ok(hits)
}

/// Restrict `pages` to those whose rowid the FTS index reports as a match,
/// by joining `page_fts` against this cache's own `pages` rows.
fn fts_candidates<'a>(
    store: &CacheStore,
    cache_name: &str,
    pages: &'a [CachedPage],
    fts_query: &str,
) -> Result<Vec<&'a CachedPage>> {
    let matching_page_numbers = store.fts_matching_page_numbers(cache_name, fts_query)?;
    Ok(pages
        .iter()
        .filter(|p| matching_page_numbers.contains(&p.page_number))
        .collect())
}

/// Parse a range expression: comma-separated single indices, `start-end`
/// inclusive ranges, or the literal `0` meaning "every cached document".
/// Indices are 1-based; `total` is the number of cache entries available.
/// Returns ascending, deduplicated 0-based indices.
pub fn parse_range_expression(expr: &str, total: usize) -> Result<Vec<usize>> {
    let mut indices = BTreeSet::new();

    for part in expr.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if part == "0" {
            indices.extend(0..total);
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start: usize = start
                .trim()
                .parse()
                .map_err(|_| Error::Query(format!("invalid range start: {part}")))?;
            let end: usize = end
                .trim()
                .parse()
                .map_err(|_| Error::Query(format!("invalid range end: {part}")))?;
            if start == 0 || end < start {
                return Err(Error::Query(format!("invalid range: {part}")));
            }
            for i in start..=end {
                indices.insert(i - 1);
            }
        } else {
            let i: usize = part
                .parse()
                .map_err(|_| Error::Query(format!("invalid index: {part}")))?;
            if i == 0 {
                return Err(Error::Query("index 0 is not valid outside the \"all\" form".to_string()));
            }
            indices.insert(i - 1);
        }
    }

    Ok(indices.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str, has_money: bool, has_cpf: bool) -> CachedPage {
        CachedPage {
            page_number: 0,
            text: text.to_string(),
            header: String::new(),
            footer: String::new(),
            has_money,
            has_cpf,
            fonts: vec!["Helvetica".to_string()],
            signature: String::new(),
            orientation: crate::page::Orientation::Portrait,
        }
    }

    #[test]
    fn plain_positive_terms_are_fast_path_eligible() {
        let pred = Predicate {
            terms: vec![TermAtom::Positive(vec!["invoice".to_string()])],
            ..Default::default()
        };
        assert!(pred.is_fts_fast_path());
    }

    #[test]
    fn structural_filter_disables_fast_path() {
        let pred = Predicate {
            terms: vec![TermAtom::Positive(vec!["invoice".to_string()])],
            has_money: Some(true),
            ..Default::default()
        };
        assert!(!pred.is_fts_fast_path());
    }

    #[test]
    fn negative_term_excludes_matching_pages() {
        let pred = Predicate {
            terms: vec![TermAtom::Negative("draft".to_string())],
            ..Default::default()
        };
        assert!(!pred.matches(&page("this is a draft copy", false, false)));
        assert!(pred.matches(&page("this is final", false, false)));
    }

    #[test]
    fn fuzzy_term_ignores_accents_case_and_whitespace() {
        let pred = Predicate {
            terms: vec![TermAtom::Fuzzy("joao silva".to_string())],
            ..Default::default()
        };
        assert!(pred.matches(&page("Recebido de JOÃO   SILVA em anexo", false, false)));
    }

    #[test]
    fn structural_flags_filter_pages() {
        let pred = Predicate {
            terms: vec![],
            has_money: Some(true),
            ..Default::default()
        };
        assert!(pred.matches(&page("total R$100", true, false)));
        assert!(!pred.matches(&page("no amount here", false, false)));
    }

    #[test]
    fn range_expression_parses_singles_ranges_and_all() {
        assert_eq!(parse_range_expression("1,3", 5).unwrap(), vec![0, 2]);
        assert_eq!(parse_range_expression("2-4", 5).unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_range_expression("0", 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn range_expression_deduplicates_and_sorts() {
        assert_eq!(parse_range_expression("3,1,2,1", 5).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn range_expression_rejects_inverted_range() {
        assert!(parse_range_expression("5-2", 10).is_err());
    }

    #[test]
    fn term_expression_ands_space_separated_atoms() {
        let atoms = parse_term_expression("robson pericial");
        assert!(matches!(&atoms[0], TermAtom::Positive(a) if a == &["robson".to_string()]));
        assert!(matches!(&atoms[1], TermAtom::Positive(a) if a == &["pericial".to_string()]));
    }

    #[test]
    fn term_expression_ors_pipe_separated_alternatives() {
        let atoms = parse_term_expression("alpha|beta");
        assert_eq!(atoms.len(), 1);
        assert!(matches!(&atoms[0], TermAtom::Positive(a) if a == &["alpha".to_string(), "beta".to_string()]));
    }

    #[test]
    fn term_expression_negates_leading_bang() {
        let atoms = parse_term_expression("!draft");
        assert!(matches!(&atoms[0], TermAtom::Negative(w) if w == "draft"));
    }

    #[test]
    fn term_expression_parses_fuzzy_wrapped_term() {
        let atoms = parse_term_expression("~especial~");
        assert!(matches!(&atoms[0], TermAtom::Fuzzy(w) if w == "especial"));
    }

    #[test]
    fn positive_term_falls_back_to_fuzzy_on_accent_mismatch() {
        let pred = Predicate {
            terms: vec![TermAtom::Positive(vec!["especial".to_string()])],
            ..Default::default()
        };
        assert!(pred.matches(&page("e  s  p  e  c  i  a  l", false, false)));
    }
}
