//! Multi-document analysis pool (§5): each document analysis is an
//! independent task, run across a `rayon` pool sized to the host's hardware
//! concurrency. Per-document parsing is itself strictly sequential (PDF
//! parsing is stateful — offsets, current graphics state); parallelism only
//! exists at the document level, matching [`crate::forensic`]/[`crate::page`]
//! being driven one document at a time internally.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::document::PdfDocument;
use crate::error::Result;
use crate::page::PageAnalysis;

/// One document submitted to the pool.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    /// Cache name this job's results should be stored under.
    pub name: String,
    /// Path to the source PDF.
    pub path: PathBuf,
}

/// The outcome of analyzing one document. Parse/store-level failures are
/// fatal for that document only; the pool continues with the rest of the
/// range (§7's propagation policy).
pub struct AnalysisOutcome {
    /// The job this outcome answers.
    pub name: String,
    /// Per-page analyses, or the error that stopped analysis of this document.
    pub pages: Result<Vec<PageAnalysis>>,
}

/// Analyze every job in `jobs` in parallel, honoring `cancel` between pages
/// and between documents.
///
/// `rayon`'s `par_iter().collect()` reassembles results in `jobs`' original
/// order regardless of which task finishes first, which is exactly the
/// ordering guarantee §5 asks for: "query output aggregates results in the
/// order the input range specified, regardless of completion order."
pub fn analyze_documents(jobs: &[AnalysisJob], cancel: &Arc<AtomicBool>) -> Vec<AnalysisOutcome> {
    jobs.par_iter()
        .map(|job| {
            if cancel.load(Ordering::Relaxed) {
                return AnalysisOutcome { name: job.name.clone(), pages: Ok(Vec::new()) };
            }
            AnalysisOutcome { name: job.name.clone(), pages: analyze_one(job, cancel) }
        })
        .collect()
}

fn analyze_one(job: &AnalysisJob, cancel: &Arc<AtomicBool>) -> Result<Vec<PageAnalysis>> {
    let mut doc = PdfDocument::open(&job.path)?;
    let page_count = doc.page_count()?;
    let mut analyses = Vec::with_capacity(page_count);

    for page_index in 0..page_count {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        analyses.push(crate::page::analyze_page(&mut doc, page_index)?);
    }

    Ok(analyses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_before_start_yields_empty_pages_for_every_job() {
        let cancel = Arc::new(AtomicBool::new(true));
        let jobs = vec![
            AnalysisJob { name: "a".to_string(), path: PathBuf::from("/nonexistent/a.pdf") },
            AnalysisJob { name: "b".to_string(), path: PathBuf::from("/nonexistent/b.pdf") },
        ];

        let outcomes = analyze_documents(&jobs, &cancel);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].name, "a");
        assert_eq!(outcomes[1].name, "b");
        assert!(outcomes.iter().all(|o| matches!(&o.pages, Ok(pages) if pages.is_empty())));
    }

    #[test]
    fn missing_file_reports_an_error_without_aborting_other_jobs() {
        let cancel = Arc::new(AtomicBool::new(false));
        let jobs = vec![
            AnalysisJob { name: "missing".to_string(), path: PathBuf::from("/nonexistent/missing.pdf") },
        ];

        let outcomes = analyze_documents(&jobs, &cancel);

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].pages.is_err());
    }
}
