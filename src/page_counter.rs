//! Page totals for a directory of downloaded PDFs

use crate::types::{PageCountReport, PdfPageCount, SkippedPdf};
use crate::utils::has_pdf_extension;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Sum the page counts of every PDF directly inside `dir`
///
/// Only files ending in `.pdf` (any case) are considered, symlinks to files
/// included; subdirectories are not descended into. Files are visited in path
/// order. A file `lopdf` cannot load, or an entry that cannot be inspected,
/// is logged, contributes 0 pages and is listed in [`PageCountReport::skipped`].
///
/// A missing or unreadable directory yields an empty report; nothing is created.
pub fn count_pages(dir: &Path) -> PageCountReport {
    let mut report = PageCountReport::default();

    let pdfs = match list_pdfs(dir, &mut report.skipped) {
        Ok(pdfs) => pdfs,
        Err(e) => {
            error!(dir = %dir.display(), error = %e, "Cannot read PDF directory");
            return report;
        }
    };

    for path in pdfs {
        match count_pdf_pages(&path) {
            Ok(pages) => {
                debug!(path = %path.display(), pages, "Counted PDF pages");
                report.total += pages;
                report.files.push(PdfPageCount { path, pages });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable PDF");
                report.skipped.push(SkippedPdf {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }
    report.skipped.sort_by(|a, b| a.path.cmp(&b.path));

    info!(
        dir = %dir.display(),
        total = report.total,
        files = report.files.len(),
        skipped = report.skipped.len(),
        "Counted pages"
    );
    report
}

/// Number of pages in a single PDF file
pub fn count_pdf_pages(path: &Path) -> Result<usize, lopdf::Error> {
    let document = lopdf::Document::load(path)?;
    Ok(document.get_pages().len())
}

/// Sorted paths of the `.pdf` files directly inside `dir`
///
/// Only a failure to open `dir` itself is an error. Entries that cannot be
/// read are logged and skipped; `.pdf` entries whose target cannot be
/// inspected (e.g. dangling symlinks) are also recorded in `skipped`.
fn list_pdfs(dir: &Path, skipped: &mut Vec<SkippedPdf>) -> std::io::Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        if !has_pdf_extension(&path) {
            continue;
        }
        // metadata follows symlinks
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => pdfs.push(path),
            Ok(_) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping PDF entry that cannot be inspected");
                skipped.push(SkippedPdf {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_directory_counts_zero_and_is_not_created() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("reports");

        let report = count_pages(&missing);

        assert_eq!(report, PageCountReport::default());
        assert!(!missing.exists());
    }

    #[test]
    fn file_instead_of_directory_counts_zero() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("reports");
        std::fs::write(&file, b"not a dir").unwrap();

        assert_eq!(count_pages(&file).total, 0);
    }

    #[test]
    fn ignores_other_extensions_and_subdirectories() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        std::fs::write(dir.path().join("report.pdf.part"), b"%PDF-1.4").unwrap();
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let report = count_pages(dir.path());

        assert_eq!(report.total, 0);
        assert!(report.files.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn corrupt_pdfs_are_skipped_in_sorted_order() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.PDF"), b"garbage").unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"").unwrap();

        let report = count_pages(dir.path());

        assert_eq!(report.total, 0);
        let names: Vec<_> = report
            .skipped
            .iter()
            .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.pdf", "b.PDF"]);
        assert!(report.skipped.iter().all(|s| !s.reason.is_empty()));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_is_skipped_and_scan_continues() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"garbage").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.pdf"), dir.path().join("b.pdf")).unwrap();

        let report = count_pages(dir.path());

        let names: Vec<_> = report
            .skipped
            .iter()
            .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.pdf", "b.pdf"]);
    }

    #[test]
    fn count_pdf_pages_reports_load_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();
        assert!(count_pdf_pages(&path).is_err());
    }
}
