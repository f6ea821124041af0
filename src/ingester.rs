use std::fs;
use std::path::{Path, PathBuf};

use crate::error::VocabResult;
use crate::store::VocabularyStore;
use crate::subtitles;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IngestReport {
    pub files_processed: usize,
    pub files_skipped: usize,
}

/// Subtitle files directly inside `dir` (no recursion), sorted by path.
pub fn subtitle_files(dir: &Path, extension: &str) -> VocabResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case(extension))
}

/// Does `dir` exist and hold at least one subtitle file?
pub fn validate_directory(dir: &Path, extension: &str) -> bool {
    if !dir.is_dir() {
        return false;
    }

    match subtitle_files(dir, extension) {
        Ok(files) if !files.is_empty() => {
            info!(
                "Found {} .{} files in {}",
                files.len(),
                extension,
                dir.display()
            );
            true
        }
        Ok(_) => false,
        Err(why) => {
            error!("Unable to list {}: {}", dir.display(), why);
            false
        }
    }
}

/// Extract and ingest every subtitle file in `dir`. A file that can't be read
/// is logged and skipped.
pub fn ingest_directory(
    store: &mut VocabularyStore,
    dir: &Path,
    extension: &str,
) -> VocabResult<IngestReport> {
    let mut report = IngestReport::default();

    for path in subtitle_files(dir, extension)? {
        info!("Processing file: {}", path.display());

        let text = ok_or_continue!(subtitles::read_subtitle_file(&path), why => {
            error!("Skipping {}: {}", path.display(), why);
            report.files_skipped += 1;
        });

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let tokens = subtitles::extract(&text);
        for token in &tokens {
            store.ingest(&token.word, &token.line, &file_name);
        }

        info!("Processed {} - found {} words", file_name, tokens.len());
        report.files_processed += 1;
    }

    let stats = store.stats();
    info!("Total files processed: {}", report.files_processed);
    info!("Total unique words found: {}", stats.unique_active_words);
    Ok(report)
}
