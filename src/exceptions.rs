use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{VocabError, VocabResult};

/// The words a user never wants to review again, backed by a plain text file
/// holding one word per line.
///
/// The file is only ever appended to. Duplicate lines are harmless: loading
/// collapses them into a set.
#[derive(Debug)]
pub struct ExceptionList {
    path: PathBuf,
    words: HashSet<String>,
}

impl ExceptionList {
    /// Load the list at `path`, creating an empty file if there is none.
    ///
    /// A list that can't be read is not fatal: the error is logged and an
    /// empty list is used instead. Exclusions made afterwards still apply
    /// in memory.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(list) => {
                info!(
                    "Loaded {} excluded words from {}",
                    list.len(),
                    path.display()
                );
                list
            }
            Err(why) => {
                error!("Unable to load exception list: {}", why);
                Self::empty(path)
            }
        }
    }

    fn try_load(path: &Path) -> VocabResult<Self> {
        if ensure_exists(path)? {
            info!(
                "Exception list {} not found, created an empty one.",
                path.display()
            );
            return Ok(Self::empty(path));
        }

        let bytes = fs::read(path).map_err(VocabError::ExceptionStore)?;

        Ok(ExceptionList {
            path: path.to_owned(),
            words: parse(&String::from_utf8_lossy(&bytes)),
        })
    }

    fn empty(path: &Path) -> Self {
        ExceptionList {
            path: path.to_owned(),
            words: HashSet::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Add an already-normalized word, appending it to the backing file.
    ///
    /// The in-memory list is updated even if the file write fails; the write
    /// error is handed back for the caller to report.
    pub fn record(&mut self, word: &str) -> VocabResult<()> {
        let persisted = self.append(word);
        self.words.insert(word.to_string());
        persisted
    }

    fn append(&self, word: &str) -> VocabResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(VocabError::ExceptionStore)?;

        // a crash mid-append can leave a partial last line behind
        let line = if ends_mid_line(&mut file).map_err(VocabError::ExceptionStore)? {
            format!("\n{}\n", word)
        } else {
            format!("{}\n", word)
        };

        file.write_all(line.as_bytes())
            .map_err(VocabError::ExceptionStore)
    }
}

/// Create an empty list at `path` unless one is already there. Returns
/// whether the file had to be created.
pub fn ensure_exists(path: &Path) -> VocabResult<bool> {
    if path.exists() {
        return Ok(false);
    }

    File::create(path).map_err(VocabError::ExceptionStore)?;
    Ok(true)
}

fn ends_mid_line(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// One word per line; surrounding whitespace and blank lines are ignored.
pub fn parse(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_lowercase)
        .collect()
}
