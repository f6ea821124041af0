use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::error::VocabResult;
use crate::exceptions;
use crate::ingester;
use crate::store::VocabularyStore;
use crate::utils::format_count;

/// Line-oriented question/answer prompt over any reader and writer.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompt { input, output }
    }

    /// `None` once the input is exhausted.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "\n{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.output, "{}", msg)
    }
}

/// Report whether the exception list at `path` is there, creating it empty
/// if it is not. A list that can't be created only costs persistence.
pub fn check_exception_file<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    path: &Path,
) -> io::Result<()> {
    prompt.say("\nChecking exception list...")?;

    match exceptions::ensure_exists(path) {
        Ok(true) => prompt.say(&format!(
            "{} not found, created an empty one.",
            path.display()
        )),
        Ok(false) => prompt.say(&format!("{} found.", path.display())),
        Err(why) => {
            error!("{}", why);
            prompt.say(&format!(
                "WARNING: unable to create {}, exclusions will not be saved.",
                path.display()
            ))
        }
    }
}

/// Ingest the subtitle directory given up front, or keep asking for one until
/// a directory yields some vocabulary or the user gives up.
pub fn load_vocabulary<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    preset: Option<&Path>,
    exceptions: &Path,
    extension: &str,
) -> VocabResult<Option<VocabularyStore>> {
    if let Some(dir) = preset {
        return try_directory(prompt, dir, exceptions, extension);
    }

    let question = format!("Path of the directory with the .{} files: ", extension);
    loop {
        let answer = match prompt.ask(&question)? {
            Some(a) => a,
            None => return Ok(None),
        };

        if let Some(store) = try_directory(prompt, Path::new(&answer), exceptions, extension)? {
            return Ok(Some(store));
        }

        match prompt.ask("Try again? (y/n): ")? {
            Some(ref a) if a.eq_ignore_ascii_case("y") => continue,
            _ => {
                prompt.say("Exiting.")?;
                return Ok(None);
            }
        }
    }
}

fn try_directory<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    dir: &Path,
    exceptions: &Path,
    extension: &str,
) -> VocabResult<Option<VocabularyStore>> {
    if !ingester::validate_directory(dir, extension) {
        prompt.say(&format!(
            "\nERROR: {} is not a directory containing .{} files",
            dir.display(),
            extension
        ))?;
        return Ok(None);
    }

    prompt.say(&format!("\nProcessing files in {}", dir.display()))?;
    let mut store = VocabularyStore::open(exceptions);
    let report = ingester::ingest_directory(&mut store, dir, extension)?;
    if report.files_skipped > 0 {
        prompt.say(&format!(
            "WARNING: {} of {} files could not be read and were skipped",
            report.files_skipped,
            report.files_processed + report.files_skipped
        ))?;
    }

    if store.is_empty() {
        prompt.say("\nERROR: no words were found in the subtitle files.")?;
        return Ok(None);
    }

    let stats = store.stats();
    prompt.say(&format!(
        "\nProcessing finished.\nUnique words found: {}\nTotal occurrences: {}",
        format_count(stats.unique_active_words),
        format_count(stats.total_active_occurrences)
    ))?;

    Ok(Some(store))
}
