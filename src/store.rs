use std::collections::HashMap;
use std::path::Path;

use itertools::Itertools;

use crate::domain::vocab::{Occurrence, Stats, WordCount};
use crate::exceptions::ExceptionList;

#[derive(Debug)]
struct WordEntry {
    count: usize,
    occurrences: Vec<Occurrence>,
    // order in which the word was first seen, for stable tie-breaking
    first_seen: usize,
}

/// Word frequencies and evidence gathered from a batch of subtitle files.
///
/// A word is either active (counted, with every occurrence kept for review)
/// or excluded (counted only). The store owns both maps; the only way a word
/// moves out of the active vocabulary is [`VocabularyStore::exclude`].
#[derive(Debug)]
pub struct VocabularyStore {
    exceptions: ExceptionList,
    active: HashMap<String, WordEntry>,
    excluded: HashMap<String, usize>,
    next_seen: usize,
}

impl VocabularyStore {
    pub fn new(exceptions: ExceptionList) -> Self {
        VocabularyStore {
            exceptions,
            active: HashMap::new(),
            excluded: HashMap::new(),
            next_seen: 0,
        }
    }

    /// Build a store around the exception list kept at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::new(ExceptionList::load(path))
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Record one extracted, already-lowercased word.
    pub fn ingest(&mut self, word: &str, line_text: &str, file_name: &str) {
        if self.exceptions.contains(word) {
            *self.excluded.entry(word.to_string()).or_insert(0) += 1;
            return;
        }

        let next_seen = &mut self.next_seen;
        let entry = self.active.entry(word.to_string()).or_insert_with(|| {
            let first_seen = *next_seen;
            *next_seen += 1;
            WordEntry {
                count: 0,
                occurrences: Vec::new(),
                first_seen,
            }
        });

        entry.count += 1;
        entry.occurrences.push(Occurrence {
            source_file: file_name.to_string(),
            line_text: line_text.to_string(),
        });
    }

    /// Active words, most frequent first. Words with equal counts keep the
    /// order they were first seen in.
    pub fn sorted_vocabulary(&self) -> Vec<WordCount> {
        let words = self
            .active
            .iter()
            .sorted_by(|(_, a), (_, b)| {
                b.count
                    .cmp(&a.count)
                    .then_with(|| a.first_seen.cmp(&b.first_seen))
            })
            .map(|(word, entry)| WordCount {
                word: word.clone(),
                count: entry.count,
            })
            .collect::<Vec<_>>();

        debug!("Returning {} sorted words", words.len());
        words
    }

    /// Every recorded sighting of `word`, in ingestion order. Unknown words
    /// simply have none.
    pub fn occurrences_of(&self, word: &str) -> Vec<Occurrence> {
        self.active
            .get(&normalize(word))
            .map(|entry| entry.occurrences.clone())
            .unwrap_or_default()
    }

    /// Permanently exclude `word`: it is written to the exception list and
    /// dropped from the active vocabulary along with all of its occurrences.
    ///
    /// Excluding an already-excluded or unknown word only re-records it.
    /// Blank words, or words with inner whitespace or control characters,
    /// are ignored: each exclusion must stay a single line in the list.
    pub fn exclude(&mut self, word: &str) -> Stats {
        let word = normalize(word);
        if word.is_empty() {
            return self.stats();
        }
        if word.chars().any(|c| c.is_whitespace() || c.is_control()) {
            warn!("Refusing to exclude {:?}: not a single word", word);
            return self.stats();
        }

        if let Err(why) = self.exceptions.record(&word) {
            error!(
                "Unable to persist exclusion of {:?} to {}: {}",
                word,
                self.exceptions.path().display(),
                why
            );
        }

        if let Some(entry) = self.active.remove(&word) {
            info!(
                "Excluded {:?}, dropping {} occurrences",
                word, entry.count
            );
        }

        self.stats()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            unique_active_words: self.active.len(),
            total_active_occurrences: self.active.values().map(|e| e.count).sum(),
            unique_excluded_words: self.excluded.len(),
            total_excluded_occurrences: self.excluded.values().sum(),
            exception_list_size: self.exceptions.len(),
        }
    }
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;
    use crate::subtitles;

    const SAMPLE: &str = "1\n00:00:01,000 --> 00:00:02,000\nHello, I don't know.\n";

    fn store_with(dir: &tempfile::TempDir, exceptions: &str) -> VocabularyStore {
        let path = dir.path().join("exceptions.txt");
        fs::write(&path, exceptions).unwrap();
        VocabularyStore::open(&path)
    }

    fn ingest_text(store: &mut VocabularyStore, text: &str, file: &str) {
        for tok in subtitles::extract(text) {
            store.ingest(&tok.word, &tok.line, file);
        }
    }

    fn counts(store: &VocabularyStore) -> HashMap<String, usize> {
        store
            .sorted_vocabulary()
            .into_iter()
            .map(|wc| (wc.word, wc.count))
            .collect()
    }

    fn assert_consistent(store: &VocabularyStore) {
        for (word, entry) in &store.active {
            assert_eq!(entry.count, entry.occurrences.len(), "{}", word);
            assert!(!store.excluded.contains_key(word), "{}", word);
        }
    }

    #[test]
    fn excluded_words_are_only_counted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with(&dir, "know\n");
        ingest_text(&mut store, SAMPLE, "ep1.srt");

        assert_eq!(counts(&store), hashmap! {
            "hello".to_string() => 1,
            "don't".to_string() => 1,
        });
        assert_eq!(store.excluded, hashmap! { "know".to_string() => 1 });
        assert!(store.occurrences_of("know").is_empty());
        assert_consistent(&store);
    }

    #[test]
    fn exclude_drops_the_word_and_persists_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with(&dir, "know\n");
        ingest_text(&mut store, SAMPLE, "ep1.srt");

        let stats = store.exclude("hello");

        assert_eq!(counts(&store), hashmap! { "don't".to_string() => 1 });
        assert_eq!(stats.unique_active_words, 1);
        assert_eq!(stats.total_active_occurrences, 1);
        // the dropped count is not folded into the exclusion statistics
        assert_eq!(stats.unique_excluded_words, 1);
        assert_eq!(stats.total_excluded_occurrences, 1);
        assert_eq!(stats.exception_list_size, 2);

        let persisted = fs::read_to_string(dir.path().join("exceptions.txt")).unwrap();
        assert_eq!(persisted, "know\nhello\n");
        assert_consistent(&store);
    }

    #[test]
    fn exclude_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with(&dir, "");
        ingest_text(&mut store, SAMPLE, "ep1.srt");

        let once = store.exclude("Hello");
        let twice = store.exclude("hello");

        assert_eq!(once, twice);
        assert_eq!(counts(&store), hashmap! {
            "don't".to_string() => 1,
            "know".to_string() => 1,
        });

        let reloaded = ExceptionList::load(dir.path().join("exceptions.txt"));
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains("hello"));
    }

    #[test]
    fn excluding_unknown_or_blank_words_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with(&dir, "");
        ingest_text(&mut store, SAMPLE, "ep1.srt");
        let before = store.stats();

        let after_blank = store.exclude("   ");
        assert_eq!(before, after_blank);

        let after_unknown = store.exclude("zebra");
        assert_eq!(after_unknown.unique_active_words, before.unique_active_words);
        assert_eq!(after_unknown.exception_list_size, 1);
    }

    #[test]
    fn multi_line_words_are_not_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exceptions.txt");
        let mut store = store_with(&dir, "know\n");
        ingest_text(&mut store, "zzz foo bar", "ep1.srt");
        let before = store.stats();

        assert_eq!(store.exclude("zzz\nfoo\r\nbar"), before);
        assert_eq!(store.exclude("foo bar"), before);
        assert_eq!(store.exclude("foo\u{0}"), before);
        assert_eq!(fs::read_to_string(&path).unwrap(), "know\n");

        let mut restarted = VocabularyStore::open(&path);
        ingest_text(&mut restarted, "zzz foo bar", "ep1.srt");
        assert_eq!(restarted.occurrences_of("foo").len(), 1);
        assert_eq!(restarted.occurrences_of("bar").len(), 1);
        assert_eq!(restarted.stats().exception_list_size, 1);
    }

    #[test]
    fn words_ingested_after_exclusion_count_as_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with(&dir, "");
        ingest_text(&mut store, SAMPLE, "ep1.srt");
        store.exclude("know");
        ingest_text(&mut store, "I know, I know.", "ep2.srt");

        assert!(store.occurrences_of("know").is_empty());
        assert_eq!(store.stats().total_excluded_occurrences, 2);
        assert_consistent(&store);
    }

    #[test]
    fn occurrences_keep_ingestion_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with(&dir, "");
        ingest_text(&mut store, "Run, run!\n", "ep1.srt");
        ingest_text(&mut store, "2\nWe run now.\n", "ep2.srt");

        let occurrences = store.occurrences_of("RUN");
        assert_eq!(occurrences, vec![
            Occurrence {
                source_file: "ep1.srt".to_string(),
                line_text: "Run, run!".to_string(),
            },
            Occurrence {
                source_file: "ep1.srt".to_string(),
                line_text: "Run, run!".to_string(),
            },
            Occurrence {
                source_file: "ep2.srt".to_string(),
                line_text: "We run now.".to_string(),
            },
        ]);
        assert!(store.occurrences_of("missing").is_empty());
    }

    #[test]
    fn vocabulary_is_sorted_by_count_then_first_sighting() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with(&dir, "");
        ingest_text(
            &mut store,
            "zulu alpha mike\nalpha mike alpha\nyankee",
            "ep1.srt",
        );

        let words = store.sorted_vocabulary();
        assert!(words.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(
            words.iter().map(|wc| wc.word.as_str()).collect::<Vec<_>>(),
            vec!["alpha", "mike", "zulu", "yankee"]
        );
    }

    #[test]
    fn stats_track_both_vocabularies() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with(&dir, "the\nof\nunused\n");
        ingest_text(
            &mut store,
            "The end of the line.\nThe mark of Zorro.",
            "ep1.srt",
        );

        assert_eq!(store.stats(), Stats {
            unique_active_words: 4,
            total_active_occurrences: 4,
            unique_excluded_words: 2,
            total_excluded_occurrences: 5,
            exception_list_size: 3,
        });
    }

    #[test]
    fn unreadable_exception_list_still_allows_exclusion() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = VocabularyStore::open(dir.path());
        ingest_text(&mut store, SAMPLE, "ep1.srt");

        let stats = store.exclude("know");
        assert_eq!(stats.unique_active_words, 2);
        assert_eq!(stats.exception_list_size, 1);
        assert!(store.occurrences_of("know").is_empty());
    }
}
