/// One sighting of a word: the subtitle file and the line it was spoken in.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Occurrence {
    #[serde(rename = "file")]
    pub source_file: String,
    #[serde(rename = "line")]
    pub line_text: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Aggregate counts over the active and excluded vocabulary.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Stats {
    pub unique_active_words: usize,
    pub total_active_occurrences: usize,
    pub unique_excluded_words: usize,
    pub total_excluded_occurrences: usize,
    /// Number of words on the exception list, seen in the subtitles or not.
    pub exception_list_size: usize,
}
