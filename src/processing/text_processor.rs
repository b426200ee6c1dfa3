//! Text normalization: case folding, punctuation stripping, stop-word removal
//! and lemmatization

use crate::processing::lemmatizer::Lemmatizer;
use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

pub struct TextNormalizer {
    stop_words: HashSet<String>,
    lemmatizer: Lemmatizer,
    strip_regex: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let stop_words = STOP_WORDS.iter().map(|&s| s.to_string()).collect();

        // Everything outside ASCII letters, digits and whitespace goes
        let strip_regex = Regex::new(r"[^a-z0-9\s]").expect("Invalid strip regex");

        Self {
            stop_words,
            lemmatizer: Lemmatizer::new(),
            strip_regex,
        }
    }

    /// Add stop-words on top of the built-in list.
    ///
    /// Entries are cleaned like input text; a multi-word entry adds each word.
    pub fn with_extra_stop_words<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let cleaned = self.strip_regex.replace_all(&entry.as_ref().to_lowercase(), "").into_owned();
            self.stop_words.extend(cleaned.unicode_words().map(str::to_string));
        }
        self
    }

    /// Normalize text into space-separated lemmas.
    ///
    /// Idempotent: normalizing the output again returns it unchanged.
    pub fn normalize(&self, text: &str) -> String {
        self.tokenize(text).join(" ")
    }

    /// Lowercase, strip, split, drop stop-words and lemmatize
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let stripped = self.strip_regex.replace_all(&lowered, "");

        stripped
            .unicode_words()
            .filter(|word| !self.is_stop_word(word))
            .map(|word| self.lemmatizer.lemmatize(word))
            // a lemma can itself be a stop-word ("doing" -> "do")
            .filter(|lemma| !lemma.is_empty() && !self.is_stop_word(lemma))
            .collect()
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

/// Common English stop-words, already in stripped form (no apostrophes)
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything",
    "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became", "because",
    "become", "becomes", "becoming", "been", "before", "beforehand", "behind", "being",
    "below", "beside", "besides", "between", "beyond", "both", "bottom", "but", "by",
    "call", "can", "cannot", "cant", "could", "couldnt", "did", "didnt", "do", "does",
    "doesnt", "doing", "done", "dont", "down", "due", "during", "each", "eight", "either",
    "eleven", "else", "elsewhere", "empty", "enough", "even", "ever", "every", "everyone",
    "everything", "everywhere", "except", "few", "fifteen", "fifty", "first", "five",
    "for", "former", "formerly", "forty", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "have", "he", "hence", "her", "here", "hereafter",
    "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how",
    "however", "hundred", "i", "if", "im", "in", "indeed", "into", "is", "isnt", "it",
    "its", "itself", "ive", "just", "keep", "last", "latter", "latterly", "least", "less",
    "made", "make", "many", "may", "me", "meanwhile", "might", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "quite", "rather", "re", "really",
    "regarding", "same", "say", "see", "seem", "seemed", "seeming", "seems", "several",
    "she", "should", "show", "side", "since", "six", "sixty", "so", "some", "somehow",
    "someone", "something", "sometime", "sometimes", "somewhere", "still", "such", "take",
    "ten", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "thence", "there", "thereafter", "thereby", "therefore", "therein", "thereupon",
    "these", "they", "third", "this", "those", "though", "three", "through", "throughout",
    "thru", "thus", "to", "together", "too", "top", "toward", "towards", "twelve",
    "twenty", "two", "under", "unless", "until", "up", "upon", "us", "very", "via", "was",
    "we", "well", "were", "what", "whatever", "when", "whence", "whenever", "where",
    "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether",
    "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why", "will",
    "with", "within", "without", "would", "yet", "you", "youll", "your", "youre", "yours",
    "yourself", "yourselves",
];
