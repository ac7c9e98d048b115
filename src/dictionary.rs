//! Pattern Index (spec §4.4): a word dictionary partitioned by length, indexed
//! by `(position, character)` so that pattern queries resolve via set
//! intersection instead of a linear scan.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("dictionary has no words in the valid length range")]
    EmptyDictionary,
    #[error("word \"{0}\" contains characters outside A-Z")]
    InvalidCharacters(String),
    #[error("word \"{0}\" is shorter than the minimum length {1}")]
    WordTooShort(String, usize),
    #[error("word \"{0}\" is longer than the maximum length {1}")]
    WordTooLong(String, usize),
}

/// Per-length position index: `positions[p]` maps a character to the set of
/// word-indices (into that length's `by_length` list) with that character at
/// position `p`. `BTreeSet` keeps intersection results in ascending
/// word-index order, which is what gives `candidates` its deterministic,
/// reproducible ordering (spec §4.4).
struct LengthIndex {
    words: Vec<String>,
    positions: Vec<HashMap<char, BTreeSet<usize>>>,
    all: BTreeSet<usize>,
    cache: RefCell<HashMap<String, Vec<String>>>,
}

impl LengthIndex {
    fn build(words: Vec<String>) -> Self {
        let length = words.first().map(|w| w.len()).unwrap_or(0);
        let mut positions: Vec<HashMap<char, BTreeSet<usize>>> =
            (0..length).map(|_| HashMap::new()).collect();
        for (idx, word) in words.iter().enumerate() {
            for (pos, ch) in word.chars().enumerate() {
                positions[pos].entry(ch).or_insert_with(BTreeSet::new).insert(idx);
            }
        }
        let all: BTreeSet<usize> = (0..words.len()).collect();
        LengthIndex {
            words,
            positions,
            all,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn candidates(&self, pattern: &str) -> Vec<String> {
        if let Some(hit) = self.cache.borrow().get(pattern) {
            return hit.clone();
        }

        let mut indices = self.all.clone();
        for (pos, ch) in pattern.chars().enumerate() {
            if ch == '.' {
                continue;
            }
            let matching = self.positions[pos].get(&ch);
            indices = match matching {
                Some(set) => indices.intersection(set).copied().collect(),
                None => BTreeSet::new(),
            };
            if indices.is_empty() {
                break;
            }
        }

        let result: Vec<String> = indices.into_iter().map(|i| self.words[i].clone()).collect();
        self.cache
            .borrow_mut()
            .insert(pattern.to_string(), result.clone());
        result
    }
}

/// A pattern-indexed word dictionary. Constructed once per wordlist; queries are
/// memoized per length.
pub struct PatternIndex {
    by_length: HashMap<usize, LengthIndex>,
}

impl PatternIndex {
    /// Builds an index from a pre-normalized, de-duplicated sequence of
    /// uppercase A-Z words (spec §6's wordlist contract). Re-validates
    /// defensively at this boundary even though callers are expected to have
    /// already filtered by `min_len..=max_len`.
    pub fn new(words: &[String], min_len: usize, max_len: usize) -> Result<Self, DictionaryError> {
        let mut grouped: HashMap<usize, Vec<String>> = HashMap::new();
        for word in words {
            if !word.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(DictionaryError::InvalidCharacters(word.clone()));
            }
            if word.len() < min_len {
                return Err(DictionaryError::WordTooShort(word.clone(), min_len));
            }
            if word.len() > max_len {
                return Err(DictionaryError::WordTooLong(word.clone(), max_len));
            }
            grouped.entry(word.len()).or_insert_with(Vec::new).push(word.clone());
        }

        if grouped.is_empty() {
            return Err(DictionaryError::EmptyDictionary);
        }

        let by_length = grouped
            .into_iter()
            .map(|(len, words)| (len, LengthIndex::build(words)))
            .collect();

        Ok(PatternIndex { by_length })
    }

    /// Returns every word matching `pattern`, a string over `[A-Z.]`. Empty if
    /// no word of that length exists. Results for a given pattern are
    /// memoized and returned in ascending word-index order.
    pub fn candidates(&self, pattern: &str) -> Vec<String> {
        match self.by_length.get(&pattern.len()) {
            Some(index) => index.candidates(pattern),
            None => Vec::new(),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pattern_query_intersects_positions() {
        // S3: {CAT, COT, CUT, DOG}, pattern "C.T" -> {CAT, COT, CUT} in that order.
        let index = PatternIndex::new(&words(&["CAT", "COT", "CUT", "DOG"]), 2, 7).unwrap();
        assert_eq!(index.candidates("C.T"), vec!["CAT", "COT", "CUT"]);
    }

    #[test]
    fn all_wildcard_pattern_returns_all_words_of_length() {
        let index = PatternIndex::new(&words(&["CAT", "COT", "CUT", "DOG"]), 2, 7).unwrap();
        let mut all = index.candidates("...");
        all.sort();
        assert_eq!(all, vec!["CAT", "COT", "CUT", "DOG"]);
    }

    #[test]
    fn impossible_pattern_returns_empty() {
        let index = PatternIndex::new(&words(&["CAT", "COT", "CUT", "DOG"]), 2, 7).unwrap();
        assert_eq!(index.candidates("X.."), Vec::<String>::new());
    }

    #[test]
    fn unknown_length_returns_empty() {
        let index = PatternIndex::new(&words(&["CAT"]), 2, 7).unwrap();
        assert_eq!(index.candidates("....."), Vec::<String>::new());
    }

    #[test]
    fn query_correctness_property() {
        // Property 6: w in candidates(p) iff every fixed position matches.
        let dict = words(&["CAT", "COT", "CUT", "DOG", "CAB", "CAR"]);
        let index = PatternIndex::new(&dict, 2, 7).unwrap();
        for pattern in ["C.T", "CA.", "...", "C.."] {
            let result = index.candidates(pattern);
            for word in &dict {
                if word.len() != pattern.len() {
                    continue;
                }
                let matches = pattern
                    .chars()
                    .zip(word.chars())
                    .all(|(p, w)| p == '.' || p == w);
                assert_eq!(result.contains(word), matches, "pattern {pattern} word {word}");
            }
        }
    }

    #[test]
    fn rejects_lowercase_or_out_of_range_words() {
        assert!(matches!(
            PatternIndex::new(&words(&["cat"]), 2, 7),
            Err(DictionaryError::InvalidCharacters(_))
        ));
        assert!(matches!(
            PatternIndex::new(&words(&["A"]), 2, 7),
            Err(DictionaryError::WordTooShort(_, 2))
        ));
        assert!(matches!(
            PatternIndex::new(&words(&[]), 2, 7),
            Err(DictionaryError::EmptyDictionary)
        ));
    }

    #[test]
    fn cache_returns_identical_result_on_repeat_query() {
        let index = PatternIndex::new(&words(&["CAT", "COT"]), 2, 7).unwrap();
        let first = index.candidates("C.T");
        let second = index.candidates("C.T");
        assert_eq!(first, second);
    }
}
