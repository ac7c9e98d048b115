//! `GeneratorConfig` (SPEC_FULL.md §10.3): the knobs a caller may tune before
//! invoking `generate`/`generate_with_retry`.

/// The six grid sizes spec §3 allows by default.
pub const DEFAULT_GRID_SIZES: [(usize, usize); 6] =
    [(5, 5), (5, 6), (6, 5), (6, 6), (7, 5), (7, 6)];

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Candidate `(width, height)` pairs to choose from.
    pub grid_sizes: Vec<(usize, usize)>,
    /// Accepted dictionary word length range, inclusive (spec §6 default 2..=7).
    pub min_word_len: usize,
    pub max_word_len: usize,
    /// Wall-clock budget handed to the solver for a single attempt.
    pub time_limit_s: f64,
    /// How many fresh attempts `generate_with_retry` will make before giving up.
    pub max_attempts: u32,
    /// When set, every returned puzzle must contain this word as exactly one
    /// entry (spec §4.5, S6).
    pub forced_word: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            grid_sizes: DEFAULT_GRID_SIZES.to_vec(),
            min_word_len: 2,
            max_word_len: 7,
            time_limit_s: 5.0,
            max_attempts: 20,
            forced_word: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_grid_sizes(mut self, grid_sizes: Vec<(usize, usize)>) -> Self {
        self.grid_sizes = grid_sizes;
        self
    }

    pub fn with_word_len_range(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_word_len = min_len;
        self.max_word_len = max_len;
        self
    }

    pub fn with_time_limit_s(mut self, time_limit_s: f64) -> Self {
        self.time_limit_s = time_limit_s;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_forced_word(mut self, forced_word: Option<String>) -> Self {
        self.forced_word = forced_word;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_size_set() {
        let config = GeneratorConfig::default();
        assert_eq!(config.grid_sizes, DEFAULT_GRID_SIZES.to_vec());
        assert_eq!((config.min_word_len, config.max_word_len), (2, 7));
    }

    #[test]
    fn builder_overrides_apply() {
        let config = GeneratorConfig::default()
            .with_grid_sizes(vec![(5, 5)])
            .with_time_limit_s(1.0)
            .with_max_attempts(3)
            .with_forced_word(Some("HELLO".to_string()));
        assert_eq!(config.grid_sizes, vec![(5, 5)]);
        assert_eq!(config.time_limit_s, 1.0);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.forced_word.as_deref(), Some("HELLO"));
    }
}
