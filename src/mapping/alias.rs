//! Per-statement table alias generation.

use std::collections::HashMap;

/// Hands out short, unique table aliases while one statement is assembled.
///
/// The first alias for a letter is the letter itself; later ones carry a
/// counter: `c`, `c2`, `c3`. Tables not starting with an ASCII letter use `t`.
#[derive(Debug, Clone, Default)]
pub struct AliasSession {
    counters: HashMap<char, u32>,
}

impl AliasSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next alias for `table`.
    pub fn next_alias(&mut self, table: &str) -> String {
        let letter = table
            .chars()
            .next()
            .filter(char::is_ascii_alphabetic)
            .map_or('t', |c| c.to_ascii_lowercase());

        let count = self.counters.entry(letter).or_insert(0);
        *count += 1;
        match *count {
            1 => letter.to_string(),
            n => format!("{letter}{n}"),
        }
    }

    /// Forget every alias handed out so far.
    pub fn reset(&mut self) {
        self.counters.clear();
    }
}
