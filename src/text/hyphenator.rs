//! Knuth-Liang hyphenation.
//!
//! Each pattern is compiled into an anchored regular expression over the
//! letters it covers, with the digits kept aside as break weights. A word is
//! wrapped in `.` boundary markers and every suffix of it is matched against
//! the whole set at once; each matching pattern contributes its weights to
//! the gaps it spans and the highest weight wins. Odd weights are breaks.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{RegexSet, RegexSetBuilder};

use crate::PDFError;

const EN_US_PATTERNS: &str = include_str!("hyph-en-us.pat");
const EN_US_EXCEPTIONS: &str = include_str!("hyph-en-us.hyp");

/// Letters required on either side of a break
const MIN_FRAGMENT: usize = 2;

lazy_static! {
    static ref EN_US: Hyphenator = Hyphenator::new(EN_US_PATTERNS, EN_US_EXCEPTIONS)
        .unwrap_or_else(|e| {
            log::error!("bundled hyphenation table is unusable, hyphenation disabled: {e}");
            Hyphenator::default()
        });
}

/// A compiled pattern table plus its exception dictionary
#[derive(Debug, Clone)]
pub struct Hyphenator {
    patterns: RegexSet,
    /// `weights[i][k]` is the weight pattern `i` puts on the gap before its
    /// `k`th letter
    weights: Vec<Vec<u8>>,
    exceptions: HashMap<String, Vec<usize>>,
}

impl Default for Hyphenator {
    /// A hyphenator that never breaks anything
    fn default() -> Self {
        Hyphenator {
            patterns: RegexSet::empty(),
            weights: Vec::new(),
            exceptions: HashMap::new(),
        }
    }
}

/// Strip `%` comments and split into whitespace separated tokens
fn tokens(source: &str) -> impl Iterator<Item = &str> {
    source
        .lines()
        .map(|line| line.split('%').next().unwrap_or_default())
        .flat_map(str::split_whitespace)
}

/// Split a pattern such as `.hen5at` into its letters and gap weights
fn parse_pattern(token: &str) -> Result<(String, Vec<u8>), PDFError> {
    let invalid = || PDFError::InvalidHyphenationPattern(token.to_string());

    let mut letters = String::new();
    let mut weights = vec![0u8];
    let mut last_was_digit = false;
    let count = token.chars().count();
    for (i, c) in token.chars().enumerate() {
        match c {
            '0'..='9' => {
                if last_was_digit {
                    return Err(invalid());
                }
                if let Some(w) = weights.last_mut() {
                    *w = c as u8 - b'0';
                }
                last_was_digit = true;
            }
            '.' if i == 0 || i == count - 1 => {
                letters.push('.');
                weights.push(0);
                last_was_digit = false;
            }
            c if c.is_alphabetic() && c.is_lowercase() => {
                letters.push(c);
                weights.push(0);
                last_was_digit = false;
            }
            _ => return Err(invalid()),
        }
    }
    if letters.trim_matches('.').is_empty() {
        return Err(invalid());
    }
    Ok((letters, weights))
}

/// Split an exception such as `as-so-ciate` into the word and the letter
/// indices breaks fall before
fn parse_exception(token: &str) -> Result<(String, Vec<usize>), PDFError> {
    let mut word = String::new();
    let mut breaks = Vec::new();
    let mut letters = 0;
    for c in token.chars() {
        if c == '-' {
            if letters == 0 || breaks.last() == Some(&letters) {
                return Err(PDFError::InvalidHyphenationPattern(token.to_string()));
            }
            breaks.push(letters);
        } else if c.is_alphabetic() {
            word.extend(c.to_lowercase());
            letters += 1;
        } else {
            return Err(PDFError::InvalidHyphenationPattern(token.to_string()));
        }
    }
    if breaks.last() == Some(&letters) {
        return Err(PDFError::InvalidHyphenationPattern(token.to_string()));
    }
    Ok((word, breaks))
}

impl Hyphenator {
    /// Build a hyphenator from pattern text (TeX `\patterns` style) and
    /// exception text (hyphenated words). Both are whitespace separated and
    /// may carry `%` comments.
    pub fn new(patterns: &str, exceptions: &str) -> Result<Hyphenator, PDFError> {
        let mut expressions = Vec::new();
        let mut weights = Vec::new();
        for token in tokens(patterns) {
            let (letters, w) = parse_pattern(token)?;
            expressions.push(format!("^{}", regex::escape(&letters)));
            weights.push(w);
        }

        let patterns = RegexSetBuilder::new(&expressions)
            .size_limit(64 << 20)
            .dfa_size_limit(64 << 20)
            .build()
            .map_err(|e| PDFError::InvalidHyphenationPattern(e.to_string()))?;

        let mut table = HashMap::new();
        for token in tokens(exceptions) {
            let (word, breaks) = parse_exception(token)?;
            table.insert(word, breaks);
        }

        log::debug!(
            "compiled {} hyphenation patterns and {} exceptions",
            weights.len(),
            table.len()
        );

        Ok(Hyphenator {
            patterns,
            weights,
            exceptions: table,
        })
    }

    /// The bundled US English table, compiled on first use
    pub fn english() -> &'static Hyphenator {
        &EN_US
    }

    pub fn pattern_count(&self) -> usize {
        self.weights.len()
    }

    /// Character indices in `word` that a hyphen may be inserted before
    pub fn breaks(&self, word: &str) -> Vec<usize> {
        let lower: String = word.chars().flat_map(char::to_lowercase).collect();
        let n = lower.chars().count();
        // lower-casing can change the length (e.g. `İ`); such words are left alone
        if n != word.chars().count() || n < 2 * MIN_FRAGMENT {
            return Vec::new();
        }

        if let Some(breaks) = self.exceptions.get(&lower) {
            return breaks.clone();
        }

        let dotted = format!(".{lower}.");
        // scores[g] is the weight of the gap before dotted char g
        let mut scores = vec![0u8; n + 3];
        for (start, (offset, _)) in dotted.char_indices().enumerate() {
            for pattern in self.patterns.matches(&dotted[offset..]).iter() {
                for (k, &w) in self.weights[pattern].iter().enumerate() {
                    let gap = &mut scores[start + k];
                    *gap = (*gap).max(w);
                }
            }
        }

        // word char j sits at dotted index j + 1
        (MIN_FRAGMENT..=n - MIN_FRAGMENT)
            .filter(|&j| scores[j + 1] % 2 == 1)
            .collect()
    }

    /// Split `word` into its hyphenation fragments, preserving case
    pub fn hyphenate(&self, word: &str) -> Vec<String> {
        let breaks = self.breaks(word);
        let mut pieces = Vec::with_capacity(breaks.len() + 1);
        let mut current = String::new();
        let mut next = breaks.iter().peekable();
        for (i, c) in word.chars().enumerate() {
            if next.peek() == Some(&&i) {
                pieces.push(std::mem::take(&mut current));
                next.next();
            }
            current.push(c);
        }
        pieces.push(current);
        pieces
    }
}
