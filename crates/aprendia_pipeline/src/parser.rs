//! Line-oriented parser for `first|second` generation output.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Separator between the two halves of a line.
pub const PAIR_SEPARATOR: char = '|';

/// One parsed line: (source, target) for chapters, (question, answer) for quizzes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedPair {
    pub first: String,
    pub second: String,
    /// Zero-based position among the lines that survived parsing
    pub order: usize,
}

/// Parses generated text into ordered pairs.
///
/// Lines are trimmed and split on the first separator only. Lines without a
/// separator, or with an empty half, are skipped without error; `order`
/// counts survivors so skipped lines leave no gaps.
///
/// # Examples
///
/// ```
/// use aprendia_pipeline::parse_pairs;
///
/// let pairs = parse_pairs("Title line\nHello|Hola\n\n  Bye | Adiós  \n|orphan\n");
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[1].first, "Bye");
/// assert_eq!(pairs[1].second, "Adiós");
/// assert_eq!(pairs[1].order, 1);
/// ```
pub fn parse_pairs(raw: &str) -> Vec<ParsedPair> {
    let mut pairs = Vec::new();

    for (line_number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((first, second)) = line.split_once(PAIR_SEPARATOR) else {
            debug!(line_number, "Skipping line without separator");
            continue;
        };
        let (first, second) = (first.trim(), second.trim());
        if first.is_empty() || second.is_empty() {
            debug!(line_number, "Skipping line with an empty half");
            continue;
        }
        pairs.push(ParsedPair {
            first: first.to_string(),
            second: second.to_string(),
            order: pairs.len(),
        });
    }

    pairs
}
