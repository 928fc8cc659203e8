//! Card identification against a `smartcard_list.txt` style database.
//!
//! File format: `#` starts a comment line; an ATR (literal hex or a regular
//! expression) starts in column 0; each following line beginning with a tab
//! describes the card; a blank line ends the entry. ATR lines containing
//! `.`, `*`, `[` or `?` are compiled as anchored regular expressions, others
//! are compared literally against the normalized `"3B A7 00 ..."` form.

pub mod error;

use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::debug;

pub use error::CardListError;

const PATTERN_CHARS: [char; 4] = ['.', '*', '[', '?'];

#[derive(Debug, Clone)]
enum AtrMatcher {
    Literal(String),
    Pattern(Regex),
}

impl AtrMatcher {
    fn matches(&self, atr: &str) -> bool {
        match self {
            AtrMatcher::Literal(text) => text == atr,
            AtrMatcher::Pattern(re) => re.is_match(atr),
        }
    }
}

/// One database entry: the ATR line and its description lines.
#[derive(Debug, Clone)]
pub struct CardEntry {
    pub atr: String,
    pub descriptions: Vec<String>,
    matcher: AtrMatcher,
}

impl CardEntry {
    pub fn is_pattern(&self) -> bool {
        matches!(self.matcher, AtrMatcher::Pattern(_))
    }
}

/// Parsed card database.
///
/// # Examples
/// ```
/// use atrlens_core::CardList;
///
/// let list = CardList::parse("3B A7 00 40 .. 80 65 A2 08 .. .. ..\n\tGemplus GemSAFE\n")?;
/// let hits = list.lookup("3B A7 00 40 18 80 65 A2 08 01 01 52");
/// assert_eq!(hits[0].descriptions, ["Gemplus GemSAFE"]);
/// # Ok::<(), atrlens_core::CardListError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CardList {
    entries: Vec<CardEntry>,
}

impl CardList {
    pub fn from_path(path: &Path) -> Result<Self, CardListError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, CardListError> {
        let mut entries = Vec::new();
        let mut current: Option<CardEntry> = None;

        for (number, line) in text.lines().enumerate() {
            if line.starts_with('#') {
                continue;
            }
            if line.trim().is_empty() {
                entries.extend(current.take());
                continue;
            }
            if let Some(description) = line.strip_prefix('\t') {
                if let Some(entry) = current.as_mut() {
                    entry.descriptions.push(description.trim_end().to_string());
                }
                continue;
            }
            entries.extend(current.take());
            let atr = line.trim().to_ascii_uppercase();
            let matcher = compile(&atr, number + 1)?;
            current = Some(CardEntry {
                atr,
                descriptions: Vec::new(),
                matcher,
            });
        }
        entries.extend(current.take());
        debug!(entries = entries.len(), "card list parsed");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CardEntry] {
        &self.entries
    }

    /// Entries matching a normalized ATR string, in file order.
    pub fn lookup(&self, atr: &str) -> Vec<&CardEntry> {
        let atr = atr.trim().to_ascii_uppercase();
        self.entries
            .iter()
            .filter(|entry| entry.matcher.matches(&atr))
            .collect()
    }
}

fn compile(atr: &str, line: usize) -> Result<AtrMatcher, CardListError> {
    if !atr.contains(PATTERN_CHARS) {
        return Ok(AtrMatcher::Literal(atr.to_string()));
    }
    Regex::new(&format!("^(?:{atr})$"))
        .map(AtrMatcher::Pattern)
        .map_err(|err| CardListError::Pattern {
            line,
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{CardList, CardListError};

    const LIST: &str = "\
# smartcard list
3B A7 00 40 18 80 65 A2 08 01 01 52
\tGemplus GPK8000
\tGemSAFE Smart Card (8K)

3B A7 00 40 .. 80 65 A2 08 .. .. ..
\tGemplus GemSAFE family

3F 65 25 .. .. 04 6C 90 .0
\tCarte Bancaire (French banking card)
";

    #[test]
    fn parse_entries_and_descriptions() {
        let list = CardList::parse(LIST).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.entries()[0].descriptions.len(), 2);
        assert!(!list.entries()[0].is_pattern());
        assert!(list.entries()[1].is_pattern());
    }

    #[test]
    fn lookup_matches_literal_and_pattern() {
        let list = CardList::parse(LIST).unwrap();
        let hits = list.lookup("3b a7 00 40 18 80 65 a2 08 01 01 52");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].descriptions[0], "Gemplus GPK8000");
        assert_eq!(hits[1].descriptions[0], "Gemplus GemSAFE family");
    }

    #[test]
    fn lookup_without_match_is_empty() {
        let list = CardList::parse(LIST).unwrap();
        assert!(list.lookup("3B 00").is_empty());
    }

    #[test]
    fn pattern_is_anchored() {
        let list = CardList::parse("3B ..\n\tshort\n").unwrap();
        assert_eq!(list.lookup("3B 00").len(), 1);
        assert!(list.lookup("3B 00 00").is_empty());
    }

    #[test]
    fn invalid_pattern_reports_line() {
        let err = CardList::parse("# c\n3B [\n").unwrap_err();
        assert!(matches!(err, CardListError::Pattern { line: 2, .. }));
    }
}
