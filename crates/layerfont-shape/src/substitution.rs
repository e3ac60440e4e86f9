//! Stylistic-set substitution
//!
//! Each set is a plain codepoint map. Enabled sets are applied in ascending
//! id order with the vertical-forms set last, and each set sees the output of
//! the previous one.

use layerfont_core::error::{ParseError, Result};
use layerfont_core::request::parse_glyph_ref;
use layerfont_core::VERTICAL_FORMS;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Environment variable naming the JSON substitution table
pub const GSUB_ENV: &str = "LAYERFONT_GSUB";

static GLOBAL: OnceLock<Arc<SubstitutionTable>> = OnceLock::new();

/// Read-only map of stylistic-set id to codepoint replacements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    sets: BTreeMap<String, HashMap<char, char>>,
}

impl SubstitutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{"ss02": {"65": 57344, ...}, ...}`
    ///
    /// Keys may also use any glyph-reference form (`U+0041`, a literal
    /// character). Values that are not scalar values are rejected.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let raw: BTreeMap<String, BTreeMap<String, u32>> = serde_json::from_slice(bytes)
            .map_err(|e| ParseError::Substitution(e.to_string()))?;

        let mut table = Self::new();
        for (set, entries) in raw {
            for (from, to) in entries {
                let source = parse_glyph_ref(&from).ok_or_else(|| {
                    ParseError::Substitution(format!("{}: bad source codepoint {:?}", set, from))
                })?;
                let target = char::from_u32(to).ok_or_else(|| {
                    ParseError::Substitution(format!("{}: bad target codepoint {}", set, to))
                })?;
                table.insert(&set, source, target);
            }
        }
        log::debug!("Loaded substitution table with {} sets", table.sets.len());
        Ok(table)
    }

    /// Load from disk; a missing file is an empty table
    pub fn from_path(path: &Path) -> Result<Self> {
        match std::fs::read(path) {
            Ok(bytes) => Self::from_json(&bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No substitution table at {}; stylistic sets disabled",
                    path.display()
                );
                Ok(Self::new())
            },
            Err(e) => Err(e.into()),
        }
    }

    /// The table named by `LAYERFONT_GSUB`, or an empty one
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(GSUB_ENV) else {
            return Self::new();
        };
        Self::from_path(Path::new(&path)).unwrap_or_else(|e| {
            log::warn!("Ignoring substitution table: {}", e);
            Self::new()
        })
    }

    /// Process-wide table, built from the environment on first use
    pub fn global() -> Arc<SubstitutionTable> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::from_env())))
    }

    /// Install the process-wide table; false if one is already in place
    pub fn install_global(table: SubstitutionTable) -> bool {
        GLOBAL.set(Arc::new(table)).is_ok()
    }

    pub fn insert(&mut self, set: &str, from: char, to: char) {
        self.sets
            .entry(set.to_ascii_lowercase())
            .or_default()
            .insert(from, to);
    }

    pub fn with(mut self, set: &str, pairs: impl IntoIterator<Item = (char, char)>) -> Self {
        for (from, to) in pairs {
            self.insert(set, from, to);
        }
        self
    }

    pub fn contains_set(&self, set: &str) -> bool {
        self.sets.contains_key(set)
    }

    /// Known set ids, ascending
    pub fn set_ids(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn set_len(&self, set: &str) -> usize {
        self.sets.get(set).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Final codepoint for `ch` after every enabled set has had its turn
    ///
    /// Unknown and empty ids are ignored.
    pub fn resolve<S: AsRef<str>>(&self, ch: char, enabled: &[S]) -> char {
        self.chain(enabled)
            .iter()
            .fold(ch, |current, set| set.get(&current).copied().unwrap_or(current))
    }

    /// [`resolve`](Self::resolve) over a whole text
    pub fn resolve_text<S: AsRef<str>>(&self, text: &[char], enabled: &[S]) -> Vec<char> {
        let chain = self.chain(enabled);
        text.iter()
            .map(|&ch| {
                chain
                    .iter()
                    .fold(ch, |current, set| set.get(&current).copied().unwrap_or(current))
            })
            .collect()
    }

    /// Maps of the enabled sets in application order
    fn chain<S: AsRef<str>>(&self, enabled: &[S]) -> Vec<&HashMap<char, char>> {
        let mut ids: Vec<&str> = enabled
            .iter()
            .map(|id| id.as_ref().trim())
            .filter(|id| !id.is_empty())
            .collect();
        ids.sort_by(|a, b| (*a == VERTICAL_FORMS).cmp(&(*b == VERTICAL_FORMS)).then(a.cmp(b)));
        ids.dedup();
        ids.into_iter().filter_map(|id| self.sets.get(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SubstitutionTable {
        SubstitutionTable::new()
            .with("ss01", [('A', '\u{E000}'), ('C', '\u{E002}')])
            .with("ss02", [('A', 'C'), ('O', '\u{E010}')])
            .with("ss05", [('L', '\u{E020}')])
    }

    #[test]
    fn test_no_sets_is_identity() {
        assert_eq!(table().resolve::<&str>('A', &[]), 'A');
    }

    #[test]
    fn test_chained_substitution() {
        // ss02 maps A to C, then ss01 (always last) maps C onwards
        assert_eq!(table().resolve('A', &["ss01", "ss02"]), '\u{E002}');
        assert_eq!(table().resolve('A', &["ss02"]), 'C');
        assert_eq!(table().resolve('A', &["ss01"]), '\u{E000}');
    }

    #[test]
    fn test_unknown_and_empty_ids_ignored() {
        assert_eq!(table().resolve('L', &["", "ss99", "ss05"]), '\u{E020}');
    }

    #[test]
    fn test_resolve_text() {
        let text: Vec<char> = "LOA".chars().collect();
        let resolved = table().resolve_text(&text, &["ss05", "ss02"]);
        assert_eq!(resolved, vec!['\u{E020}', '\u{E010}', 'C']);
    }

    #[test]
    fn test_from_json() {
        let json = br#"{"ss02": {"65": 67, "U+004F": 57360}, "SS04": {"I": 57376}}"#;
        let table = SubstitutionTable::from_json(json).unwrap();
        assert_eq!(table.set_ids().collect::<Vec<_>>(), vec!["ss02", "ss04"]);
        assert_eq!(table.resolve('O', &["ss02"]), '\u{E010}');
        assert_eq!(table.resolve('I', &["ss04"]), '\u{E020}');
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(SubstitutionTable::from_json(b"[1, 2]").is_err());
        assert!(SubstitutionTable::from_json(br#"{"ss02": {"65": 55296}}"#).is_err());
        assert!(SubstitutionTable::from_json(br#"{"ss02": {"AB": 67}}"#).is_err());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = std::env::temp_dir().join("layerfont-no-such-gsub.json");
        assert!(SubstitutionTable::from_path(&path).unwrap().is_empty());
    }
}
