//! Per-language stopword lists
//!
//! Lists are plain text, one word per line, stored as `<dir>/<lang>.txt`.
//! Each language is read at most once per store and never reloaded.

use crate::error::TermRankResult;
use dashmap::DashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// A set of stopwords for one language.
pub type Stopwords = Arc<HashSet<String>>;

/// Load-once cache of stopword lists keyed by language tag.
#[derive(Debug)]
pub struct StopwordStore {
    dir: PathBuf,
    cache: DashMap<String, Stopwords>,
}

impl StopwordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: DashMap::new(),
        }
    }

    /// `<data dir>/termrank/stopwords`, falling back to `~/.local/share`.
    pub fn default_dir() -> PathBuf {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
        data_dir.join("termrank").join("stopwords")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stopwords for `lang`, reading the list on first use.
    ///
    /// A missing list is an empty set, not an error. Tags that are not
    /// plain identifiers never touch the filesystem.
    pub fn get(&self, lang: &str) -> TermRankResult<Stopwords> {
        if let Some(words) = self.cache.get(lang) {
            return Ok(words.clone());
        }

        let words = if is_plain_tag(lang) {
            Arc::new(load_list(&self.dir.join(format!("{lang}.txt")))?)
        } else {
            warn!(lang, "language tag is not a plain identifier, using no stopwords");
            Arc::new(HashSet::new())
        };

        // First insert wins if another caller loaded the same list meanwhile
        let entry = self.cache.entry(lang.to_string()).or_insert(words);
        Ok(entry.value().clone())
    }

    /// Whether the list for `lang` has already been read.
    pub fn is_cached(&self, lang: &str) -> bool {
        self.cache.contains_key(lang)
    }

    pub fn cached_languages(&self) -> usize {
        self.cache.len()
    }
}

impl Default for StopwordStore {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

fn is_plain_tag(lang: &str) -> bool {
    !lang.is_empty()
        && lang
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Parse a list: one word per line, trimmed and lowercased, blanks skipped.
fn parse_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn load_list(path: &Path) -> TermRankResult<HashSet<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let words = parse_list(&content);
            debug!(path = %path.display(), words = words.len(), "stopword list loaded");
            Ok(words)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no stopword list, using empty set");
            Ok(HashSet::new())
        }
        Err(e) => Err(e.into()),
    }
}
