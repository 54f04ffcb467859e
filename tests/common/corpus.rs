//! Sample texts and stopword lists

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use termrank::{ExtractorConfig, StopwordStore};

/// Reduces to `cat sat mat cat ate rat` once stopwords are removed.
pub const ENGLISH_TEXT: &str = "The cat sat on the mat. The cat ate the rat.";

pub const ENGLISH_STOPWORDS: &str = "the\non\n";

/// Reduces to `petróleo llegó mar petróleo mancha costa` with the Spanish
/// alphabet and stopwords.
pub const SPANISH_TEXT: &str = "El petróleo llegó al mar; el petróleo mancha la costa.";

pub const SPANISH_STOPWORDS: &str = "el\nla\nal\nde\n";

/// A temporary stopword directory holding `<lang>.txt` lists.
pub struct StopwordFixture {
    dir: TempDir,
}

impl StopwordFixture {
    pub fn new(lists: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("Failed to create stopword dir");
        for (lang, words) in lists {
            std::fs::write(dir.path().join(format!("{lang}.txt")), words)
                .expect("Failed to write stopword list");
        }
        Self { dir }
    }

    /// English and Spanish lists.
    pub fn standard() -> Self {
        Self::new(&[("en", ENGLISH_STOPWORDS), ("es", SPANISH_STOPWORDS)])
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> Arc<StopwordStore> {
        Arc::new(StopwordStore::new(self.path()))
    }

    /// Default configuration reading stopwords from this fixture.
    pub fn config(&self) -> ExtractorConfig {
        ExtractorConfig::default().with_stopwords_dir(self.path())
    }
}
