//! Source documents and their decomposition into parts

use serde::{Deserialize, Serialize};

/// Lines this short or shorter are dropped when decomposing.
const MIN_LINE_CHARS: usize = 10;

/// A document to extract relations from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// File name, extension included.
    pub title: String,
    /// Texts sent to the model one at a time.
    pub parts: Vec<String>,
}

impl Document {
    /// The whole text as a single part.
    pub fn whole(title: impl Into<String>, text: impl Into<String>) -> Self {
        Document {
            title: title.into(),
            parts: vec![text.into()],
        }
    }

    /// One part per level-one markdown heading.
    ///
    /// A new part starts at every line beginning with `"# "`; text before the
    /// first heading forms a leading part, which may be empty. Only lines
    /// longer than ten characters are kept.
    pub fn decomposed(title: impl Into<String>, text: &str) -> Self {
        let mut parts = vec![String::new()];
        for line in text.split('\n') {
            if line.starts_with("# ") {
                parts.push(String::new());
            }
            if line.chars().count() > MIN_LINE_CHARS {
                if let Some(current) = parts.last_mut() {
                    current.push_str(line);
                    current.push('\n');
                }
            }
        }
        Document {
            title: title.into(),
            parts,
        }
    }

    /// Title up to its first `.`; the key relations are stored under.
    pub fn stem(&self) -> &str {
        stem(&self.title)
    }

    pub fn is_multipart(&self) -> bool {
        self.parts.len() > 1
    }

    /// First line of a part, used to report progress.
    pub fn part_heading(&self, index: usize) -> &str {
        self.parts
            .get(index)
            .and_then(|p| p.split('\n').next())
            .unwrap_or_default()
    }
}

pub(crate) fn stem(title: &str) -> &str {
    title.split('.').next().unwrap_or(title)
}
