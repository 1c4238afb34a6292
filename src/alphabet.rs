use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};

use crate::error::AlphabetError;

static ALPHABET_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/alphabets");

/// Alphabets bundled with the game.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinAlphabet {
    English,
    Russian,
    Greek,
}

impl BuiltinAlphabet {
    pub const ALL: [BuiltinAlphabet; 3] = [
        BuiltinAlphabet::English,
        BuiltinAlphabet::Russian,
        BuiltinAlphabet::Greek,
    ];

    pub fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn load(self) -> Result<AlphabetSequence, AlphabetError> {
        AlphabetSequence::builtin(&self.file_name())
    }
}

#[derive(Deserialize)]
struct AlphabetFile {
    title: String,
    letters: Vec<char>,
}

/// The fixed, ordered target the player has to reproduce.
///
/// Always non-empty and stored in lowercase canonical form, so a typed buffer
/// can be compared against it after a single `to_lowercase`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphabetSequence {
    title: String,
    letters: Vec<char>,
    joined: String,
}

impl AlphabetSequence {
    pub fn new(title: impl Into<String>, letters: Vec<char>) -> Result<Self, AlphabetError> {
        if letters.is_empty() {
            return Err(AlphabetError::Empty);
        }
        for &c in &letters {
            if c.is_whitespace() {
                return Err(AlphabetError::Whitespace(c));
            }
            if !is_canonical_lowercase(c) {
                return Err(AlphabetError::NotLowercase(c));
            }
        }
        let joined = letters.iter().collect();

        Ok(Self {
            title: title.into(),
            letters,
            joined,
        })
    }

    /// Load one of the alphabets embedded at build time, e.g. `russian.json`.
    pub fn builtin(file_name: &str) -> Result<Self, AlphabetError> {
        let file = ALPHABET_DIR
            .get_file(file_name)
            .ok_or_else(|| AlphabetError::UnknownBuiltin(file_name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| AlphabetError::Encoding {
                name: file_name.to_string(),
            })?;

        let parsed: AlphabetFile =
            serde_json::from_str(contents).map_err(|source| AlphabetError::Parse {
                name: file_name.to_string(),
                source,
            })?;

        Self::new(parsed.title, parsed.letters)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// All letters as one string, the exact text a finished buffer must equal.
    pub fn joined(&self) -> &str {
        &self.joined
    }
}

impl FromStr for AlphabetSequence {
    type Err = AlphabetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new("Custom", s.chars().collect())
    }
}

impl fmt::Display for AlphabetSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined)
    }
}

fn is_canonical_lowercase(c: char) -> bool {
    let mut lower = c.to_lowercase();
    lower.next() == Some(c) && lower.next().is_none()
}
