//! Shared domain types for the packaging pipeline.

use serde::{Deserialize, Serialize};

/// Default start marker of a generator-injected table of contents.
pub const DEFAULT_TOC_START_TAG: &str = "<!-- toc -->";

/// Default end marker of a generator-injected table of contents.
pub const DEFAULT_TOC_END_TAG: &str = "<!-- tocstop -->";

// ---------------------------------------------------------------------------
// PackVariant
// ---------------------------------------------------------------------------

/// Which flavour of the pipeline to run.
///
/// `Mirror` copies the whole tree, renaming index files in place.
/// `Versioned` builds a level-limited tree under a version-named working
/// directory, lifting index files out of their own directory, pruning empty
/// directories and stripping generated tables of contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackVariant {
    #[default]
    Mirror,
    Versioned,
}

impl std::fmt::Display for PackVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mirror => f.write_str("mirror"),
            Self::Versioned => f.write_str("versioned"),
        }
    }
}

impl std::str::FromStr for PackVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mirror" => Ok(Self::Mirror),
            "versioned" => Ok(Self::Versioned),
            other => Err(format!(
                "unknown variant '{other}': expected 'mirror' or 'versioned'"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// LineEnding
// ---------------------------------------------------------------------------

/// Line terminator used to split source documents and to write output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// The platform terminator (`\r\n` on Windows, `\n` elsewhere).
    #[default]
    Native,
    Lf,
    CrLf,
}

impl LineEnding {
    /// The terminator as a string slice.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Native => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TocMarkers
// ---------------------------------------------------------------------------

/// Start/end lines that delimit a generated table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocMarkers {
    pub start: String,
    pub end: String,
}

impl Default for TocMarkers {
    fn default() -> Self {
        Self {
            start: DEFAULT_TOC_START_TAG.into(),
            end: DEFAULT_TOC_END_TAG.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("Mirror".parse::<PackVariant>(), Ok(PackVariant::Mirror));
        assert_eq!(" versioned ".parse::<PackVariant>(), Ok(PackVariant::Versioned));
        assert!("flat".parse::<PackVariant>().unwrap_err().contains("flat"));
    }

    #[test]
    fn variant_display_matches_parse() {
        for v in [PackVariant::Mirror, PackVariant::Versioned] {
            assert_eq!(v.to_string().parse::<PackVariant>(), Ok(v));
        }
    }

    #[test]
    fn explicit_line_endings() {
        assert_eq!(LineEnding::Lf.as_str(), "\n");
        assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
        assert!(LineEnding::Native.as_str().ends_with('\n'));
    }
}
