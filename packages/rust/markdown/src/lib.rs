//! Front matter normalization for Markdown documents.
//!
//! Rewrites a document so it starts with the metadata block documentation
//! hosts expect: any existing front matter is removed, an optional generated
//! table of contents is stripped, and a fresh block carrying `title`,
//! `excerpt` and optionally `hidden` is prepended. The title comes from the
//! first heading of the remaining body.

mod cleanup;
mod frontmatter;

use tracing::debug;

use readmepack_shared::{LineEnding, TocMarkers};

pub use frontmatter::{FRONT_MATTER_DELIMITER, build_front_matter, strip_front_matter};

/// Headings containing this phrase (case-insensitive) never become the title.
const TOC_HEADING_PHRASE: &str = "table of contents";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Options for [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Emit a `hidden:` field with this value.
    pub hidden: Option<bool>,
    /// Strip the generated TOC delimited by these markers.
    pub toc_markers: Option<TocMarkers>,
    /// Drop one blank line directly after the removed front matter.
    pub skip_blank_after_front_matter: bool,
    /// Terminator used to split the source and to write the output.
    pub line_ending: LineEnding,
}

/// Result of normalizing one document.
#[derive(Debug, Clone)]
pub struct NormalizeResult {
    /// The rewritten document, starting with the injected front matter.
    pub markdown: String,
    /// Heading used for `title` and `excerpt` (empty when none was found).
    pub title: String,
    /// Whether the source carried a front matter block.
    pub had_front_matter: bool,
    /// Whether a generated TOC block was removed.
    pub toc_stripped: bool,
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Normalize a document and return only the rewritten text.
pub fn normalize(raw: &str, opts: &NormalizeOptions) -> String {
    normalize_document(raw, opts).markdown
}

/// Normalize a document.
///
/// 1. Removes a leading `---` block (see [`strip_front_matter`])
/// 2. Removes the first generated TOC block, when markers are configured
/// 3. Extracts the first usable heading
/// 4. Prepends `title`, `excerpt` and optional `hidden` front matter
///
/// Running this twice is not a no-op: the injected block is treated as
/// source front matter on the second pass.
pub fn normalize_document(raw: &str, opts: &NormalizeOptions) -> NormalizeResult {
    let eol = opts.line_ending.as_str();

    let (body, had_front_matter) =
        match strip_front_matter(raw, eol, opts.skip_blank_after_front_matter) {
            Some(body) => (body, true),
            None => (raw.to_string(), false),
        };

    let (body, toc_stripped) = match &opts.toc_markers {
        Some(markers) => cleanup::strip_generated_toc(&body, markers, eol),
        None => (body, false),
    };

    let title = extract_heading(&body, opts.line_ending);
    let front_matter = build_front_matter(&title, opts.hidden, eol);

    debug!(
        title = %title,
        had_front_matter,
        toc_stripped,
        body_len = body.len(),
        "normalized document"
    );

    NormalizeResult {
        markdown: format!("{front_matter}{body}"),
        title,
        had_front_matter,
        toc_stripped,
    }
}

/// Find the first heading line that is not a table of contents heading.
///
/// A leading `"# "` is removed; deeper headings keep their markers.
/// Returns an empty string when the body has no usable heading.
pub fn extract_heading(body: &str, line_ending: LineEnding) -> String {
    body.split(line_ending.as_str())
        .find(|line| line.starts_with('#') && !line.to_lowercase().contains(TOC_HEADING_PHRASE))
        .map(|line| line.strip_prefix("# ").unwrap_or(line).to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
