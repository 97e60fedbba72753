//! Name-based classification of directory entries.
//!
//! Only the entry name is consulted; nothing here touches the filesystem.

/// Suffix identifying Markdown files.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// What the walker should do with a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A name without any `.` is treated as a subdirectory.
    Directory,
    /// A `.md` file.
    MarkdownFile,
    /// A `.md` file whose name contains the index marker.
    IndexFile,
    /// Anything else; skipped.
    Other,
}

impl EntryKind {
    /// True for both plain Markdown and index files.
    pub fn is_markdown(self) -> bool {
        matches!(self, Self::MarkdownFile | Self::IndexFile)
    }
}

/// Classify an entry by name.
pub fn classify(name: &str, index_marker: &str) -> EntryKind {
    if !name.contains('.') {
        EntryKind::Directory
    } else if name.ends_with(MARKDOWN_EXTENSION) {
        if name.contains(index_marker) {
            EntryKind::IndexFile
        } else {
            EntryKind::MarkdownFile
        }
    } else {
        EntryKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_without_dot_are_directories() {
        assert_eq!(classify("guides", "index"), EntryKind::Directory);
        assert_eq!(classify("getting-started", "index"), EntryKind::Directory);
        // No extension heuristic beyond the dot.
        assert_eq!(classify("LICENSE", "index"), EntryKind::Directory);
        assert_eq!(classify("index", "index"), EntryKind::Directory);
    }

    #[test]
    fn markdown_and_index_files() {
        assert_eq!(classify("install.md", "index"), EntryKind::MarkdownFile);
        assert_eq!(classify("index.md", "index"), EntryKind::IndexFile);
        assert_eq!(classify("_index.md", "index"), EntryKind::IndexFile);
        assert_eq!(classify("README.md", "README"), EntryKind::IndexFile);
        assert!(classify("index.md", "index").is_markdown());
    }

    #[test]
    fn everything_else_is_other() {
        assert_eq!(classify("logo.png", "index"), EntryKind::Other);
        assert_eq!(classify("index.mdx", "index"), EntryKind::Other);
        assert_eq!(classify("notes.md.bak", "index"), EntryKind::Other);
        assert_eq!(classify(".gitkeep", "index"), EntryKind::Other);
        assert!(!EntryKind::Other.is_markdown());
    }
}
