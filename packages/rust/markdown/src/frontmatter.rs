//! Front matter detection, removal, and injection.

/// Line that opens and closes a front matter block.
pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Remove a leading front matter block from `raw`.
///
/// Returns `None` when the first line is not exactly the delimiter. The body
/// starts on the line after the closing delimiter; every kept line is
/// re-terminated with `eol`. A block without a closing delimiter is treated
/// as closing on line 1, so the first line after the opening delimiter is
/// dropped along with it.
pub fn strip_front_matter(raw: &str, eol: &str, skip_blank_after: bool) -> Option<String> {
    let lines: Vec<&str> = raw.split(eol).collect();
    if lines.first() != Some(&FRONT_MATTER_DELIMITER) {
        return None;
    }

    let end_index = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| **line == FRONT_MATTER_DELIMITER)
        .map(|(i, _)| i)
        .unwrap_or(1);

    let mut start = end_index + 1;
    if skip_blank_after && lines.get(start).is_some_and(|line| line.is_empty()) {
        start += 1;
    }

    let mut body = String::with_capacity(raw.len());
    for line in lines.get(start..).unwrap_or_default() {
        body.push_str(line);
        body.push_str(eol);
    }
    Some(body)
}

/// Build the injected front matter block, including the trailing blank line.
pub fn build_front_matter(heading: &str, hidden: Option<bool>, eol: &str) -> String {
    let mut fm = String::new();
    fm.push_str(FRONT_MATTER_DELIMITER);
    fm.push_str(eol);
    fm.push_str(&format!("title: {heading}{eol}"));
    fm.push_str(&format!("excerpt: {heading}{eol}"));
    if let Some(hidden) = hidden {
        fm.push_str(&format!("hidden: {hidden}{eol}"));
    }
    fm.push_str(FRONT_MATTER_DELIMITER);
    fm.push_str(eol);
    fm.push_str(eol);
    fm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_front_matter_returns_none() {
        assert!(strip_front_matter("# Title\n\nBody", "\n", false).is_none());
    }

    #[test]
    fn delimiter_must_be_the_whole_first_line() {
        assert!(strip_front_matter("----\ntitle: x\n---\n", "\n", false).is_none());
        assert!(strip_front_matter("--- \ntitle: x\n---\n", "\n", false).is_none());
    }

    #[test]
    fn strips_block_and_keeps_following_lines() {
        let raw = "---\nsidebar_position: 2\nslug: intro\n---\n# Intro\nText";
        let body = strip_front_matter(raw, "\n", false).unwrap();
        assert_eq!(body, "# Intro\nText\n");
    }

    #[test]
    fn trailing_terminator_yields_extra_line() {
        let raw = "---\na: b\n---\n# T\n";
        let body = strip_front_matter(raw, "\n", false).unwrap();
        assert_eq!(body, "# T\n\n");
    }

    #[test]
    fn closing_delimiter_must_match_exactly() {
        let raw = "---\na: b\n--- \n---\nbody";
        let body = strip_front_matter(raw, "\n", false).unwrap();
        assert_eq!(body, "body\n");
    }

    #[test]
    fn missing_closing_delimiter_drops_first_content_line() {
        let raw = "---\nfirst\nsecond\nthird";
        let body = strip_front_matter(raw, "\n", false).unwrap();
        assert_eq!(body, "second\nthird\n");
    }

    #[test]
    fn delimiter_only_document_is_empty() {
        assert_eq!(strip_front_matter("---", "\n", false).unwrap(), "");
    }

    #[test]
    fn skip_blank_after_only_skips_one_empty_line() {
        let raw = "---\na: b\n---\n\n\n# T";
        assert_eq!(strip_front_matter(raw, "\n", true).unwrap(), "\n# T\n");
        assert_eq!(strip_front_matter(raw, "\n", false).unwrap(), "\n\n# T\n");

        let tight = "---\na: b\n---\n# T";
        assert_eq!(strip_front_matter(tight, "\n", true).unwrap(), "# T\n");
    }

    #[test]
    fn crlf_terminator() {
        let raw = "---\r\na: b\r\n---\r\n# T";
        assert_eq!(strip_front_matter(raw, "\r\n", false).unwrap(), "# T\r\n");
        // Split on LF, a CRLF delimiter line is not an exact match.
        assert!(strip_front_matter(raw, "\n", false).is_none());
    }

    #[test]
    fn builds_block_with_optional_hidden() {
        assert_eq!(
            build_front_matter("Setup", None, "\n"),
            "---\ntitle: Setup\nexcerpt: Setup\n---\n\n"
        );
        assert_eq!(
            build_front_matter("", Some(false), "\r\n"),
            "---\r\ntitle: \r\nexcerpt: \r\nhidden: false\r\n---\r\n\r\n"
        );
    }
}
