//! Removal of generator-injected table of contents blocks.

use readmepack_shared::TocMarkers;

/// Remove the first generated TOC block from `body`.
///
/// The block runs from the line equal to `markers.start` through the next
/// line equal to `markers.end`, both inclusive. Bodies without a complete
/// pair come back unchanged. Returns the new body and whether a block was
/// removed.
pub(crate) fn strip_generated_toc(body: &str, markers: &TocMarkers, eol: &str) -> (String, bool) {
    let lines: Vec<&str> = body.split(eol).collect();

    let Some(start) = lines.iter().position(|line| *line == markers.start) else {
        return (body.to_string(), false);
    };
    let Some(offset) = lines[start + 1..]
        .iter()
        .position(|line| *line == markers.end)
    else {
        return (body.to_string(), false);
    };
    let end = start + 1 + offset;

    let kept: Vec<&str> = lines[..start]
        .iter()
        .chain(&lines[end + 1..])
        .copied()
        .collect();

    (kept.join(eol), true)
}
