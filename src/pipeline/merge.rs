//! Page merging with the repeated-header heuristic.
//!
//! LlamaParse returns one Markdown document per page, and report-style
//! PDFs re-print the document title at the top of every page. Merging
//! pages verbatim would repeat that title throughout the output, so every
//! page after the first has its leading paragraph dropped before
//! concatenation.
//!
//! ## Known fragility
//!
//! The heuristic assumes each later page begins with exactly one
//! double-newline-delimited header paragraph. A page whose content starts
//! immediately loses its first real paragraph; a page with no `\n\n`
//! boundary at all loses its entire text. This is a documented correctness
//! risk, not an invariant — callers who know their layout can disable the
//! strip with [`HeaderStrip::Keep`].

use crate::config::HeaderStrip;
use crate::output::Document;

/// Merge a file's pages into a single Markdown string.
///
/// - page 0 is included verbatim;
/// - each later, non-empty page is processed per `policy`;
/// - every page's processed text gets a single trailing space, and pages
///   are concatenated with no further separator.
///
/// For pages `[p0, p1, p2]` under the default policy the result is
/// `p0 + " " + strip(p1) + " " + strip(p2) + " "`.
pub fn merge_pages(pages: &[Document], policy: HeaderStrip) -> String {
    let mut merged = String::new();

    for (i, page) in pages.iter().enumerate() {
        let text = if i > 0 && !page.text.is_empty() && policy == HeaderStrip::FirstParagraph {
            strip_leading_paragraph(&page.text)
        } else {
            page.text.clone()
        };

        merged.push_str(&text);
        merged.push(' ');
    }

    merged
}

/// Drop everything up to the first paragraph break, rejoining the
/// remaining paragraphs with single newlines.
///
/// Note the asymmetry: paragraphs are *split* on `"\n\n"` but *rejoined*
/// with `"\n"`, so the strip also collapses the page's paragraph breaks.
fn strip_leading_paragraph(text: &str) -> String {
    let paragraphs: Vec<&str> = text.split("\n\n").collect();
    paragraphs[1..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<Document> {
        texts.iter().map(|t| Document::new(*t)).collect()
    }

    #[test]
    fn single_page_is_verbatim_plus_trailing_space() {
        let merged = merge_pages(&pages(&["# Title\n\nBody"]), HeaderStrip::FirstParagraph);
        assert_eq!(merged, "# Title\n\nBody ");
    }

    #[test]
    fn later_pages_lose_their_header_paragraph() {
        let merged = merge_pages(
            &pages(&[
                "# Title\n\nIntro",
                "# Title\n\nSecond page\n\nMore",
                "# Title\n\nThird page",
            ]),
            HeaderStrip::FirstParagraph,
        );
        assert_eq!(merged, "# Title\n\nIntro Second page\nMore Third page ");
    }

    #[test]
    fn empty_batch_merges_to_empty() {
        assert_eq!(merge_pages(&[], HeaderStrip::FirstParagraph), "");
    }

    #[test]
    fn empty_later_page_is_passed_through() {
        let merged = merge_pages(&pages(&["First", "", "Last\n\nBit"]), HeaderStrip::FirstParagraph);
        assert_eq!(merged, "First  Bit ");
    }

    #[test]
    fn page_without_paragraph_break_loses_all_text() {
        // The documented fragility: no "\n\n" boundary means the whole
        // page is treated as the header.
        let merged = merge_pages(&pages(&["First", "single block of text"]), HeaderStrip::FirstParagraph);
        assert_eq!(merged, "First  ");
    }

    #[test]
    fn keep_policy_disables_stripping() {
        let merged = merge_pages(
            &pages(&["# Title\n\nIntro", "# Title\n\nSecond"]),
            HeaderStrip::Keep,
        );
        assert_eq!(merged, "# Title\n\nIntro # Title\n\nSecond ");
    }

    #[test]
    fn rejoin_uses_single_newlines() {
        let merged = merge_pages(&pages(&["p0", "h\n\na\n\nb\n\nc"]), HeaderStrip::FirstParagraph);
        assert_eq!(merged, "p0 a\nb\nc ");
    }
}
