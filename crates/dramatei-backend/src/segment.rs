//! Line and speech segmentation
//!
//! Splits the raw text of one dialogue node into discrete line units. The
//! split boundary is the site's internal line-break convention: the `\n`
//! markers the flattener placed at `<br>` positions, never sentence or
//! paragraph boundaries. Parenthesized text embedded mid-line is yielded as a
//! separate stage fragment positioned between the surrounding line fragments.
//!
//! [`Fragments`] is a lazy, finite iterator borrowing the input; a clone made
//! before consumption restarts the traversal.

/// One segment of a dialogue node: line content or an inline stage direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// Dialogue line content, trimmed
    Line(&'a str),
    /// Bracketed inline stage direction, without the brackets, trimmed
    Stage(&'a str),
}

/// Lazy segmenter over the raw text of one dialogue node.
///
/// Segments are separated by `\n`, trimmed, and dropped when empty after
/// trimming. An opening bracket with no closing bracket is not a stage
/// marker; the text stays line content.
///
/// # Examples
///
/// ```rust
/// use dramatei_backend::{Fragment, Fragments};
///
/// let fragments: Vec<_> = Fragments::new("Erste Zeile\n(ab)\nZweite Zeile").collect();
/// assert_eq!(
///     fragments,
///     vec![
///         Fragment::Line("Erste Zeile"),
///         Fragment::Stage("ab"),
///         Fragment::Line("Zweite Zeile"),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Fragments<'a> {
    /// Remainder of the segment currently being scanned for inline brackets
    segment: &'a str,
    /// Input not yet split into segments; `None` once exhausted
    rest: Option<&'a str>,
}

impl<'a> Fragments<'a> {
    /// Creates a segmenter over the raw text of one dialogue node.
    #[inline]
    #[must_use = "iterators are lazy and do nothing unless consumed"]
    pub const fn new(text: &'a str) -> Self {
        Self {
            segment: "",
            rest: Some(text),
        }
    }
}

impl<'a> Iterator for Fragments<'a> {
    type Item = Fragment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.segment.trim().is_empty() {
                let rest = self.rest?;
                match rest.find('\n') {
                    Some(position) => {
                        self.segment = &rest[..position];
                        self.rest = Some(&rest[position + 1..]);
                    }
                    None => {
                        self.segment = rest;
                        self.rest = None;
                    }
                }
                continue;
            }

            if let Some(open) = self.segment.find('(') {
                if let Some(close) = self.segment[open..].find(')').map(|i| open + i) {
                    let before = self.segment[..open].trim();
                    if !before.is_empty() {
                        // Keep the bracketed part for the next call
                        self.segment = &self.segment[open..];
                        return Some(Fragment::Line(before));
                    }
                    let inner = self.segment[open + 1..close].trim();
                    self.segment = &self.segment[close + 1..];
                    if inner.is_empty() {
                        continue;
                    }
                    return Some(Fragment::Stage(inner));
                }
            }

            let line = self.segment.trim();
            self.segment = "";
            return Some(Fragment::Line(line));
        }
    }
}
