//! Type-ahead search.
//!
//! Keystrokes typed within the search window accumulate into one query.
//! Repeating a single character ("aaa") collapses the query back to one
//! character, so pressing the same key cycles through items sharing an
//! initial.  Each candidate is compared through a three-way
//! [`SearchMatch`]: a tentative match is remembered while the scan goes on,
//! a priority match ends it.

use rove_core::dom::{Document, NodeId};

/// Outcome of comparing one candidate against the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMatch {
    NoMatch,
    /// A match, but a later priority match may still win.
    Tentative,
    /// The best possible match; the scan stops here.
    Priority,
}

/// How many candidates matched during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCount {
    /// Tentative matches seen; `0` when nothing matched.
    Count(usize),
    /// The scan ended on a priority match.
    Priority,
}

/// What a scan found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The matched candidate, if any.
    pub item: Option<NodeId>,
    /// The effective query that was compared.
    pub query: String,
    pub matches: MatchCount,
}

/// Accumulated keystrokes and the generation of the pending expiry timer.
///
/// Every keystroke bumps the generation.  The owner arms a timer keyed by
/// the generation, and only the expiry carrying the current generation
/// clears the query, which makes re-arming an atomic cancel-and-replace.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    buffer: String,
    generation: u64,
    armed: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a keystroke and re-arm the window. Returns the effective query.
    pub fn push(&mut self, ch: char) -> String {
        self.buffer.extend(ch.to_lowercase());
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
        self.query().to_string()
    }

    /// Everything typed in the current window.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The query actually searched for.
    pub fn query(&self) -> &str {
        let mut chars = self.buffer.chars();
        match chars.next() {
            Some(first) if chars.all(|c| c == first) => &self.buffer[..first.len_utf8()],
            _ => &self.buffer,
        }
    }

    /// Length of [`query`](Self::query) in characters.
    pub fn query_len(&self) -> usize {
        self.query().chars().count()
    }

    /// Whether a search window is open.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The timer for `generation` fired. Stale generations are ignored.
    pub fn expire(&mut self, generation: u64) -> bool {
        if !self.armed || generation != self.generation {
            return false;
        }
        self.reset();
        true
    }

    /// Close the window and forget the query.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.armed = false;
    }
}

/// The text type-ahead compares against.
///
/// Uses the element's `label`, then the label of its focus node, then its
/// text content.
pub fn search_label(doc: &Document, item: NodeId) -> String {
    doc.label(item)
        .filter(|l| !l.is_empty())
        .or_else(|| {
            doc.focus_node(item)
                .and_then(|f| doc.label(f))
                .filter(|l| !l.is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| doc.text_content(item))
}

/// Case-insensitive prefix comparison, ignoring leading whitespace.
///
/// Any match is a [`SearchMatch::Priority`] so the scan stops on the first
/// hit; an empty query never matches.
pub fn default_compare(doc: &Document, item: NodeId, query: &str) -> SearchMatch {
    if query.is_empty() {
        return SearchMatch::NoMatch;
    }
    let label = search_label(doc, item);
    let prefix: String = label
        .trim_start()
        .chars()
        .take(query.chars().count())
        .collect::<String>()
        .to_lowercase();
    if prefix == query {
        SearchMatch::Priority
    } else {
        SearchMatch::NoMatch
    }
}

/// Walk the candidates once, comparing each against `query`.
///
/// `step(None)` must yield the first candidate and `step(Some(n))` the one
/// after `n`, wrapping.  With `advance` set (or no `start`) the scan begins
/// one step past `start`.  Returns `None` when there are no candidates, or
/// when advancing finds nothing besides `start`.
pub fn scan<S, C>(
    start: Option<NodeId>,
    query: &str,
    advance: bool,
    mut step: S,
    mut compare: C,
) -> Option<SearchResult>
where
    S: FnMut(Option<NodeId>) -> Option<NodeId>,
    C: FnMut(NodeId, &str) -> SearchMatch,
{
    let begin = match start {
        Some(current) if !advance => current,
        _ => step(start)?,
    };

    let mut item = None;
    let mut count = 0usize;
    let mut current = begin;
    let mut lap = None;
    loop {
        match compare(current, query) {
            SearchMatch::NoMatch => {}
            SearchMatch::Tentative => {
                count += 1;
                if item.is_none() {
                    item = Some(current);
                }
            }
            SearchMatch::Priority => {
                return Some(SearchResult {
                    item: Some(current),
                    query: query.to_string(),
                    matches: MatchCount::Priority,
                });
            }
        }

        match step(Some(current)) {
            Some(next) if next != begin && Some(next) != lap => {
                if lap.is_none() {
                    lap = Some(next);
                }
                current = next;
            }
            _ => break,
        }
    }

    Some(SearchResult {
        item,
        query: query.to_string(),
        matches: MatchCount::Count(count),
    })
}
