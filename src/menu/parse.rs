//! Item-string parser.
//!
//! Grammar, informally: entries separated by `|`. Within an entry, text runs
//! until the first `%x`, `%t` or `%i` code; digits after `%x` and `%i` are read
//! `atoi`-style. `%t` turns the entry into the title (the first one wins),
//! `%l` turns it into a separator. Empty entries are dropped, but codes written
//! in them apply to the next entry with text.
//!
//! Return values count from 1. An item without `%x` takes the previous item's
//! value plus one; separators and titles do not count.

use super::lexer::{leading_int, tokenize, Token};

// ---------------------------------------------------------------------------
// MenuSpec
// ---------------------------------------------------------------------------

/// One parsed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item { label: String, retval: i32, icon: Option<u32> },
    Separator,
}

/// A parsed item string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuSpec {
    pub title: Option<String>,
    pub title_icon: Option<u32>,
    pub entries: Vec<MenuEntry>,
}

impl MenuSpec {
    /// Parse an item string. Never fails: malformed codes parse best-effort.
    pub fn parse(input: &str) -> Self {
        let mut spec = MenuSpec::default();
        let mut entry = Pending::default();
        let mut next = 1;

        for (token, span) in tokenize(input) {
            match token {
                Token::Pipe => {
                    entry = entry.finish(input, span.start, &mut spec, &mut next);
                }
                Token::Value => {
                    entry.retval = Some(leading_int(&input[span.end..]));
                    entry.terminate(span.start);
                }
                Token::Icon => {
                    entry.icon = Some(leading_int(&input[span.end..]).max(0) as u32);
                    entry.terminate(span.start);
                }
                Token::Title => {
                    entry.title = true;
                    entry.terminate(span.start);
                }
                Token::Line => {
                    entry.line = true;
                    entry.start.get_or_insert(span.start);
                }
                // A stray `%` inside text stays part of it.
                Token::Percent => {}
                Token::Text => {
                    entry.start.get_or_insert(span.start);
                }
            }
        }
        entry.finish(input, input.len(), &mut spec, &mut next);
        spec
    }

    /// Menu items only, without separators.
    pub fn items(&self) -> impl Iterator<Item = (&str, i32, Option<u32>)> {
        self.entries.iter().filter_map(|e| match e {
            MenuEntry::Item { label, retval, icon } => Some((label.as_str(), *retval, *icon)),
            MenuEntry::Separator => None,
        })
    }

    /// Label of the item whose return value is `value`. The last match wins.
    pub fn label_for(&self, value: f64) -> Option<&str> {
        self.items().filter(|(_, retval, _)| f64::from(*retval) == value).map(|(label, _, _)| label).last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The entry being scanned.
#[derive(Debug, Default)]
struct Pending {
    /// Byte offset where the entry text starts.
    start: Option<usize>,
    /// Byte offset where a code cut the text short.
    end: Option<usize>,
    retval: Option<i32>,
    icon: Option<u32>,
    title: bool,
    line: bool,
}

impl Pending {
    fn terminate(&mut self, at: usize) {
        if self.start.is_some() && self.end.is_none() {
            self.end = Some(at);
        }
    }

    fn text<'a>(&self, input: &'a str, segment_end: usize) -> Option<&'a str> {
        let start = self.start?;
        let end = self.end.unwrap_or(segment_end).max(start);
        Some(&input[start..end])
    }

    /// Emit the entry and return the state the next entry starts from.
    ///
    /// An entry without text emits nothing and hands all its codes on. A
    /// title hands on its `%x` value.
    fn finish(self, input: &str, segment_end: usize, spec: &mut MenuSpec, next: &mut i32) -> Pending {
        if self.line && !self.title {
            spec.entries.push(MenuEntry::Separator);
            return Pending::default();
        }
        let Some(text) = self.text(input, segment_end) else {
            return Pending { retval: self.retval, icon: self.icon, title: self.title, ..Pending::default() };
        };
        if self.title {
            if spec.title.is_none() {
                spec.title = Some(text.to_owned());
                spec.title_icon = self.icon;
            }
            return Pending { retval: self.retval, ..Pending::default() };
        }
        let retval = self.retval.unwrap_or(*next);
        spec.entries.push(MenuEntry::Item { label: text.to_owned(), retval, icon: self.icon });
        *next = retval.saturating_add(1);
        Pending::default()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(label: &str, retval: i32) -> MenuEntry {
        MenuEntry::Item { label: label.into(), retval, icon: None }
    }

    #[test]
    fn title_items_override_and_separator() {
        let spec = MenuSpec::parse("Title%t|A|B%x5|%l|C");
        assert_eq!(spec.title.as_deref(), Some("Title"));
        assert_eq!(spec.entries, vec![item("A", 1), item("B", 5), MenuEntry::Separator, item("C", 6)]);
    }

    #[test]
    fn untitled_and_empty_segments() {
        let spec = MenuSpec::parse("A||B|");
        assert_eq!(spec.title, None);
        assert_eq!(spec.entries, vec![item("A", 1), item("B", 2)]);
    }

    #[test]
    fn first_title_wins() {
        let spec = MenuSpec::parse("One%t|Two%t|X");
        assert_eq!(spec.title.as_deref(), Some("One"));
        assert_eq!(spec.entries, vec![item("X", 1)]);
    }

    #[test]
    fn value_in_title_carries_to_next_item() {
        let spec = MenuSpec::parse("T%t%x10|A|B");
        assert_eq!(spec.entries, vec![item("A", 10), item("B", 11)]);
    }

    #[test]
    fn codes_in_empty_entries_apply_to_the_next_one() {
        let spec = MenuSpec::parse("%t|A|B");
        assert_eq!(spec.title.as_deref(), Some("A"));
        assert_eq!(spec.entries, vec![item("B", 1)]);

        assert_eq!(MenuSpec::parse("%x|A|B").entries, vec![item("A", 0), item("B", 1)]);

        let spec = MenuSpec::parse("%i|%t|Menu|A");
        assert_eq!(spec.title.as_deref(), Some("Menu"));
        assert_eq!(spec.title_icon, Some(0));
        assert_eq!(spec.entries, vec![item("A", 1)]);
    }

    #[test]
    fn digits_after_a_leading_code_are_entry_text() {
        assert_eq!(MenuSpec::parse("%x7|A").entries, vec![item("7", 7), item("A", 8)]);
        assert_eq!(
            MenuSpec::parse("%i5|A").entries,
            vec![MenuEntry::Item { label: "5".into(), retval: 1, icon: Some(5) }, item("A", 2)]
        );
    }

    #[test]
    fn text_after_codes_is_dropped() {
        let spec = MenuSpec::parse("Wire%x7 junk|Solid");
        assert_eq!(spec.entries, vec![item("Wire", 7), item("Solid", 8)]);
    }

    #[test]
    fn code_before_text_keeps_digits() {
        let spec = MenuSpec::parse("%x5Foo");
        assert_eq!(spec.entries, vec![item("5Foo", 5)]);
    }

    #[test]
    fn non_numeric_value_is_zero() {
        let spec = MenuSpec::parse("A%xq|B");
        assert_eq!(spec.entries, vec![item("A", 0), item("B", 1)]);
    }

    #[test]
    fn icons_and_stray_percent() {
        let spec = MenuSpec::parse("%i12Open|50%");
        assert_eq!(
            spec.entries,
            vec![
                MenuEntry::Item { label: "12Open".into(), retval: 1, icon: Some(12) },
                item("50%", 2),
            ]
        );
    }

    #[test]
    fn label_lookup_last_match_wins() {
        let spec = MenuSpec::parse("A%x3|B%x3|C");
        assert_eq!(spec.label_for(3.0), Some("B"));
        assert_eq!(spec.label_for(4.0), Some("C"));
        assert_eq!(spec.label_for(9.0), None);
    }
}
