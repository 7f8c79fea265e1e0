//! CSS selector parsing.
//! Reference: <https://www.w3.org/TR/selectors-3/>

use crate::{
    Combinator, ComplexSelector, CompoundSelector, SelectorError, SelectorList, SimpleSelector,
};
use core::mem::take;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Tok {
    Combinator(Combinator),
    /// A whitespace run; a descendant combinator unless an explicit one follows.
    Whitespace,
    Simple(SimpleSelector),
}

struct SelectorTokenizer {
    chars: Vec<char>,
    index: usize,
}

impl SelectorTokenizer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            index: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn bump(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    fn next_token(&mut self) -> Result<Option<Tok>, SelectorError> {
        let Some(current) = self.peek() else {
            return Ok(None);
        };
        let token = match current {
            ws if ws.is_ascii_whitespace() => {
                self.skip_spaces();
                Tok::Whitespace
            }
            '*' => {
                self.bump();
                Tok::Simple(SimpleSelector::Universal)
            }
            '>' => {
                self.bump();
                Tok::Combinator(Combinator::Child)
            }
            '+' => {
                self.bump();
                Tok::Combinator(Combinator::AdjacentSibling)
            }
            '~' => {
                self.bump();
                Tok::Combinator(Combinator::GeneralSibling)
            }
            '.' => {
                self.bump();
                Tok::Simple(SimpleSelector::Class(self.required_ident()?))
            }
            '#' => {
                self.bump();
                Tok::Simple(SimpleSelector::IdSelector(self.required_ident()?))
            }
            '[' => {
                self.bump();
                self.consume_attr()?
            }
            other if is_ident_char(other) => {
                Tok::Simple(SimpleSelector::Type(self.consume_ident().to_ascii_lowercase()))
            }
            other => {
                return Err(SelectorError::UnexpectedChar {
                    offset: self.index,
                    found: other,
                });
            }
        };
        Ok(Some(token))
    }

    fn consume_ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(character) = self.peek() {
            if !is_ident_char(character) {
                break;
            }
            out.push(character);
            self.bump();
        }
        out
    }

    /// An identifier that must not be empty (after `.` or `#`).
    fn required_ident(&mut self) -> Result<String, SelectorError> {
        let ident = self.consume_ident();
        if ident.is_empty() {
            return Err(self.peek().map_or(SelectorError::Empty, |found| {
                SelectorError::UnexpectedChar {
                    offset: self.index,
                    found,
                }
            }));
        }
        Ok(ident)
    }

    /// `[name]` or `[name=value]` with the value quoted or bare. The opening
    /// bracket has already been consumed.
    fn consume_attr(&mut self) -> Result<Tok, SelectorError> {
        self.skip_spaces();
        let name = self.consume_ident().to_ascii_lowercase();
        if name.is_empty() {
            return Err(SelectorError::MalformedAttribute);
        }
        self.skip_spaces();
        let simple = match self.peek() {
            Some(']') => SimpleSelector::AttrExists(name),
            Some('=') => {
                self.bump();
                self.skip_spaces();
                let value = match self.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        self.bump();
                        self.consume_quoted(quote)?
                    }
                    _ => self.consume_bare_value(),
                };
                self.skip_spaces();
                SimpleSelector::AttrEquals { name, value }
            }
            _ => return Err(SelectorError::MalformedAttribute),
        };
        if self.peek() != Some(']') {
            return Err(SelectorError::MalformedAttribute);
        }
        self.bump();
        Ok(Tok::Simple(simple))
    }

    fn consume_bare_value(&mut self) -> String {
        let mut out = String::new();
        while let Some(character) = self.peek() {
            if character.is_ascii_whitespace() || character == ']' {
                break;
            }
            out.push(character);
            self.bump();
        }
        out
    }

    fn consume_quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(SelectorError::MalformedAttribute),
                Some(character) if character == quote => {
                    self.bump();
                    return Ok(out);
                }
                Some(character) => {
                    out.push(character);
                    self.bump();
                }
            }
        }
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(|character| character.is_ascii_whitespace()) {
            self.bump();
        }
    }
}

const fn is_ident_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '-' | '_') || !character.is_ascii()
}

/// Split on commas that are not inside a quoted attribute value.
fn split_list(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (offset, character) in input.char_indices() {
        match (quote, character) {
            (None, '"' | '\'') => quote = Some(character),
            (Some(open), _) if open == character => quote = None,
            (None, ',') => {
                parts.push(input.get(start..offset).unwrap_or_default());
                start = offset.saturating_add(1);
            }
            _ => {}
        }
    }
    parts.push(input.get(start..).unwrap_or_default());
    parts
}

/// Parse a comma-separated selector list. Every item must be a valid
/// complex selector.
/// Selectors 3, section 4
///
/// # Errors
/// Returns the first item's parse error.
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SelectorError> {
    let mut list = SelectorList::default();
    for part in split_list(input) {
        list.selectors.push(parse_complex_selector(part)?);
    }
    Ok(list)
}

/// Compounds collected so far for one complex selector.
#[derive(Default)]
struct ComplexBuilder {
    first: Option<CompoundSelector>,
    rest: Vec<(Combinator, CompoundSelector)>,
    current: CompoundSelector,
    /// Combinator joining `current` to the compound on its left, and whether
    /// it was written out (as opposed to implied by whitespace).
    pending: Option<(Combinator, bool)>,
}

impl ComplexBuilder {
    fn has_compound(&self) -> bool {
        !self.current.simples.is_empty()
    }

    /// Close the compound being built, if any.
    fn flush(&mut self) -> Result<(), SelectorError> {
        if !self.has_compound() {
            return Ok(());
        }
        if self.first.is_none() {
            self.first = Some(take(&mut self.current));
            return Ok(());
        }
        let (combinator, _) = self
            .pending
            .take()
            .ok_or(SelectorError::DanglingCombinator)?;
        self.rest.push((combinator, take(&mut self.current)));
        Ok(())
    }

    fn explicit_pending(&self) -> bool {
        matches!(self.pending, Some((_, true)))
    }

    fn finish(mut self) -> Result<ComplexSelector, SelectorError> {
        self.flush()?;
        if self.explicit_pending() {
            return Err(SelectorError::DanglingCombinator);
        }
        let first = self.first.ok_or(SelectorError::Empty)?;
        Ok(ComplexSelector {
            first,
            rest: self.rest,
        })
    }
}

/// Parse one complex selector.
/// Selectors 3, section 11: Combinators; Section 5-8: simple selectors
///
/// # Errors
/// Returns an error for empty input, unknown syntax (pseudo-classes included)
/// and combinators missing an operand.
pub fn parse_complex_selector(input: &str) -> Result<ComplexSelector, SelectorError> {
    let mut tokens = SelectorTokenizer::new(input.trim());
    let mut builder = ComplexBuilder::default();

    while let Some(token) = tokens.next_token()? {
        match token {
            Tok::Simple(simple) => builder.current.simples.push(simple),
            Tok::Whitespace => {
                let had_compound = builder.has_compound();
                builder.flush()?;
                if had_compound && builder.pending.is_none() {
                    builder.pending = Some((Combinator::Descendant, false));
                }
            }
            Tok::Combinator(combinator) => {
                let had_compound = builder.has_compound();
                builder.flush()?;
                let dangling =
                    builder.explicit_pending() || (!had_compound && builder.pending.is_none());
                if dangling {
                    return Err(SelectorError::DanglingCombinator);
                }
                builder.pending = Some((combinator, true));
            }
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests")]
    #![allow(clippy::assertions_on_result_states, reason = "tests")]

    use super::*;

    #[test]
    fn compound_with_descendant_and_child() {
        let sel = parse_complex_selector("div.card > .title span").unwrap();
        assert_eq!(
            sel.first.simples,
            vec![
                SimpleSelector::Type("div".into()),
                SimpleSelector::Class("card".into())
            ]
        );
        assert_eq!(sel.rest.len(), 2);
        assert_eq!(sel.rest[0].0, Combinator::Child);
        assert_eq!(sel.rest[1].0, Combinator::Descendant);
        assert_eq!(sel.rest[1].1.simples, vec![SimpleSelector::Type("span".into())]);
    }

    #[test]
    fn class_and_id_keep_case() {
        let sel = parse_complex_selector("#Main.IsOpen").unwrap();
        assert_eq!(
            sel.first.simples,
            vec![
                SimpleSelector::IdSelector("Main".into()),
                SimpleSelector::Class("IsOpen".into())
            ]
        );
    }

    #[test]
    fn attribute_forms() {
        let sel = parse_complex_selector("[hidden][data-kind='a, b']").unwrap();
        assert_eq!(
            sel.first.simples,
            vec![
                SimpleSelector::AttrExists("hidden".into()),
                SimpleSelector::AttrEquals {
                    name: "data-kind".into(),
                    value: "a, b".into()
                }
            ]
        );
        assert_eq!(parse_selector_list("[x='a, b'], p").unwrap().selectors.len(), 2);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_complex_selector("   "), Err(SelectorError::Empty));
        assert_eq!(parse_complex_selector("> a"), Err(SelectorError::DanglingCombinator));
        assert_eq!(parse_complex_selector("a >"), Err(SelectorError::DanglingCombinator));
        assert_eq!(parse_complex_selector("a > + b"), Err(SelectorError::DanglingCombinator));
        assert!(matches!(
            parse_complex_selector("a:hover"),
            Err(SelectorError::UnexpectedChar { found: ':', .. })
        ));
        assert_eq!(parse_complex_selector("[x"), Err(SelectorError::MalformedAttribute));
        assert!(parse_selector_list("a,").is_err());
    }
}
