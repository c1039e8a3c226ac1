//! CSS selector subset used by the in-memory document
//!
//! Supported: type and `*` selectors, `#id`, `.class`, `[attr]`,
//! `[attr="value"]` (single, double or no quotes), descendant and `>`
//! combinators, and `,`-separated lists.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected {found:?} at offset {offset} in {selector:?}")]
    Unexpected {
        selector: String,
        found: char,
        offset: usize,
    },
    #[error("unterminated attribute selector in {0:?}")]
    Unterminated(String),
}

/// What the matcher needs to know about an element.
pub trait Subject: Sized {
    fn tag(&self) -> String;
    fn attr(&self, name: &str) -> Option<String>;
    fn parent_subject(&self) -> Option<Self>;

    fn has_class_name(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches<S: Subject>(&self, el: &S) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "*" && !el.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.attr("id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.has_class_name(c)) {
            return false;
        }
        self.attrs.iter().all(|a| match (&a.value, el.attr(&a.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => *expected == actual,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One comma-free selector; `combinators[i]` joins `compounds[i]` and
/// `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

impl Complex {
    fn matches<S: Subject>(&self, el: &S) -> bool {
        self.matches_at(self.compounds.len() - 1, el)
    }

    fn matches_at<S: Subject>(&self, idx: usize, el: &S) -> bool {
        if !self.compounds[idx].matches(el) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match self.combinators[idx - 1] {
            Combinator::Child => el
                .parent_subject()
                .map(|p| self.matches_at(idx - 1, &p))
                .unwrap_or(false),
            Combinator::Descendant => {
                let mut current = el.parent_subject();
                while let Some(ancestor) = current {
                    if self.matches_at(idx - 1, &ancestor) {
                        return true;
                    }
                    current = ancestor.parent_subject();
                }
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let selectors = split_list(input)
            .into_iter()
            .map(|part| parse_complex(part, input))
            .collect::<Result<Vec<_>, _>>()?;
        if selectors.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { selectors })
    }

    pub fn matches<S: Subject>(&self, el: &S) -> bool {
        self.selectors.iter().any(|s| s.matches(el))
    }
}

/// Split on commas that sit outside attribute brackets.
fn split_list(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(input[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

struct Cursor<'a> {
    chars: Vec<(usize, char)>,
    pos: usize,
    source: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().collect(),
            pos: 0,
            source,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn skip_whitespace(&mut self) -> bool {
        let before = self.pos;
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
        self.pos > before
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek().filter(|c| is_ident_char(*c)) {
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn unexpected(&self, full: &str) -> SelectorError {
        let (offset, found) = self
            .chars
            .get(self.pos)
            .copied()
            .unwrap_or((self.source.len(), '\0'));
        SelectorError::Unexpected {
            selector: full.to_string(),
            found,
            offset,
        }
    }
}

fn parse_complex(part: &str, full: &str) -> Result<Complex, SelectorError> {
    let mut cursor = Cursor::new(part);
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut pending: Option<Combinator> = None;

    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            None => break,
            Some('>') => {
                if compounds.is_empty() || pending.is_some() {
                    return Err(cursor.unexpected(full));
                }
                cursor.bump();
                pending = Some(Combinator::Child);
                continue;
            }
            Some(_) => {}
        }

        let compound = parse_compound(&mut cursor, full)?;
        if !compounds.is_empty() {
            combinators.push(pending.take().unwrap_or(Combinator::Descendant));
        }
        compounds.push(compound);
    }

    if compounds.is_empty() || pending.is_some() {
        return Err(SelectorError::Empty);
    }
    Ok(Complex {
        compounds,
        combinators,
    })
}

fn parse_compound(cursor: &mut Cursor<'_>, full: &str) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();

    if cursor.peek() == Some('*') {
        cursor.bump();
        compound.tag = Some("*".to_string());
    } else if cursor.peek().map(is_ident_char).unwrap_or(false) {
        compound.tag = Some(cursor.ident());
    }

    loop {
        match cursor.peek() {
            Some('#') => {
                cursor.bump();
                let id = cursor.ident();
                if id.is_empty() {
                    return Err(cursor.unexpected(full));
                }
                compound.id = Some(id);
            }
            Some('.') => {
                cursor.bump();
                let class = cursor.ident();
                if class.is_empty() {
                    return Err(cursor.unexpected(full));
                }
                compound.classes.push(class);
            }
            Some('[') => {
                cursor.bump();
                compound.attrs.push(parse_attr(cursor, full)?);
            }
            Some(c) if c.is_whitespace() || c == '>' => break,
            None => break,
            Some(_) => return Err(cursor.unexpected(full)),
        }
    }

    if compound.is_empty() {
        return Err(cursor.unexpected(full));
    }
    Ok(compound)
}

fn parse_attr(cursor: &mut Cursor<'_>, full: &str) -> Result<AttrSelector, SelectorError> {
    cursor.skip_whitespace();
    let name = cursor.ident();
    if name.is_empty() {
        return Err(cursor.unexpected(full));
    }
    cursor.skip_whitespace();

    let value = match cursor.bump() {
        Some(']') => return Ok(AttrSelector { name, value: None }),
        Some('=') => {
            cursor.skip_whitespace();
            match cursor.peek() {
                Some(q @ ('"' | '\'')) => {
                    cursor.bump();
                    let mut out = String::new();
                    loop {
                        match cursor.bump() {
                            Some(c) if c == q => break,
                            Some(c) => out.push(c),
                            None => return Err(SelectorError::Unterminated(full.to_string())),
                        }
                    }
                    out
                }
                _ => cursor.ident(),
            }
        }
        None => return Err(SelectorError::Unterminated(full.to_string())),
        Some(_) => {
            cursor.pos -= 1;
            return Err(cursor.unexpected(full));
        }
    };

    cursor.skip_whitespace();
    match cursor.bump() {
        Some(']') => Ok(AttrSelector {
            name,
            value: Some(value),
        }),
        None => Err(SelectorError::Unterminated(full.to_string())),
        Some(_) => {
            cursor.pos -= 1;
            Err(cursor.unexpected(full))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_whatsapp_selectors() {
        for selector in [
            "#main",
            "div[data-scrolltracepolicy=\"wa.web.conversation.messages\"]",
            "div[role=\"row\"] div.message-in, div[role=\"row\"] div.message-out",
            "span._ao3e.selectable-text.copyable-text > span",
            "footer div[contenteditable=\"true\"][data-tab]",
            "input[type='text']",
            "*",
        ] {
            assert!(SelectorList::parse(selector).is_ok(), "{selector}");
        }
    }

    #[test]
    fn test_rejects_malformed_selectors() {
        assert_eq!(SelectorList::parse(""), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("div >"), Err(SelectorError::Empty));
        assert!(matches!(
            SelectorList::parse("div[data-x=\"oops"),
            Err(SelectorError::Unterminated(_))
        ));
        assert!(matches!(
            SelectorList::parse("> div"),
            Err(SelectorError::Unexpected { found: '>', .. })
        ));
        assert!(SelectorList::parse("div..x").is_err());
    }

    #[test]
    fn test_commas_inside_attribute_values_do_not_split() {
        assert_eq!(split_list("a[title=\"x, y\"], b"), vec!["a[title=\"x, y\"]", "b"]);
    }
}
