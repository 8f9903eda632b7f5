//! Compound selector parsing and matching.
//!
//! Group keys are plain selector strings. Hosts only need to resolve the
//! compound forms (`div`, `#id`, `.class` and combinations such as
//! `span.badge.hot`); combinators are rejected rather than mis-matched.

use crate::ElementData;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SimpleSelector {
    Type(String),
    Id(String),
    Class(String),
    Universal,
}

/// A sequence of simple selectors that must all match one element.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// Parse a compound selector. Returns `None` for empty input or anything
    /// containing a combinator or other unsupported syntax.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mut simples = Vec::new();
        let mut chars = trimmed.chars().peekable();
        while let Some(&next) = chars.peek() {
            match next {
                '*' => {
                    chars.next();
                    simples.push(SimpleSelector::Universal);
                }
                '#' => {
                    chars.next();
                    let name = take_ident(&mut chars)?;
                    simples.push(SimpleSelector::Id(name));
                }
                '.' => {
                    chars.next();
                    let name = take_ident(&mut chars)?;
                    simples.push(SimpleSelector::Class(name));
                }
                c if is_ident_char(c) => {
                    let name = take_ident(&mut chars)?;
                    simples.push(SimpleSelector::Type(name.to_ascii_lowercase()));
                }
                // Whitespace, '>', '+', '~', attribute or pseudo syntax.
                _ => return None,
            }
        }
        Some(Self { simples })
    }

    /// Whether every simple selector matches the element.
    pub fn matches(&self, element: &ElementData) -> bool {
        self.simples.iter().all(|simple| match simple {
            SimpleSelector::Universal => true,
            SimpleSelector::Type(tag) => element.tag == *tag,
            SimpleSelector::Id(id) => element.id.as_deref() == Some(id.as_str()),
            SimpleSelector::Class(class) => element.classes.iter().any(|c| c == class),
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if is_ident_char(c) {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if out.is_empty() { None } else { Some(out) }
}
