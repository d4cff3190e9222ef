use super::*;

/// One bracketed attribute test, e.g. `[href^="#"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttrCondition {
    pub(crate) key: String,
    pub(crate) op: AttrOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
    Suffix(String),
    Substring(String),
}

impl AttrCondition {
    pub(crate) fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match &self.op {
            AttrOp::Exists => true,
            AttrOp::Equals(value) => actual == value,
            AttrOp::Prefix(value) => actual.starts_with(value.as_str()),
            AttrOp::Suffix(value) => actual.ends_with(value.as_str()),
            AttrOp::Substring(value) => actual.contains(value.as_str()),
        }
    }
}

/// Everything that must hold for a single element: `a.nav-link[href]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrCondition>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        !self.universal
            && self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
    }

    /// The id of a bare `#id` compound, which can be answered from the id index.
    pub(crate) fn id_only(&self) -> Option<&str> {
        let id = self.id.as_deref()?;
        let bare = !self.universal
            && self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty();
        bare.then_some(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) compound: Compound,
    /// How this part relates to the one on its left; `None` for the first.
    pub(crate) combinator: Option<Combinator>,
}

/// Parses a comma-separated selector list into chains of compounds.
pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    let unsupported = || Error::UnsupportedSelector(selector.into());
    let mut groups = Vec::new();
    let mut chain: Vec<SelectorPart> = Vec::new();
    let mut pending: Option<Combinator> = None;
    let mut rest = selector;

    loop {
        rest = rest.trim_start();
        let Some(ch) = rest.chars().next() else {
            break;
        };
        match ch {
            ',' | '>' if chain.is_empty() || pending.is_some() => return Err(unsupported()),
            ',' => {
                groups.push(std::mem::take(&mut chain));
                rest = &rest[1..];
            }
            '>' => {
                pending = Some(Combinator::Child);
                rest = &rest[1..];
            }
            _ => {
                let len = compound_len(rest).filter(|len| *len > 0).ok_or_else(unsupported)?;
                let compound = parse_compound(&rest[..len]).ok_or_else(unsupported)?;
                let combinator = if chain.is_empty() {
                    None
                } else {
                    Some(pending.take().unwrap_or(Combinator::Descendant))
                };
                chain.push(SelectorPart { compound, combinator });
                rest = &rest[len..];
            }
        }
    }

    if chain.is_empty() || pending.is_some() {
        return Err(unsupported());
    }
    groups.push(chain);
    Ok(groups)
}

/// Byte length of the compound at the start of `src`. Whitespace and
/// combinator characters end it unless they sit inside `[...]`.
fn compound_len(src: &str) -> Option<usize> {
    let mut in_brackets = false;
    let mut quote: Option<char> = None;
    for (index, ch) in src.char_indices() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' if in_brackets => quote = Some(ch),
            '[' if !in_brackets => in_brackets = true,
            ']' if in_brackets => in_brackets = false,
            '[' | ']' => return None,
            ',' | '>' | '+' | '~' if !in_brackets => return Some(index),
            ch if ch.is_whitespace() && !in_brackets => return Some(index),
            _ => {}
        }
    }
    (!in_brackets && quote.is_none()).then_some(src.len())
}

fn parse_compound(src: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = src;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '*' if compound.is_empty() => {
                compound.universal = true;
                rest = &rest[1..];
            }
            '#' => {
                let (id, tail) = split_ident(&rest[1..])?;
                if compound.id.replace(id.to_string()).is_some() {
                    return None;
                }
                rest = tail;
            }
            '.' => {
                let (class_name, tail) = split_ident(&rest[1..])?;
                compound.classes.push(class_name.to_string());
                rest = tail;
            }
            '[' => {
                let close = closing_bracket(rest)?;
                compound.attrs.push(parse_attr_condition(&rest[1..close])?);
                rest = &rest[close + 1..];
            }
            _ if compound.is_empty() => {
                let (tag, tail) = split_ident(rest)?;
                compound.tag = Some(tag.to_ascii_lowercase());
                rest = tail;
            }
            _ => return None,
        }
    }

    (!compound.is_empty()).then_some(compound)
}

fn split_ident(src: &str) -> Option<(&str, &str)> {
    let end = src
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'))
        .unwrap_or(src.len());
    (end > 0).then(|| src.split_at(end))
}

/// Index of the `]` closing the bracket at the start of `src`, skipping
/// quoted values.
fn closing_bracket(src: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    src.char_indices().skip(1).find_map(|(index, ch)| {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, ']') => return Some(index),
            (None, _) => {}
        }
        None
    })
}

/// `body` is the text between the brackets: `name`, `name=value` or
/// `name<op>=value` where `<op>` is one of `^ $ *`.
fn parse_attr_condition(body: &str) -> Option<AttrCondition> {
    let Some((lhs, rhs)) = body.split_once('=') else {
        return Some(AttrCondition {
            key: attr_name(body)?,
            op: AttrOp::Exists,
        });
    };

    let value = attr_value(rhs)?;
    let lhs = lhs.trim_end();
    let (name, op) = match lhs.chars().last()? {
        '^' => (&lhs[..lhs.len() - 1], AttrOp::Prefix(value)),
        '$' => (&lhs[..lhs.len() - 1], AttrOp::Suffix(value)),
        '*' => (&lhs[..lhs.len() - 1], AttrOp::Substring(value)),
        _ => (lhs, AttrOp::Equals(value)),
    };
    Some(AttrCondition {
        key: attr_name(name)?,
        op,
    })
}

fn attr_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':'));
    valid.then(|| name.to_ascii_lowercase())
}

fn attr_value(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let mut chars = raw.chars();
    match chars.next()? {
        open @ ('"' | '\'') => {
            let inner = chars.as_str().strip_suffix(open)?;
            (!inner.contains(open)).then(|| inner.to_string())
        }
        _ => (!raw.contains(char::is_whitespace)).then(|| raw.to_string()),
    }
}
