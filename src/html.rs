use super::*;

/// Decodes `&name;`, `&#NN;` and `&#xNN;`. Unknown references stay as written.
fn decode_character_references(src: &str) -> String {
    fn named(name: &str) -> Option<char> {
        Some(match name {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{00A0}',
            "copy" => '\u{00A9}',
            _ => return None,
        })
    }

    fn numeric(digits: &str) -> Option<char> {
        let codepoint = match digits.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => digits.parse().ok()?,
        };
        char::from_u32(codepoint)
    }

    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp + 1..];
        let reference = rest.split_once(';').and_then(|(name, tail)| {
            let ch = match name.strip_prefix('#') {
                Some(digits) => numeric(digits),
                None => named(name),
            };
            ch.map(|ch| (ch, tail))
        });
        match reference {
            Some((ch, tail)) => {
                out.push(ch);
                rest = tail;
            }
            None => out.push('&'),
        }
    }
    out.push_str(rest);
    out
}

enum Markup {
    StartTag,
    EndTag,
    Declaration,
}

fn markup_at(src: &str) -> Option<Markup> {
    match src.strip_prefix('<')?.chars().next()? {
        '/' => Some(Markup::EndTag),
        '!' => Some(Markup::Declaration),
        ch if ch.is_ascii_alphabetic() => Some(Markup::StartTag),
        _ => None,
    }
}

struct StartTag<'a> {
    name: String,
    attrs: HashMap<String, String>,
    self_closing: bool,
    rest: &'a str,
}

pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let mut open = vec![dom.root];
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(comment) = rest.strip_prefix("<!--") {
            let end = comment
                .find("-->")
                .ok_or_else(|| Error::HtmlParse("unclosed HTML comment".into()))?;
            rest = &comment[end + 3..];
            continue;
        }

        let parent = *open
            .last()
            .ok_or_else(|| Error::HtmlParse("missing parent element".into()))?;

        match markup_at(rest) {
            Some(Markup::EndTag) => {
                let (name, tail) = end_tag(rest)?;
                rest = tail;
                // Unmatched end tags are ignored.
                if let Some(pos) = open.iter().rposition(|node| {
                    dom.tag_name(*node)
                        .is_some_and(|tag| tag.eq_ignore_ascii_case(&name))
                }) {
                    open.truncate(pos.max(1));
                }
            }
            Some(Markup::Declaration) => {
                let end = rest
                    .find('>')
                    .ok_or_else(|| Error::HtmlParse("unclosed declaration tag".into()))?;
                rest = &rest[end + 1..];
            }
            Some(Markup::StartTag) => {
                let tag = start_tag(rest)?;
                rest = tag.rest;
                let node = dom.create_element(parent, tag.name.clone(), tag.attrs);

                if tag.self_closing {
                    continue;
                }
                if is_raw_text_tag(&tag.name) {
                    let close = raw_text_end(rest, &tag.name)
                        .ok_or_else(|| Error::HtmlParse(format!("unclosed <{}>", tag.name)))?;
                    let body = &rest[..close];
                    if !body.is_empty() {
                        let text = if is_escapable_raw_text_tag(&tag.name) {
                            decode_character_references(body)
                        } else {
                            body.to_string()
                        };
                        dom.create_text(node, text);
                    }
                    rest = end_tag(&rest[close..])?.1;
                } else if !is_void_tag(&tag.name) {
                    open.push(node);
                }
            }
            None => {
                let end = rest
                    .char_indices()
                    .skip(1)
                    .find(|(_, ch)| *ch == '<')
                    .map_or(rest.len(), |(index, _)| index);
                let text = decode_character_references(&rest[..end]);
                if !text.is_empty() {
                    dom.create_text(parent, text);
                }
                rest = &rest[end..];
            }
        }
    }

    dom.initialize_form_control_values();
    dom.ensure_body()?;
    Ok(dom)
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

// Character references are decoded in these, but markup is not.
fn is_escapable_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "textarea" | "title")
}

fn split_while(src: &str, keep: impl Fn(char) -> bool) -> (&str, &str) {
    let end = src.find(|ch: char| !keep(ch)).unwrap_or(src.len());
    src.split_at(end)
}

fn is_tag_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn is_attr_name_char(ch: char) -> bool {
    is_tag_name_char(ch) || ch == ':' || ch == '@'
}

/// `src` starts at `<` followed by a letter.
fn start_tag(src: &str) -> Result<StartTag<'_>> {
    let (name, mut rest) = split_while(&src[1..], is_tag_name_char);
    let name = name.to_ascii_lowercase();
    let mut attrs = HashMap::new();

    loop {
        rest = rest.trim_start();
        let self_closing = rest.starts_with("/>");
        if self_closing || rest.starts_with('>') {
            let rest = &rest[if self_closing { 2 } else { 1 }..];
            return Ok(StartTag {
                name,
                attrs,
                self_closing,
                rest,
            });
        }

        let (attr, tail) = split_while(rest, is_attr_name_char);
        if attr.is_empty() {
            // Stray characters are skipped the way browsers recover from them.
            let mut chars = rest.chars();
            if chars.next().is_none() {
                return Err(Error::HtmlParse(format!("unclosed start tag <{name}>")));
            }
            rest = chars.as_str();
            continue;
        }

        let tail = tail.trim_start();
        let (value, tail) = match tail.strip_prefix('=') {
            Some(value) => attr_value(value.trim_start())?,
            None => (String::new(), tail),
        };
        attrs.entry(attr.to_ascii_lowercase()).or_insert(value);
        rest = tail;
    }
}

/// `src` starts at `</`.
fn end_tag(src: &str) -> Result<(String, &str)> {
    let (name, _) = split_while(src[2..].trim_start(), is_tag_name_char);
    let close = src
        .find('>')
        .ok_or_else(|| Error::HtmlParse("unclosed end tag".into()))?;
    Ok((name.to_ascii_lowercase(), &src[close + 1..]))
}

fn attr_value(src: &str) -> Result<(String, &str)> {
    match src.chars().next() {
        None => Err(Error::HtmlParse("missing attribute value".into())),
        Some(quote @ ('"' | '\'')) => {
            let body = &src[1..];
            let end = body
                .find(quote)
                .ok_or_else(|| Error::HtmlParse("unclosed quoted attribute value".into()))?;
            Ok((decode_character_references(&body[..end]), &body[end + 1..]))
        }
        Some(_) => {
            let end = src
                .char_indices()
                .find(|&(index, ch)| {
                    ch.is_ascii_whitespace() || ch == '>' || src[index..].starts_with("/>")
                })
                .map_or(src.len(), |(index, _)| index);
            Ok((decode_character_references(&src[..end]), &src[end..]))
        }
    }
}

/// Offset of the `</tag` that closes a raw-text element, matched without
/// regard to case.
fn raw_text_end(src: &str, tag: &str) -> Option<usize> {
    src.match_indices("</").map(|(index, _)| index).find(|index| {
        src.get(index + 2..index + 2 + tag.len())
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    })
}

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
