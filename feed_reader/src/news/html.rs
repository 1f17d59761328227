//! Tolerant, allocation-light HTML scanning.
//!
//! Just enough to pull cells out of a known table: tag detection is
//! case-insensitive, attribute order and whitespace don't matter, nested
//! elements of the same tag are balanced, and an unterminated element runs
//! to the end of the fragment instead of failing.

/// An element found in a document: its opening tag and its inner markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    pub open_tag: &'a str,
    pub inner: &'a str,
}

impl<'a> Element<'a> {
    /// Value of attribute `name` on the opening tag, entities decoded.
    pub fn attr(&self, name: &str) -> Option<String> {
        let lower = self.open_tag.to_ascii_lowercase();
        let needle = format!("{}=", name.to_ascii_lowercase());
        let mut pos = 0;
        while let Some(off) = lower[pos..].find(&needle) {
            let at = pos + off;
            let value_start = at + needle.len();
            if at > 0 && lower.as_bytes()[at - 1].is_ascii_whitespace() {
                return Some(decode_entities(read_value(&self.open_tag[value_start..])));
            }
            pos = value_start;
        }
        None
    }

    /// Visible text of the element.
    pub fn text(&self) -> String {
        text(self.inner)
    }
}

struct Span {
    open_start: usize,
    inner_start: usize,
    inner_end: usize,
    close_end: usize,
}

fn is_boundary(byte: Option<&u8>) -> bool {
    matches!(byte, None | Some(b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/'))
}

/// Position of the next `prefix` (`"<tr"`, `"</tr"`) that is a whole tag name.
fn find_tag(lower: &str, from: usize, prefix: &str) -> Option<usize> {
    let mut pos = from;
    while let Some(off) = lower.get(pos..)?.find(prefix) {
        let at = pos + off;
        if is_boundary(lower.as_bytes().get(at + prefix.len())) {
            return Some(at);
        }
        pos = at + prefix.len();
    }
    None
}

fn element_span(lower: &str, open_start: usize, tag: &str) -> Option<Span> {
    let open_prefix = format!("<{tag}");
    let close_prefix = format!("</{tag}");
    let inner_start = open_start + lower[open_start..].find('>')? + 1;

    let mut depth = 1usize;
    let mut pos = inner_start;
    loop {
        let next_open = find_tag(lower, pos, &open_prefix);
        let next_close = find_tag(lower, pos, &close_prefix);
        match (next_open, next_close) {
            (Some(open), Some(close)) if open < close => {
                depth += 1;
                pos = open + open_prefix.len();
            }
            (_, Some(close)) => {
                depth -= 1;
                if depth == 0 {
                    let close_end = lower[close..]
                        .find('>')
                        .map_or(lower.len(), |i| close + i + 1);
                    return Some(Span {
                        open_start,
                        inner_start,
                        inner_end: close,
                        close_end,
                    });
                }
                pos = close + close_prefix.len();
            }
            (_, None) => {
                return Some(Span {
                    open_start,
                    inner_start,
                    inner_end: lower.len(),
                    close_end: lower.len(),
                });
            }
        }
    }
}

fn to_element<'a>(html: &'a str, span: &Span) -> Element<'a> {
    Element {
        open_tag: &html[span.open_start..span.inner_start],
        inner: &html[span.inner_start..span.inner_end],
    }
}

/// Every outermost `tag` element in `html`, in document order.
pub fn elements<'a>(html: &'a str, tag: &str) -> Vec<Element<'a>> {
    let lower = html.to_ascii_lowercase();
    let tag = tag.to_ascii_lowercase();
    let open_prefix = format!("<{tag}");

    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(start) = find_tag(&lower, pos, &open_prefix) {
        let Some(span) = element_span(&lower, start, &tag) else {
            break;
        };
        out.push(to_element(html, &span));
        pos = span.close_end;
    }
    out
}

/// First `tag` element in `html`.
pub fn first_element<'a>(html: &'a str, tag: &str) -> Option<Element<'a>> {
    let lower = html.to_ascii_lowercase();
    let tag = tag.to_ascii_lowercase();
    let start = find_tag(&lower, 0, &format!("<{tag}"))?;
    element_span(&lower, start, &tag).map(|span| to_element(html, &span))
}

/// The element carrying `id`, whatever its tag.
pub fn element_by_id<'a>(html: &'a str, id: &str) -> Option<Element<'a>> {
    let lower = html.to_ascii_lowercase();
    let id = id.to_ascii_lowercase();

    for needle in [format!("id=\"{id}\""), format!("id='{id}'"), format!("id={id}")] {
        let quoted = needle.ends_with(['"', '\'']);
        let mut pos = 0;
        while let Some(off) = lower[pos..].find(&needle) {
            let at = pos + off;
            pos = at + needle.len();
            if at == 0 || !lower.as_bytes()[at - 1].is_ascii_whitespace() {
                continue;
            }
            if !quoted && !is_boundary(lower.as_bytes().get(pos)) {
                continue;
            }
            let Some(open_start) = lower[..at].rfind('<') else {
                continue;
            };
            let tag: String = lower[open_start + 1..]
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect();
            if tag.is_empty() {
                continue;
            }
            if let Some(span) = element_span(&lower, open_start, &tag) {
                return Some(to_element(html, &span));
            }
        }
    }
    None
}

fn read_value(rest: &str) -> &str {
    match rest.as_bytes().first() {
        Some(&quote @ (b'"' | b'\'')) => {
            let body = &rest[1..];
            let end = body.find(quote as char).unwrap_or(body.len());
            &body[..end]
        }
        _ => {
            let end = rest
                .find(|c: char| c.is_ascii_whitespace() || c == '>')
                .unwrap_or(rest.len());
            &rest[..end]
        }
    }
}

/// Strips tags, decodes entities and collapses whitespace.
pub fn text(fragment: &str) -> String {
    let mut raw = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => raw.push(c),
            _ => {}
        }
    }
    decode_entities(&raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes the named entities seen in practice plus numeric references.
/// Anything unrecognised is left as written.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail[1..]
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..1 + semi]).map(|c| (c, semi + 2)));
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_rows_case_insensitively() {
        let html = "<TABLE><TR><td>a</td></TR><tr class='x'><td>b</td></tr></TABLE>";
        let rows = elements(html, "tr");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].text(), "b");
        assert_eq!(rows[1].attr("class").as_deref(), Some("x"));
    }

    #[test]
    fn tag_prefix_is_not_a_match() {
        let html = "<track src=x><tr><td>ok</td></tr>";
        let rows = elements(html, "tr");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text(), "ok");
    }

    #[test]
    fn balances_nested_elements() {
        let html = r#"<div id="outer"><div>inner</div>tail</div><div>next</div>"#;
        let outer = element_by_id(html, "outer").unwrap();
        assert_eq!(outer.inner, "<div>inner</div>tail");
        assert_eq!(outer.text(), "innertail");
    }

    #[test]
    fn id_forms() {
        assert!(element_by_id("<table id='t1'></table>", "t1").is_some());
        assert!(element_by_id("<table id=t1 class=x></table>", "t1").is_some());
        assert!(element_by_id("<table data-id=\"t1\"></table>", "t1").is_none());
        assert!(element_by_id("<table id=t10></table>", "t1").is_none());
    }

    #[test]
    fn unterminated_element_runs_to_end() {
        let td = first_element("<td>Oct-17-25 04:05PM", "td").unwrap();
        assert_eq!(td.text(), "Oct-17-25 04:05PM");
    }

    #[test]
    fn decodes_entities_and_whitespace() {
        assert_eq!(
            text("  AT&amp;T&nbsp;&nbsp;beats \n <b>Q3</b> &#8217;&#x41;"),
            "AT&T beats Q3 \u{2019}A"
        );
        assert_eq!(decode_entities("fish & chips &bogus;"), "fish & chips &bogus;");
    }

    #[test]
    fn href_attribute() {
        let html = r#"<a class="tab-link-news" href="https://x.test/a?b=1&amp;c=2">t</a>"#;
        let a = first_element(html, "a").unwrap();
        assert_eq!(a.attr("href").as_deref(), Some("https://x.test/a?b=1&c=2"));
        assert_eq!(a.attr("target"), None);
    }
}
