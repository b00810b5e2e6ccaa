//! A lossless view of an appcast document.
//!
//! The document is split into raw text and parsed `<enclosure>` start tags.
//! Everything else (items, comments, CDATA release notes, processing
//! instructions) is carried as opaque text. Each enclosure keeps the exact
//! spelling of its attributes: leading whitespace, `=` spacing, quote style
//! and the undecoded value. Rendering an unmodified document therefore
//! reproduces the input byte for byte, and a mutated one differs only inside
//! the tags that changed.

/// Element name of a release entry.
pub const ENCLOSURE: &str = "enclosure";

/// A parsed feed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Enclosure(EnclosureTag),
}

/// One `<enclosure …/>` start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosureTag {
    name: String,
    attributes: Vec<Attribute>,
    trailing: String,
    close: String,
}

/// An attribute exactly as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Attribute {
    leading: String,
    name: String,
    separator: String,
    quote: char,
    raw_value: String,
}

impl FeedDocument {
    /// Split `source` into text and enclosure tags.
    ///
    /// Never fails: anything that does not parse as a well-formed enclosure
    /// tag is kept as text.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut nodes = Vec::new();
        let mut cursor = Cursor::new(source);
        let mut text_start = 0;

        while cursor.skip_to('<') {
            let here = cursor.pos;
            if cursor.skip_opaque() {
                continue;
            }

            let mut probe = cursor.clone();
            if let Some(tag) = parse_enclosure(&mut probe) {
                if text_start < here {
                    nodes.push(Node::Text(source[text_start..here].to_string()));
                }
                nodes.push(Node::Enclosure(tag));
                cursor = probe;
                text_start = cursor.pos;
            } else {
                cursor.advance(1);
            }
        }

        if text_start < source.len() {
            nodes.push(Node::Text(source[text_start..].to_string()));
        }
        Self { nodes }
    }

    /// Re-serialize the document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Enclosure(tag) => tag.render_into(&mut out),
            }
        }
        out
    }

    /// Iterate over the enclosure tags in document order.
    pub fn enclosures(&self) -> impl Iterator<Item = &EnclosureTag> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Enclosure(tag) => Some(tag),
            Node::Text(_) => None,
        })
    }

    /// Mutable access to the enclosure tags in document order.
    pub fn enclosures_mut(&mut self) -> impl Iterator<Item = &mut EnclosureTag> {
        self.nodes.iter_mut().filter_map(|node| match node {
            Node::Enclosure(tag) => Some(tag),
            Node::Text(_) => None,
        })
    }
}

impl EnclosureTag {
    /// Whether the tag carries an attribute called `name`.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// The XML-unescaped value of attribute `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| unescape(&a.raw_value))
    }

    /// Append an attribute after the last existing one, just before the
    /// closing delimiter.
    ///
    /// Follows the tag's layout: when attributes sit on their own lines the
    /// new one does too.
    pub fn push_attribute(&mut self, name: &str, value: &str) {
        let leading = self
            .attributes
            .last()
            .filter(|last| last.leading.contains('\n'))
            .map_or_else(|| " ".to_string(), |last| last.leading.clone());

        self.attributes.push(Attribute {
            leading,
            name: name.to_string(),
            separator: "=".to_string(),
            quote: '"',
            raw_value: escape(value),
        });
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for attr in &self.attributes {
            out.push_str(&attr.leading);
            out.push_str(&attr.name);
            out.push_str(&attr.separator);
            out.push(attr.quote);
            out.push_str(&attr.raw_value);
            out.push(attr.quote);
        }
        out.push_str(&self.trailing);
        out.push_str(&self.close);
    }
}

#[derive(Clone)]
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn advance(&mut self, bytes: usize) {
        self.pos = self.pos.saturating_add(bytes).min(self.src.len());
    }

    /// Move to the next occurrence of `c`; false (and at end) if none.
    fn skip_to(&mut self, c: char) -> bool {
        match self.rest().find(c) {
            Some(offset) => {
                self.advance(offset);
                true
            },
            None => {
                self.pos = self.src.len();
                false
            },
        }
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.advance(prefix.len());
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c| !pred(c)).unwrap_or(rest.len());
        self.advance(len);
        &rest[..len]
    }

    /// Skip a comment, CDATA section or processing instruction starting here.
    fn skip_opaque(&mut self) -> bool {
        const OPAQUE: [(&str, &str); 3] = [("<!--", "-->"), ("<![CDATA[", "]]>"), ("<?", "?>")];

        for (open, close) in OPAQUE {
            if self.eat(open) {
                match self.rest().find(close) {
                    Some(offset) => self.advance(offset.saturating_add(close.len())),
                    None => self.pos = self.src.len(),
                }
                return true;
            }
        }
        false
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')
}

fn parse_enclosure(cursor: &mut Cursor<'_>) -> Option<EnclosureTag> {
    if !cursor.eat("<") {
        return None;
    }
    let name = cursor.take_while(is_name_char);
    if name != ENCLOSURE {
        return None;
    }

    let mut attributes = Vec::new();
    loop {
        let whitespace = cursor.take_while(char::is_whitespace);
        for close in ["/>", ">"] {
            if cursor.eat(close) {
                return Some(EnclosureTag {
                    name: name.to_string(),
                    attributes,
                    trailing: whitespace.to_string(),
                    close: close.to_string(),
                });
            }
        }

        if whitespace.is_empty() {
            return None;
        }
        let attr_name = cursor.take_while(is_name_char);
        if attr_name.is_empty() {
            return None;
        }

        let separator_start = cursor.pos;
        cursor.take_while(char::is_whitespace);
        if !cursor.eat("=") {
            return None;
        }
        cursor.take_while(char::is_whitespace);
        let separator = &cursor.src[separator_start..cursor.pos];

        let quote = cursor.rest().chars().next().filter(|c| matches!(c, '"' | '\''))?;
        cursor.advance(quote.len_utf8());
        let raw_value = cursor.take_while(|c| c != quote && c != '<');
        if !cursor.eat(&quote.to_string()) {
            return None;
        }

        attributes.push(Attribute {
            leading: whitespace.to_string(),
            name: attr_name.to_string(),
            separator: separator.to_string(),
            quote,
            raw_value: raw_value.to_string(),
        });
    }
}

fn unescape(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        let decoded = after.find(';').and_then(|semi| {
            let entity = &after[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(str::parse::<u32>))
                    .and_then(Result::ok)
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, semi.saturating_add(1)))
        });

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &after[consumed..];
            },
            None => {
                out.push('&');
                rest = &after[1..];
            },
        }
    }
    out.push_str(rest);
    out
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:sparkle="http://www.andymatuschak.org/xml-namespaces/sparkle">
  <channel>
    <!-- <enclosure url="https://example.com/commented-out.zip" /> -->
    <item>
      <description><![CDATA[<enclosure url="x.zip"/> in notes]]></description>
      <enclosure url="https://example.com/App-1.0.zip" length="1024" type="application/octet-stream" />
      <enclosure
          url='https://example.com/App-1.0.dmg'
          length = "2048"/>
    </item>
  </channel>
</rss>
"#;

    #[test]
    fn test_render_is_lossless() {
        let doc = FeedDocument::parse(FEED);
        assert_eq!(doc.render(), FEED);
        assert_eq!(doc.enclosures().count(), 2);
    }

    #[test]
    fn test_comments_and_cdata_are_opaque() {
        let doc = FeedDocument::parse(FEED);
        let urls: Vec<_> = doc.enclosures().filter_map(|t| t.attribute("url")).collect();
        assert_eq!(
            urls,
            ["https://example.com/App-1.0.zip", "https://example.com/App-1.0.dmg"]
        );
    }

    #[test]
    fn test_push_attribute_inline() {
        let mut doc = FeedDocument::parse(r#"<enclosure url="a.zip" length="1" />"#);
        doc.enclosures_mut().next().unwrap().push_attribute("sparkle:edSignature", "c2ln");
        assert_eq!(
            doc.render(),
            r#"<enclosure url="a.zip" length="1" sparkle:edSignature="c2ln" />"#
        );
    }

    #[test]
    fn test_push_attribute_multiline() {
        let src = "<enclosure\n    url=\"a.zip\"\n    length=\"1\"/>";
        let mut doc = FeedDocument::parse(src);
        doc.enclosures_mut().next().unwrap().push_attribute("sparkle:edSignature", "c2ln");
        assert_eq!(
            doc.render(),
            "<enclosure\n    url=\"a.zip\"\n    length=\"1\"\n    sparkle:edSignature=\"c2ln\"/>"
        );
    }

    #[test]
    fn test_open_close_pair() {
        let src = r#"<enclosure url="a.zip"></enclosure>"#;
        let mut doc = FeedDocument::parse(src);
        doc.enclosures_mut().next().unwrap().push_attribute("k", "v");
        assert_eq!(doc.render(), r#"<enclosure url="a.zip" k="v"></enclosure>"#);
    }

    #[test]
    fn test_malformed_tags_stay_text() {
        for src in [
            r#"<enclosure url="a.zip"#,
            r#"<enclosure url=a.zip />"#,
            r#"<enclosureurl="a.zip" />"#,
            r#"<enclosure url="a.zip"length="1" />"#,
            "<enclosures url=\"a.zip\" />",
        ] {
            let doc = FeedDocument::parse(src);
            assert_eq!(doc.enclosures().count(), 0, "parsed: {src}");
            assert_eq!(doc.render(), src);
        }
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape("a&amp;b"), "a&b");
        assert_eq!(unescape("&lt;&gt;&quot;&apos;"), "<>\"'");
        assert_eq!(unescape("&#65;&#x42;"), "AB");
        assert_eq!(unescape("&bogus; & done"), "&bogus; & done");
    }

    #[test]
    fn test_attribute_value_is_unescaped() {
        let doc = FeedDocument::parse(r#"<enclosure url="https://x.test/a.zip?x=1&amp;y=2" />"#);
        assert_eq!(
            doc.enclosures().next().unwrap().attribute("url").unwrap(),
            "https://x.test/a.zip?x=1&y=2"
        );
    }

    #[test]
    fn test_escape_roundtrip() {
        let mut doc = FeedDocument::parse(r#"<enclosure url="a" />"#);
        let tag = doc.enclosures_mut().next().unwrap();
        tag.push_attribute("note", r#"a&b<"c""#);
        assert_eq!(tag.attribute("note").unwrap(), r#"a&b<"c""#);
    }

    #[test]
    fn test_non_ascii_text_is_preserved() {
        let src = "<title>Version 1.0 — «beta» ✨</title>\n<enclosure url=\"ü.zip\" />";
        let doc = FeedDocument::parse(src);
        assert_eq!(doc.render(), src);
        assert_eq!(doc.enclosures().count(), 1);
    }
}
