//! Tokenizer and block parser for the CSS accepted by the transform.
//!
//! Works on bytes: every delimiter is ASCII, so slicing at delimiter
//! positions always lands on a char boundary.

/// A parsed CSS node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Node {
    /// `prop:value`
    Decl { prop: String, value: String },
    /// `prelude { children }`, a style rule or a block at-rule.
    Block { prelude: String, children: Vec<Node> },
    /// An at-rule without a block, e.g. `@import url(a.css)`.
    Statement(String),
}

/// Remove `/* */` comments and `//` line comments.
///
/// Quoted strings and parenthesized text (`url(http://...)`) are copied
/// verbatim.
pub(crate) fn strip_comments(src: &str) -> Result<String, String> {
    let bytes = src.as_bytes();
    let mut out = String::with_capacity(src.len());
    let mut copied = 0;
    let mut pos = 0;
    let mut parens = 0usize;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' | b'\'' => pos = skip_string(bytes, pos)?,
            b'(' => {
                parens += 1;
                pos += 1;
            }
            b')' => {
                parens = parens.saturating_sub(1);
                pos += 1;
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                out.push_str(&src[copied..pos]);
                let end = src[pos + 2..]
                    .find("*/")
                    .ok_or_else(|| "unterminated comment".to_string())?;
                pos += 2 + end + 2;
                copied = pos;
            }
            b'/' if parens == 0 && bytes.get(pos + 1) == Some(&b'/') => {
                out.push_str(&src[copied..pos]);
                pos = src[pos..].find('\n').map_or(bytes.len(), |nl| pos + nl);
                copied = pos;
            }
            _ => pos += 1,
        }
    }

    out.push_str(&src[copied..]);
    Ok(out)
}

/// Index just past the string starting at `start`.
fn skip_string(bytes: &[u8], start: usize) -> Result<usize, String> {
    let quote = bytes[start];
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b if b == quote => return Ok(pos + 1),
            _ => pos += 1,
        }
    }
    Err("unterminated string".to_string())
}

/// Parse comment-free CSS into a node tree.
pub(crate) fn parse(src: &str) -> Result<Vec<Node>, String> {
    let mut parser = Parser { src, pos: 0 };
    parser.block(false)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn block(&mut self, nested: bool) -> Result<Vec<Node>, String> {
        let bytes = self.src.as_bytes();
        let mut nodes = Vec::new();
        let mut start = self.pos;
        let mut parens = 0usize;

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'"' | b'\'' => self.pos = skip_string(bytes, self.pos)?,
                b'(' => {
                    parens += 1;
                    self.pos += 1;
                }
                b')' => {
                    parens = parens.saturating_sub(1);
                    self.pos += 1;
                }
                b';' if parens == 0 => {
                    push_statement(&mut nodes, &self.src[start..self.pos]);
                    self.pos += 1;
                    start = self.pos;
                }
                b'{' if parens == 0 => {
                    let prelude = collapse_whitespace(&self.src[start..self.pos]);
                    self.pos += 1;
                    let children = self.block(true)?;
                    nodes.push(Node::Block { prelude, children });
                    start = self.pos;
                }
                b'}' if parens == 0 => {
                    if !nested {
                        return Err("unexpected '}'".to_string());
                    }
                    push_statement(&mut nodes, &self.src[start..self.pos]);
                    self.pos += 1;
                    return Ok(nodes);
                }
                _ => self.pos += 1,
            }
        }

        if nested {
            return Err("unclosed block".to_string());
        }
        push_statement(&mut nodes, &self.src[start..]);
        Ok(nodes)
    }
}

/// Classify the text between delimiters. Declarations without a colon or
/// with an empty value are dropped.
fn push_statement(nodes: &mut Vec<Node>, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if text.starts_with('@') {
        nodes.push(Node::Statement(collapse_whitespace(text)));
        return;
    }
    let Some((prop, value)) = text.split_once(':') else {
        return;
    };
    let prop = prop.trim();
    let value = collapse_whitespace(value);
    if prop.is_empty() || value.is_empty() {
        return;
    }
    nodes.push(Node::Decl {
        prop: prop.to_string(),
        value,
    });
}

/// Trim and squeeze whitespace runs to one space, outside quotes.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut pending_space = false;

    for c in text.trim().chars() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        out.push(c);
    }
    out
}

/// Split on commas outside parentheses, brackets and quotes.
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
