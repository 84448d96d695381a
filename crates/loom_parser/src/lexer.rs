//! Single-file markup tokenizer.
//!
//! A [`Lexer`] walks one file and yields [`TextBlock`]s. It knows nothing
//! about includes or tag nesting; the [`Scanner`](crate::Scanner) layers
//! those on top.

use crate::error::ParseError;
use crate::parser_stack::FrameName;
use loom_source::{BlockKind, Location, SourceFile, TextBlock};

/// Message used for tags whose attribute list cannot be read.
const NOT_WELL_FORMED: &str = "the server tag is not well formed";

/// Cursor over one file's text. Also serves as the parse frame pushed on the
/// [`ParserStack`](crate::ParserStack).
pub struct Lexer<'a> {
    file: &'a SourceFile,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `file`.
    pub fn new(file: &'a SourceFile) -> Self {
        Self { file, pos: 0 }
    }

    /// The file being tokenized.
    pub fn file(&self) -> &'a SourceFile {
        self.file
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Reads the next block, or `None` at end of file.
    pub fn next_block(&mut self) -> Result<Option<TextBlock>, ParseError> {
        let file: &'a SourceFile = self.file;
        let src = file.content.as_str();
        let start = self.pos;
        if start >= src.len() {
            return Ok(None);
        }
        let rest = &src[start..];

        let block = if rest.starts_with("<%--") {
            let (inner, end) = self.delimited(start, 4, "--%>")?;
            self.block(BlockKind::ServerComment, inner, start, end)
        } else if rest.starts_with("<%@") {
            let (inner, end) = self.delimited(start, 3, "%>")?;
            let (name, attributes) = self.directive(inner, start, end)?;
            self.block(BlockKind::Directive, name, start, end)
                .with_attributes(attributes)
        } else if rest.starts_with("<%#") {
            let (inner, end) = self.delimited(start, 3, "%>")?;
            self.block(BlockKind::DataBinding, inner.trim(), start, end)
        } else if rest.starts_with("<%=") {
            let (inner, end) = self.delimited(start, 3, "%>")?;
            self.block(BlockKind::CodeRenderExpression, inner.trim(), start, end)
        } else if rest.starts_with("<%") {
            let (inner, end) = self.delimited(start, 2, "%>")?;
            self.block(BlockKind::CodeRender, inner, start, end)
        } else if rest.starts_with("<!--") {
            let (inner, end) = self.delimited(start, 4, "-->")?;
            self.comment(inner, start, end)?
        } else if rest.starts_with("</") {
            self.close_tag(start)?
        } else if rest.starts_with('<') && rest.len() > 1 && rest.as_bytes()[1].is_ascii_alphabetic() {
            self.open_tag(start)?
        } else {
            let first = rest.chars().next().map_or(1, char::len_utf8);
            let end = rest[first..].find('<').map_or(src.len(), |i| start + first + i);
            self.pos = end;
            self.block(BlockKind::Text, &src[start..end], start, end)
        };
        Ok(Some(block))
    }

    fn location(&self, start: usize, end: usize) -> Location {
        self.file.location(start as u32, end as u32)
    }

    fn block(&self, kind: BlockKind, content: &str, start: usize, end: usize) -> TextBlock {
        TextBlock::new(kind, content, self.location(start, end))
    }

    /// Reads up to `close`, returning the inner text and the offset just past `close`.
    fn delimited(
        &mut self,
        start: usize,
        open_len: usize,
        close: &str,
    ) -> Result<(&'a str, usize), ParseError> {
        let file: &'a SourceFile = self.file;
        let src = file.content.as_str();
        let body = start + open_len;
        let Some(rel) = src[body..].find(close) else {
            return Err(ParseError::UnexpectedEof {
                location: self.location(start, body),
                expected: close.to_string(),
            });
        };
        let end = body + rel + close.len();
        self.pos = end;
        Ok((&src[body..body + rel], end))
    }

    fn directive(
        &self,
        inner: &'a str,
        start: usize,
        end: usize,
    ) -> Result<(&'a str, Vec<(String, String)>), ParseError> {
        let trimmed = inner.trim_start();
        let word_len = trimmed
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(trimmed.len());
        let (name, attrs) = if trimmed[word_len..].trim_start().starts_with('=') {
            ("", trimmed)
        } else {
            (&trimmed[..word_len], &trimmed[word_len..])
        };
        let scan = read_attributes(attrs, 0, false).map_err(|_| ParseError::Structural {
            location: self.location(start, end),
            message: format!("malformed directive '{name}'"),
        })?;
        Ok((name, scan.attributes))
    }

    fn comment(&self, inner: &str, start: usize, end: usize) -> Result<TextBlock, ParseError> {
        let trimmed = inner.trim();
        let is_include = trimmed
            .get(..8)
            .is_some_and(|head| head.eq_ignore_ascii_case("#include"));
        if !is_include {
            return Ok(self.block(BlockKind::HtmlComment, inner, start, end));
        }
        let scan = read_attributes(&trimmed[8..], 0, false).map_err(|_| ParseError::Structural {
            location: self.location(start, end),
            message: "malformed include directive".to_string(),
        })?;
        Ok(self
            .block(BlockKind::Include, trimmed, start, end)
            .with_attributes(scan.attributes))
    }

    fn close_tag(&mut self, start: usize) -> Result<TextBlock, ParseError> {
        let file: &'a SourceFile = self.file;
        let src = file.content.as_str();
        let Some(rel) = src[start + 2..].find('>') else {
            return Err(ParseError::UnexpectedEof {
                location: self.location(start, start + 2),
                expected: ">".to_string(),
            });
        };
        let end = start + 2 + rel + 1;
        let name = src[start + 2..end - 1].trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(ParseError::Structural {
                location: self.location(start, end),
                message: format!("expecting '>' after tag name, got '{name}'"),
            });
        }
        self.pos = end;
        Ok(self.block(BlockKind::CloseTag, name, start, end))
    }

    fn open_tag(&mut self, start: usize) -> Result<TextBlock, ParseError> {
        let file: &'a SourceFile = self.file;
        let src = file.content.as_str();
        let name_start = start + 1;
        let name_len = src[name_start..]
            .find(|c: char| !is_name_char(c))
            .unwrap_or(src.len() - name_start);
        let name = &src[name_start..name_start + name_len];
        let scan = read_attributes(src, name_start + name_len, true).map_err(|e| match e {
            AttrError::Eof => ParseError::UnexpectedEof {
                location: self.location(start, name_start + name_len),
                expected: ">".to_string(),
            },
            AttrError::Malformed(at) => ParseError::Structural {
                location: self.location(start, at.max(start + 1)),
                message: NOT_WELL_FORMED.to_string(),
            },
        })?;
        self.pos = scan.end;
        let kind = if scan.self_closing {
            BlockKind::SelfClosingTag
        } else {
            BlockKind::Tag
        };
        Ok(self
            .block(kind, name, start, scan.end)
            .with_attributes(scan.attributes))
    }
}

impl FrameName for Lexer<'_> {
    fn filename(&self) -> &str {
        &self.file.name
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ':' | '_' | '-' | '.')
}

#[derive(Debug, PartialEq, Eq)]
enum AttrError {
    Eof,
    Malformed(usize),
}

struct AttrScan {
    attributes: Vec<(String, String)>,
    end: usize,
    self_closing: bool,
}

/// Reads `name="value"` pairs from `s` starting at byte `i`.
///
/// With `terminated` set the list must end at `>` or `/>`; otherwise it ends
/// at the end of `s`.
fn read_attributes(s: &str, mut i: usize, terminated: bool) -> Result<AttrScan, AttrError> {
    let mut attributes = Vec::new();
    loop {
        i = skip_ws(s, i);
        let Some(c) = s[i..].chars().next() else {
            if terminated {
                return Err(AttrError::Eof);
            }
            return Ok(AttrScan {
                attributes,
                end: i,
                self_closing: false,
            });
        };
        if terminated && c == '>' {
            return Ok(AttrScan {
                attributes,
                end: i + 1,
                self_closing: false,
            });
        }
        if terminated && s[i..].starts_with("/>") {
            return Ok(AttrScan {
                attributes,
                end: i + 2,
                self_closing: true,
            });
        }

        let name_len = s[i..]
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/' | '"' | '\''))
            .unwrap_or(s.len() - i);
        if name_len == 0 {
            return Err(AttrError::Malformed(i));
        }
        let name = s[i..i + name_len].to_string();
        i = skip_ws(s, i + name_len);

        if !s[i..].starts_with('=') {
            attributes.push((name, String::new()));
            continue;
        }
        i = skip_ws(s, i + 1);
        let value = match s[i..].chars().next() {
            Some(q @ ('"' | '\'')) => {
                let Some(rel) = s[i + 1..].find(q) else {
                    return Err(if terminated {
                        AttrError::Eof
                    } else {
                        AttrError::Malformed(i)
                    });
                };
                let value = &s[i + 1..i + 1 + rel];
                i += rel + 2;
                value
            }
            Some(_) => {
                let len = s[i..]
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(s.len() - i);
                let value = &s[i..i + len];
                i += len;
                value
            }
            None if terminated => return Err(AttrError::Eof),
            None => return Err(AttrError::Malformed(i)),
        };
        attributes.push((name, value.to_string()));
    }
}

fn skip_ws(s: &str, i: usize) -> usize {
    s[i..]
        .find(|c: char| !c.is_whitespace())
        .map_or(s.len(), |rel| i + rel)
}
