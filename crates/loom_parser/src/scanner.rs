//! Include-expanding scanner over a whole artifact.

use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::parser_stack::ParserStack;
use crate::tag_stack::TagStack;
use loom_common::{ContentHash, Fingerprinter};
use loom_source::{BlockKind, Location, SourceDb, SourceFile, TextBlock};
use tracing::{debug, trace};

/// Looks up the text of artifacts and the files they include.
pub trait SourceLoader {
    /// Returns the file registered under `name`.
    fn load(&self, name: &str) -> Option<&SourceFile>;
}

impl SourceLoader for SourceDb {
    fn load(&self, name: &str) -> Option<&SourceFile> {
        self.find(name)
    }
}

/// Everything the scanner learned about one artifact.
#[derive(Debug)]
pub struct ScanOutput {
    /// Blocks of the artifact with includes expanded in place. Include
    /// directives themselves are not emitted.
    pub blocks: Vec<TextBlock>,
    /// Resolved names of every included file, in first-seen order.
    pub dependencies: Vec<String>,
    /// Fingerprint over the names and contents of the artifact and its includes.
    pub fingerprint: ContentHash,
}

/// Scans artifacts, expanding `<!-- #include -->` directives through a
/// [`SourceLoader`].
pub struct Scanner<'a, L: ?Sized> {
    loader: &'a L,
}

impl<'a, L: SourceLoader + ?Sized> Scanner<'a, L> {
    /// Creates a scanner reading through `loader`.
    pub fn new(loader: &'a L) -> Self {
        Self { loader }
    }

    /// Scans `filename` and every file it includes.
    ///
    /// Fails on the first include that is already being parsed, on a server
    /// tag closed out of order, on a prefixed close tag (`</asp:Label>`) with
    /// no opening tag, and on server tags left open at the end.
    pub fn scan(&self, filename: &str) -> Result<ScanOutput, ParseError> {
        let root = self
            .loader
            .load(filename)
            .ok_or_else(|| ParseError::IncludeNotFound {
                location: Location::start_of(filename),
                filename: filename.to_string(),
            })?;

        let mut frames = ParserStack::new();
        let mut tags = TagStack::new();
        let mut open_at: Vec<Location> = Vec::new();
        // Prefixed tags opened without runat="server", lowercased.
        let mut literal_prefixed: Vec<String> = Vec::new();
        let mut fingerprint = Fingerprinter::new();
        let mut blocks = Vec::new();
        let mut dependencies: Vec<String> = Vec::new();

        fingerprint.update(root.name.as_bytes());
        fingerprint.update(root.content.as_bytes());
        frames.push(Lexer::new(root));

        loop {
            let Some(lexer) = frames.current_mut() else {
                break;
            };
            let includer = lexer.file();
            let Some(block) = lexer.next_block()? else {
                frames.pop();
                trace!(file = %includer.name, depth = frames.len(), "finished file");
                continue;
            };

            match block.kind {
                BlockKind::Include => {
                    let name = include_target(&includer.name, &block)?;
                    let file = self.loader.load(&name).ok_or_else(|| {
                        ParseError::IncludeNotFound {
                            location: block.location.clone(),
                            filename: name.clone(),
                        }
                    })?;
                    if !frames.push(Lexer::new(file)) {
                        debug!(
                            file = %name,
                            chain = ?frames.chain().collect::<Vec<_>>(),
                            "include cycle rejected"
                        );
                        return Err(ParseError::Cycle {
                            location: block.location,
                            filename: name,
                        });
                    }
                    trace!(file = %name, depth = frames.len(), "entered include");
                    fingerprint.update(file.name.as_bytes());
                    fingerprint.update(file.content.as_bytes());
                    if !dependencies.contains(&name) {
                        dependencies.push(name);
                    }
                }
                BlockKind::Tag if block.is_server_tag() => {
                    tags.push(block.content.clone());
                    open_at.push(block.location.clone());
                    blocks.push(block);
                }
                BlockKind::Tag if block.content.contains(':') => {
                    literal_prefixed.push(block.content.to_ascii_lowercase());
                    blocks.push(block);
                }
                BlockKind::CloseTag => {
                    if tags.compare_to(&block.content) {
                        tags.pop();
                        open_at.pop();
                    } else if tags.contains(&block.content) {
                        return Err(ParseError::Structural {
                            location: block.location,
                            message: format!("expecting </{}>", tags.current().unwrap_or_default()),
                        });
                    } else if block.content.contains(':') {
                        let name = block.content.to_ascii_lowercase();
                        match literal_prefixed.iter().rposition(|open| *open == name) {
                            Some(index) => {
                                literal_prefixed.remove(index);
                            }
                            None => {
                                return Err(ParseError::Structural {
                                    location: block.location,
                                    message: format!("unexpected </{}>", block.content),
                                })
                            }
                        }
                    }
                    blocks.push(block);
                }
                _ => blocks.push(block),
            }
        }

        if let (Some(tag), Some(location)) = (tags.current(), open_at.pop()) {
            return Err(ParseError::Structural {
                location,
                message: format!("expecting </{tag}>"),
            });
        }

        Ok(ScanOutput {
            blocks,
            dependencies,
            fingerprint: fingerprint.finish(),
        })
    }
}

/// Resolves the file named by an include block.
///
/// `file="..."` is relative to the including file's directory; `virtual="..."`
/// is relative to the application root.
fn include_target(includer: &str, block: &TextBlock) -> Result<String, ParseError> {
    let (target, is_virtual) = match (block.attribute("file"), block.attribute("virtual")) {
        (Some(file), _) => (file, false),
        (None, Some(virt)) => (virt, true),
        (None, None) => {
            return Err(ParseError::Structural {
                location: block.location.clone(),
                message: "include directive needs a 'file' or 'virtual' attribute".to_string(),
            })
        }
    };
    if target.trim().is_empty() {
        return Err(ParseError::Structural {
            location: block.location.clone(),
            message: "empty include file name".to_string(),
        });
    }
    Ok(resolve_include(includer, target, is_virtual))
}

fn resolve_include(includer: &str, target: &str, is_virtual: bool) -> String {
    let target = target.trim().replace('\\', "/");
    let joined = if is_virtual {
        target.trim_start_matches(['~', '/']).to_string()
    } else {
        let includer = includer.replace('\\', "/");
        match includer.rfind('/') {
            Some(idx) => format!("{}/{}", &includer[..idx], target),
            None => target,
        }
    };
    normalize(&joined)
}

fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." if parts.last().is_some_and(|p| *p != "..") => {
                parts.pop();
            }
            _ => parts.push(segment),
        }
    }
    let joined = parts.join("/");
    if path.starts_with('/') {
        format!("/{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(files: &[(&str, &str)]) -> SourceDb {
        let mut db = SourceDb::new();
        for (name, content) in files {
            db.add_source(*name, content.to_string());
        }
        db
    }

    #[test]
    fn expands_includes_in_place() {
        let db = db(&[
            ("site/a.aspx", "<p>before</p><!-- #include file=\"inc/h.inc\" --><p>after</p>"),
            ("site/inc/h.inc", "<b>header</b>"),
        ]);
        let out = Scanner::new(&db).scan("site/a.aspx").unwrap();
        let texts: Vec<_> = out
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Text)
            .map(|b| b.content.as_str())
            .collect();
        assert_eq!(texts, vec!["before", "header", "after"]);
        assert_eq!(out.dependencies, vec!["site/inc/h.inc"]);
        let header = out.blocks.iter().find(|b| b.content == "header").unwrap();
        assert_eq!(header.location.filename, "site/inc/h.inc");
    }

    #[test]
    fn self_include_is_a_cycle() {
        let db = db(&[("a.aspx", "<!-- #include file=\"a.aspx\" -->")]);
        let err = Scanner::new(&db).scan("a.aspx").unwrap_err();
        assert!(matches!(err, ParseError::Cycle { ref filename, .. } if filename == "a.aspx"));
    }

    #[test]
    fn mutual_include_is_a_cycle() {
        let db = db(&[
            ("a.aspx", "<!-- #include file=\"b.inc\" -->"),
            ("b.inc", "text\n<!-- #include file=\"./a.aspx\" -->"),
        ]);
        let err = Scanner::new(&db).scan("a.aspx").unwrap_err();
        assert!(err.is_cycle());
        assert_eq!(err.location().filename, "b.inc");
        assert_eq!(err.location().begin_line, 2);
    }

    #[test]
    fn same_include_twice_in_sequence_is_fine() {
        let db = db(&[
            ("a.aspx", "<!-- #include file=\"x.inc\" --><!-- #include file=\"x.inc\" -->"),
            ("x.inc", "x"),
        ]);
        let out = Scanner::new(&db).scan("a.aspx").unwrap();
        assert_eq!(out.blocks.len(), 2);
        assert_eq!(out.dependencies, vec!["x.inc"]);
    }

    #[test]
    fn virtual_include_is_app_relative() {
        let db = db(&[
            ("pages/a.aspx", "<!-- #include virtual=\"~/shared/f.inc\" -->"),
            ("shared/f.inc", "footer"),
        ]);
        let out = Scanner::new(&db).scan("pages/a.aspx").unwrap();
        assert_eq!(out.dependencies, vec!["shared/f.inc"]);
    }

    #[test]
    fn missing_include() {
        let db = db(&[("a.aspx", "<!-- #include file=\"gone.inc\" -->")]);
        let err = Scanner::new(&db).scan("a.aspx").unwrap_err();
        assert!(matches!(err, ParseError::IncludeNotFound { ref filename, .. } if filename == "gone.inc"));
    }

    #[test]
    fn include_without_target() {
        let db = db(&[("a.aspx", "<!-- #include -->")]);
        let err = Scanner::new(&db).scan("a.aspx").unwrap_err();
        assert!(matches!(err, ParseError::Structural { .. }));
    }

    #[test]
    fn missing_root() {
        let db = SourceDb::new();
        let err = Scanner::new(&db).scan("nope.aspx").unwrap_err();
        assert!(matches!(err, ParseError::IncludeNotFound { .. }));
    }

    #[test]
    fn server_tags_must_nest() {
        let db = db(&[(
            "a.aspx",
            "<asp:Panel runat=\"server\"><asp:Label runat=\"server\"></asp:Panel>",
        )]);
        let err = Scanner::new(&db).scan("a.aspx").unwrap_err();
        match err {
            ParseError::Structural { message, .. } => assert_eq!(message, "expecting </asp:Label>"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn server_tag_close_is_case_insensitive() {
        let db = db(&[(
            "a.aspx",
            "<ASP:Panel runat=\"server\"><div></div></asp:panel>",
        )]);
        assert!(Scanner::new(&db).scan("a.aspx").is_ok());
    }

    #[test]
    fn unclosed_server_tag_reports_its_opening() {
        let db = db(&[("a.aspx", "\n<asp:Panel runat=\"server\">text")]);
        let err = Scanner::new(&db).scan("a.aspx").unwrap_err();
        assert_eq!(err.location().begin_line, 2);
        assert!(err.to_string().contains("expecting </asp:Panel>"));
    }

    #[test]
    fn stray_prefixed_close_tag_is_structural() {
        let db = db(&[("a.aspx", "<p>text</p>\n</asp:Label>")]);
        let err = Scanner::new(&db).scan("a.aspx").unwrap_err();
        match err {
            ParseError::Structural { location, message } => {
                assert_eq!(message, "unexpected </asp:Label>");
                assert_eq!(location.begin_line, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn prefixed_tag_without_runat_may_close() {
        let db = db(&[("a.aspx", "<asp:Literal>x</ASP:Literal>")]);
        assert!(Scanner::new(&db).scan("a.aspx").is_ok());
    }

    #[test]
    fn plain_html_close_tags_are_not_checked() {
        let db = db(&[("a.aspx", "<p><b>x</p></b>")]);
        assert!(Scanner::new(&db).scan("a.aspx").is_ok());
    }

    #[test]
    fn fingerprint_covers_includes() {
        let a = db(&[("a.aspx", "<!-- #include file=\"x.inc\" -->"), ("x.inc", "one")]);
        let b = db(&[("a.aspx", "<!-- #include file=\"x.inc\" -->"), ("x.inc", "two")]);
        let fa = Scanner::new(&a).scan("a.aspx").unwrap().fingerprint;
        let fb = Scanner::new(&b).scan("a.aspx").unwrap().fingerprint;
        assert_ne!(fa, fb);
    }

    #[test]
    fn normalize_paths() {
        assert_eq!(normalize("a/./b/../c"), "a/c");
        assert_eq!(normalize("../x"), "../x");
        assert_eq!(resolve_include("dir\\page.aspx", "sub\\i.inc", false), "dir/sub/i.inc");
        assert_eq!(resolve_include("dir/page.aspx", "/root.inc", true), "root.inc");
    }
}
