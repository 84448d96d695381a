//! Typed lexical fragments produced by the markup scanner.

use crate::location::Location;
use serde::{Deserialize, Serialize};

/// The kind of a scanned fragment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BlockKind {
    /// Literal text between tags.
    Text,
    /// An opening tag, `<asp:Label ...>`.
    Tag,
    /// A self-closing tag, `<asp:Label ... />`.
    SelfClosingTag,
    /// A closing tag, `</asp:Label>`.
    CloseTag,
    /// A directive, `<%@ Page ... %>`.
    Directive,
    /// A code block, `<% ... %>`.
    CodeRender,
    /// An output expression, `<%= ... %>`.
    CodeRenderExpression,
    /// A data-binding expression, `<%# ... %>`.
    DataBinding,
    /// A server-side comment, `<%-- ... --%>`.
    ServerComment,
    /// A client-side comment, `<!-- ... -->`.
    HtmlComment,
    /// An include directive, `<!-- #include file="..." -->`.
    Include,
}

/// A fragment of artifact text with its kind and location.
///
/// For tags and directives `content` holds the tag or directive name and
/// `attributes` the parsed `name="value"` pairs in source order. For every
/// other kind `content` is the raw inner text and `attributes` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// What kind of fragment this is.
    pub kind: BlockKind,
    /// Name or inner text, depending on `kind`.
    pub content: String,
    /// Attributes of tags and directives.
    pub attributes: Vec<(String, String)>,
    /// Where the fragment was found.
    pub location: Location,
}

impl TextBlock {
    /// Creates a block without attributes.
    pub fn new(kind: BlockKind, content: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            content: content.into(),
            attributes: Vec::new(),
            location,
        }
    }

    /// Sets the attribute list of this block.
    pub fn with_attributes(mut self, attributes: Vec<(String, String)>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Looks up an attribute by name, ignoring ASCII case.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` for tags carrying `runat="server"`.
    pub fn is_server_tag(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::Tag | BlockKind::SelfClosingTag | BlockKind::CloseTag
        ) && self
            .attribute("runat")
            .is_some_and(|v| v.eq_ignore_ascii_case("server"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(attrs: &[(&str, &str)]) -> TextBlock {
        TextBlock::new(BlockKind::Tag, "asp:Label", Location::start_of("a.aspx")).with_attributes(
            attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn attribute_lookup_is_case_insensitive() {
        let block = tag(&[("ID", "title")]);
        assert_eq!(block.attribute("id"), Some("title"));
        assert_eq!(block.attribute("text"), None);
    }

    #[test]
    fn server_tag_detection() {
        assert!(tag(&[("runat", "Server")]).is_server_tag());
        assert!(!tag(&[("id", "x")]).is_server_tag());
        let text = TextBlock::new(BlockKind::Text, "runat", Location::start_of("a.aspx"));
        assert!(!text.is_server_tag());
    }
}
