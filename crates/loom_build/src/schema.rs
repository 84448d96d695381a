//! XSD-like schema documents turned into typed classes.
//!
//! Each top-level `<xs:element name="..." type="..."/>` becomes a property
//! of a partial class named after the file. The document must be a
//! well-formed element tree rooted at a `schema` element.

use crate::error::BuildError;
use loom_common::{CodeCompileUnit, MemberKind, TypeDeclaration, TypeMember};
use loom_parser::Lexer;
use loom_source::{ArtifactIdentity, BlockKind, SourceFile};

/// A parsed schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    /// Top-level elements as (name, type) pairs, in document order.
    pub elements: Vec<(String, String)>,
}

/// Reads `file` as a schema document.
pub fn parse_schema(
    identity: &ArtifactIdentity,
    file: &SourceFile,
) -> Result<SchemaDocument, BuildError> {
    let malformed = |reason: String| BuildError::MalformedDocument {
        artifact: identity.clone(),
        reason,
    };

    let mut lexer = Lexer::new(file);
    let mut open: Vec<String> = Vec::new();
    let mut saw_root = false;
    let mut elements: Vec<(String, String)> = Vec::new();

    while let Some(block) = lexer.next_block().map_err(|e| malformed(e.to_string()))? {
        match block.kind {
            BlockKind::Tag | BlockKind::SelfClosingTag => {
                if open.is_empty() {
                    if saw_root {
                        return Err(malformed(format!(
                            "{}: more than one root element",
                            block.location
                        )));
                    }
                    if local_name(&block.content) != "schema" {
                        return Err(malformed(format!(
                            "{}: root element must be <schema>, found <{}>",
                            block.location, block.content
                        )));
                    }
                    saw_root = true;
                } else if open.len() == 1 && local_name(&block.content) == "element" {
                    if let Some(name) = block.attribute("name").filter(|n| !n.is_empty()) {
                        if !elements.iter().any(|(n, _)| n == name) {
                            let ty = block.attribute("type").map_or("object", clr_type);
                            elements.push((name.to_string(), ty.to_string()));
                        }
                    }
                }
                if block.kind == BlockKind::Tag {
                    open.push(block.content);
                }
            }
            BlockKind::CloseTag => match open.pop() {
                Some(top) if top == block.content => {}
                Some(top) => {
                    return Err(malformed(format!(
                        "{}: expecting </{top}>, found </{}>",
                        block.location, block.content
                    )))
                }
                None => {
                    return Err(malformed(format!(
                        "{}: unexpected </{}>",
                        block.location, block.content
                    )))
                }
            },
            BlockKind::Text if open.is_empty() && saw_root && !block.content.trim().is_empty() => {
                return Err(malformed(format!(
                    "{}: text after the root element",
                    block.location
                )));
            }
            _ => {}
        }
    }

    if let Some(top) = open.last() {
        return Err(malformed(format!("unclosed <{top}>")));
    }
    if !saw_root {
        return Err(malformed("no <schema> root element".to_string()));
    }
    Ok(SchemaDocument { elements })
}

impl SchemaDocument {
    /// Emits a partial class named `class` in the global namespace.
    pub fn generate(&self, class: &str) -> CodeCompileUnit {
        let mut ty = TypeDeclaration::new(class).partial();
        ty.members = self
            .elements
            .iter()
            .map(|(name, type_name)| TypeMember::new(name.clone(), MemberKind::Property, type_name.clone()))
            .collect();
        let mut unit = CodeCompileUnit::new();
        unit.namespace_mut("").types.push(ty);
        unit
    }
}

fn local_name(tag: &str) -> &str {
    tag.rsplit(':').next().unwrap_or(tag)
}

/// Maps built-in schema types to their runtime types; other types keep
/// their local name.
fn clr_type(xsd: &str) -> &str {
    match local_name(xsd) {
        "string" => "string",
        "int" => "int",
        "long" => "long",
        "short" => "short",
        "boolean" => "bool",
        "decimal" => "decimal",
        "double" => "double",
        "float" => "float",
        "dateTime" | "date" => "System.DateTime",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_source::FileId;

    fn parse(text: &str) -> Result<SchemaDocument, BuildError> {
        let file = SourceFile::new(FileId::from_raw(0), "Orders.xsd".to_string(), text.to_string());
        parse_schema(&ArtifactIdentity::durable("App_Code/Orders.xsd"), &file)
    }

    #[test]
    fn top_level_elements_become_members() {
        let doc = parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
<xs:schema id="Orders" xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Customer" type="xs:string"/>
  <xs:element name="Quantity" type="xs:int"/>
  <xs:element name="Placed" type="xs:dateTime"/>
  <xs:element name="Address" type="AddressType"/>
  <xs:complexType name="AddressType">
    <xs:sequence>
      <xs:element name="Street" type="xs:string"/>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#,
        )
        .unwrap();
        let names: Vec<_> = doc.elements.iter().map(|(n, t)| (n.as_str(), t.as_str())).collect();
        assert_eq!(
            names,
            vec![
                ("Customer", "string"),
                ("Quantity", "int"),
                ("Placed", "System.DateTime"),
                ("Address", "AddressType"),
            ]
        );
        let unit = doc.generate("Orders");
        assert_eq!(unit.type_names().collect::<Vec<_>>(), vec!["Orders"]);
        assert_eq!(unit.namespaces[0].types[0].members.len(), 4);
    }

    #[test]
    fn mismatched_close_is_malformed() {
        let err = parse("<xs:schema><xs:element name=\"a\"></xs:schema>").unwrap_err();
        match err {
            BuildError::MalformedDocument { artifact, reason } => {
                assert_eq!(artifact.path(), "App_Code/Orders.xsd");
                assert!(reason.contains("expecting </xs:element>"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unclosed_root_is_malformed() {
        assert!(matches!(
            parse("<xs:schema>"),
            Err(BuildError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn wrong_root_is_malformed() {
        let err = parse("<root></root>").unwrap_err();
        assert!(err.to_string().contains("root element must be <schema>"));
    }

    #[test]
    fn empty_document_is_malformed() {
        assert!(parse("").is_err());
    }

    #[test]
    fn lexer_errors_are_malformed() {
        assert!(matches!(
            parse("<xs:schema><xs:element name=\"x"),
            Err(BuildError::MalformedDocument { .. })
        ));
    }
}
