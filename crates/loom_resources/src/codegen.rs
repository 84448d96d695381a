//! Strongly typed accessor classes for resource files.
//!
//! `Strings.resx` becomes `Resources.Strings`; `Site.Errors.resx` becomes
//! `Resources_Site.Errors`. Each class carries the culture and resource
//! manager plumbing plus one string property per resource key.

use crate::error::ResourceError;
use loom_common::{
    is_valid_identifier, CodeCompileUnit, MemberKind, TypeDeclaration, TypeMember,
};
use loom_parser::Lexer;
use loom_source::{BlockKind, SourceFile};
use std::path::Path;

const RESOURCE_MANAGER: &str = "System.Resources.ResourceManager";
const CULTURE_INFO: &str = "System.Globalization.CultureInfo";

/// Generates a unit holding the accessor class for the resource file `head`.
pub fn generate_resource_unit(head: &str, keys: &[String]) -> Result<CodeCompileUnit, ResourceError> {
    let mut unit = CodeCompileUnit::new();
    append_resource_types(&mut unit, head, keys)?;
    Ok(unit)
}

/// Adds the accessor class for the resource file `head` to `unit`.
///
/// Fails with [`ResourceError::InvalidResourceName`] when the file name does
/// not produce valid namespace and class identifiers.
pub fn append_resource_types(
    unit: &mut CodeCompileUnit,
    head: &str,
    keys: &[String],
) -> Result<(), ResourceError> {
    let invalid = || ResourceError::InvalidResourceName {
        path: head.to_string(),
    };
    let stem = Path::new(head)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(invalid)?;

    let (namespace, class) = match stem.rsplit_once('.') {
        None => ("Resources".to_string(), stem.to_string()),
        Some((outer, last)) if outer.starts_with("Resources") => (outer.to_string(), last.to_string()),
        Some((outer, last)) => (format!("Resources.{outer}"), last.to_string()),
    };
    let namespace = namespace.replace('.', "_");
    let class = class.replace('.', "_");
    if !is_valid_identifier(&namespace) || !is_valid_identifier(&class) {
        return Err(invalid());
    }

    let mut ty = TypeDeclaration::new(class).sealed();
    ty.members.extend([
        TypeMember::new("_culture", MemberKind::Field, CULTURE_INFO),
        TypeMember::new("_resourceManager", MemberKind::Field, RESOURCE_MANAGER),
        TypeMember::new("ResourceManager", MemberKind::Property, RESOURCE_MANAGER),
        TypeMember::new("Culture", MemberKind::Property, CULTURE_INFO),
    ]);
    for key in keys {
        let name = sanitize_resource_name(key);
        if name.is_empty() || ty.member(&name).is_some() {
            continue;
        }
        ty.members.push(TypeMember::new(name, MemberKind::Property, "string"));
    }

    unit.namespace_mut(&namespace).types.push(ty);
    Ok(())
}

/// Turns a resource key into a property name: characters that may not
/// appear in an identifier become `_`, and a name starting with anything but
/// a letter or `_` gains a leading `_`.
pub fn sanitize_resource_name(key: &str) -> String {
    if key.is_empty() || is_valid_identifier(key) {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 1);
    let mut chars = key.chars();
    if let Some(first) = chars.next() {
        if first.is_alphabetic() || first == '_' {
            out.push(first);
        } else {
            out.push('_');
            if first.is_ascii_digit() {
                out.push(first);
            }
        }
    }
    for c in chars {
        out.push(if c.is_alphanumeric() || c == '_' { c } else { '_' });
    }
    out
}

/// Reads the entry names of a `.resx` document: the `name` attribute of
/// every `<data>` element, in document order.
pub fn read_resx_keys(file: &SourceFile) -> Result<Vec<String>, ResourceError> {
    let mut lexer = Lexer::new(file);
    let mut keys = Vec::new();
    loop {
        let block = lexer.next_block().map_err(|source| ResourceError::Malformed {
            path: file.name.clone(),
            source,
        })?;
        let Some(block) = block else {
            break;
        };
        let is_data = matches!(block.kind, BlockKind::Tag | BlockKind::SelfClosingTag)
            && block.content.eq_ignore_ascii_case("data");
        if let Some(name) = block.attribute("name").filter(|_| is_data) {
            keys.push(name.to_string());
        }
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_source::FileId;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_name_goes_to_resources_namespace() {
        let unit = generate_resource_unit("App_GlobalResources/Strings.resx", &keys(&["Title"])).unwrap();
        assert_eq!(unit.type_names().collect::<Vec<_>>(), vec!["Resources.Strings"]);
        let ty = &unit.namespaces[0].types[0];
        assert!(ty.is_sealed);
        assert!(ty.member("ResourceManager").is_some());
        assert!(ty.member("Culture").is_some());
        assert_eq!(ty.member("Title").map(|m| m.kind), Some(MemberKind::Property));
    }

    #[test]
    fn dotted_name_is_prefixed_and_flattened() {
        let unit = generate_resource_unit("Site.Errors.resx", &[]).unwrap();
        assert_eq!(unit.namespaces[0].name, "Resources_Site");
        assert_eq!(unit.namespaces[0].types[0].name, "Errors");

        let unit = generate_resource_unit("Resources.Menu.resx", &[]).unwrap();
        assert_eq!(unit.namespaces[0].name, "Resources");
        assert_eq!(unit.namespaces[0].types[0].name, "Menu");
    }

    #[test]
    fn invalid_names_are_rejected() {
        for head in ["my-strings.resx", "1st.resx", "Site.2.resx"] {
            let err = generate_resource_unit(head, &[]).unwrap_err();
            assert!(matches!(err, ResourceError::InvalidResourceName { ref path } if path == head));
        }
    }

    #[test]
    fn several_files_share_a_unit() {
        let mut unit = CodeCompileUnit::new();
        append_resource_types(&mut unit, "A.resx", &[]).unwrap();
        append_resource_types(&mut unit, "B.resx", &[]).unwrap();
        assert_eq!(unit.namespaces.len(), 1);
        assert_eq!(
            unit.type_names().collect::<Vec<_>>(),
            vec!["Resources.A", "Resources.B"]
        );
    }

    #[test]
    fn keys_are_sanitized_and_deduplicated() {
        let unit = generate_resource_unit("S.resx", &keys(&["Page Title", "Page.Title", "9lives", ""])).unwrap();
        let ty = &unit.namespaces[0].types[0];
        let names: Vec<_> = ty.members.iter().skip(4).map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Page_Title", "_9lives"]);
    }

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_resource_name("Ok"), "Ok");
        assert_eq!(sanitize_resource_name("a-b c"), "a_b_c");
        assert_eq!(sanitize_resource_name("-x"), "_x");
        assert_eq!(sanitize_resource_name("3d"), "_3d");
    }

    #[test]
    fn reads_resx_entries() {
        let text = r#"<?xml version="1.0" encoding="utf-8"?>
<root>
  <resheader name="resmimetype"><value>text/microsoft-resx</value></resheader>
  <data name="Greeting" xml:space="preserve"><value>Hello</value></data>
  <data name="Farewell"><value>Bye</value></data>
</root>"#;
        let file = SourceFile::new(FileId::from_raw(0), "S.resx".to_string(), text.to_string());
        assert_eq!(read_resx_keys(&file).unwrap(), vec!["Greeting", "Farewell"]);
    }

    #[test]
    fn malformed_resx() {
        let file = SourceFile::new(FileId::from_raw(0), "S.resx".to_string(), "<data name=\"x".to_string());
        assert!(matches!(read_resx_keys(&file), Err(ResourceError::Malformed { .. })));
    }
}
