//! HTTP handlers and web services: a directive naming the class followed by
//! its source code.

use crate::error::BuildError;
use loom_common::{CodeCompileUnit, ContentHash};
use loom_config::ProviderKind;
use loom_parser::{Lexer, ParseError};
use loom_source::{ArtifactIdentity, BlockKind, Location, SourceFile};

/// What a handler file declares.
#[derive(Debug, Clone)]
pub struct HandlerInfo {
    /// Fully qualified class named by `Class`.
    pub class: String,
    /// `Language` from the directive.
    pub language: Option<String>,
    /// Source text after the directive.
    pub body: String,
    /// Hash of the whole file.
    pub fingerprint: ContentHash,
}

impl HandlerInfo {
    /// Reads the `WebHandler` or `WebService` directive of `file`.
    pub fn parse(
        identity: &ArtifactIdentity,
        kind: ProviderKind,
        file: &SourceFile,
    ) -> Result<Self, BuildError> {
        let expected = match kind {
            ProviderKind::WebService => "WebService",
            _ => "WebHandler",
        };
        let structural = |location: Location, message: String| {
            BuildError::from_parse(identity, ParseError::Structural { location, message })
        };

        let mut lexer = Lexer::new(file);
        let directive = loop {
            let block = lexer
                .next_block()
                .map_err(|e| BuildError::from_parse(identity, e))?;
            match block {
                Some(b) if b.kind == BlockKind::Text && b.content.trim().is_empty() => continue,
                Some(b) if b.kind == BlockKind::Directive => break b,
                Some(b) => {
                    return Err(structural(
                        b.location,
                        format!("expecting a '{expected}' directive"),
                    ))
                }
                None => {
                    return Err(structural(
                        Location::start_of(file.name.clone()),
                        format!("missing '{expected}' directive"),
                    ))
                }
            }
        };
        if !directive.content.eq_ignore_ascii_case(expected) {
            return Err(structural(
                directive.location,
                format!(
                    "unknown directive '{}', expecting '{expected}'",
                    directive.content
                ),
            ));
        }
        let Some(class) = directive
            .attribute("Class")
            .map(str::trim)
            .filter(|c| !c.is_empty())
        else {
            return Err(structural(
                directive.location.clone(),
                format!("the '{expected}' directive requires a 'Class' attribute"),
            ));
        };

        Ok(Self {
            class: class.to_string(),
            language: directive
                .attribute("Language")
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            body: file.content[lexer.position()..].to_string(),
            fingerprint: file.content_hash,
        })
    }

    /// Emits the handler source as a unit.
    pub fn generate(&self) -> CodeCompileUnit {
        let mut unit = CodeCompileUnit::new();
        unit.snippets.push(self.body.clone());
        unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_source::FileId;

    fn parse(kind: ProviderKind, text: &str) -> Result<HandlerInfo, BuildError> {
        let file = SourceFile::new(FileId::from_raw(0), "Ping.ashx".to_string(), text.to_string());
        HandlerInfo::parse(&ArtifactIdentity::durable("Ping.ashx"), kind, &file)
    }

    #[test]
    fn reads_directive_and_body() {
        let info = parse(
            ProviderKind::Handler,
            "\n<%@ WebHandler Language=\"C#\" Class=\"Site.Ping\" %>\nnamespace Site { class Ping {} }",
        )
        .unwrap();
        assert_eq!(info.class, "Site.Ping");
        assert_eq!(info.language.as_deref(), Some("C#"));
        assert_eq!(info.body, "\nnamespace Site { class Ping {} }");
        assert_eq!(info.generate().snippets.len(), 1);
    }

    #[test]
    fn web_service_directive() {
        let info = parse(ProviderKind::WebService, "<%@ WebService Class=\"Calc\" %>class Calc {}").unwrap();
        assert_eq!(info.class, "Calc");
        assert!(info.language.is_none());
    }

    #[test]
    fn wrong_directive() {
        let err = parse(ProviderKind::WebService, "<%@ WebHandler Class=\"X\" %>").unwrap_err();
        assert!(err.to_string().contains("expecting 'WebService'"));
    }

    #[test]
    fn class_is_required() {
        let err = parse(ProviderKind::Handler, "<%@ WebHandler Language=\"C#\" %>").unwrap_err();
        assert!(err.to_string().contains("requires a 'Class' attribute"));
    }

    #[test]
    fn directive_must_come_first() {
        assert!(parse(ProviderKind::Handler, "class X {}").is_err());
        assert!(parse(ProviderKind::Handler, "   ").is_err());
    }
}
