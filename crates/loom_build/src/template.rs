//! Markup templates: pages, user controls, master pages, the application
//! file, and theme skins.
//!
//! A template becomes a partial class in the `ASP` namespace with one field
//! per server control that has an `id`. With a `CodeFile` directive the
//! control fields move to a partial fragment of the `Inherits` class instead,
//! and the code file's text is compiled alongside.

use crate::error::BuildError;
use loom_common::{
    CodeCompileUnit, ContentHash, Fingerprinter, MemberKind, TypeDeclaration, TypeMember,
};
use loom_config::ProviderKind;
use loom_parser::{ParseError, ScanOutput};
use loom_source::{ArtifactIdentity, BlockKind, Location, SourceDb, TextBlock};
use std::collections::HashMap;

/// Namespace of generated template classes.
pub const TEMPLATE_NAMESPACE: &str = "ASP";

/// A server control declared in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDecl {
    /// The control's `id`.
    pub id: String,
    /// The control's type.
    pub type_name: String,
}

/// What a template scan yielded.
#[derive(Debug, Clone)]
pub struct TemplateInfo {
    /// `Language` from the main directive.
    pub language: Option<String>,
    /// Namespace of the generated class.
    pub namespace: String,
    /// Simple name of the generated class.
    pub class_name: String,
    /// Base class of the generated class.
    pub base_type: Option<String>,
    /// `Inherits` from the main directive.
    pub inherits: Option<String>,
    /// Resolved `CodeFile` path, if any.
    pub code_file: Option<String>,
    /// Declared server controls, in document order.
    pub controls: Vec<ControlDecl>,
    /// Names from `<%@ Assembly Name="..." %>` directives.
    pub references: Vec<String>,
    /// Fingerprint of the template, its includes, and its code file.
    pub fingerprint: ContentHash,
    /// Files the template includes, then its code file.
    pub dependencies: Vec<String>,
    directive_location: Location,
}

impl TemplateInfo {
    /// Interprets the scanned blocks of a `kind` template. A `CodeFile`
    /// found in `sources` joins the fingerprint; a missing one is reported
    /// by [`generate`](Self::generate).
    pub fn from_scan(
        identity: &ArtifactIdentity,
        kind: ProviderKind,
        scan: ScanOutput,
        sources: &SourceDb,
    ) -> Result<Self, BuildError> {
        let main = main_directive(kind);
        let mut directive: Option<&TextBlock> = None;
        let mut references = Vec::new();
        let mut controls: Vec<ControlDecl> = Vec::new();
        let mut ids: HashMap<String, Location> = HashMap::new();

        for block in &scan.blocks {
            match block.kind {
                BlockKind::Directive if is_main_directive(&block.content, main) => {
                    if directive.is_some() {
                        return Err(structural(
                            identity,
                            &block.location,
                            format!("only one '{}' directive is allowed", main.unwrap_or("main")),
                        ));
                    }
                    directive = Some(block);
                }
                BlockKind::Directive if block.content.eq_ignore_ascii_case("Assembly") => {
                    if let Some(name) = block.attribute("Name").filter(|n| !n.trim().is_empty()) {
                        references.push(name.trim().to_string());
                    }
                }
                BlockKind::Tag | BlockKind::SelfClosingTag if block.is_server_tag() => {
                    let Some(id) = block.attribute("id").filter(|id| !id.is_empty()) else {
                        continue;
                    };
                    if ids.insert(id.to_string(), block.location.clone()).is_some() {
                        return Err(structural(
                            identity,
                            &block.location,
                            format!("the ID '{id}' is already used by another control"),
                        ));
                    }
                    controls.push(ControlDecl {
                        id: id.to_string(),
                        type_name: control_type(&block.content),
                    });
                }
                _ => {}
            }
        }

        let attr = |name: &str| {
            directive
                .and_then(|d| d.attribute(name))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let inherits = attr("Inherits");
        let code_file = attr("CodeFile").map(|f| relative_to(identity.path(), &f));
        if code_file.is_some() && inherits.is_none() {
            return Err(structural(
                identity,
                &directive.map_or_else(|| Location::start_of(identity.path()), |d| d.location.clone()),
                "'CodeFile' requires an 'Inherits' attribute".to_string(),
            ));
        }
        let (namespace, class_name) = match attr("ClassName") {
            Some(name) => split_type_name(&name),
            None => (TEMPLATE_NAMESPACE.to_string(), class_name_for(identity.path())),
        };

        let mut fingerprint = scan.fingerprint;
        let mut dependencies = scan.dependencies;
        if let Some(file) = code_file.as_deref().and_then(|name| sources.find(name)) {
            let mut combined = Fingerprinter::new();
            combined.update(fingerprint.to_string().as_bytes());
            combined.update(file.name.as_bytes());
            combined.update(file.content.as_bytes());
            fingerprint = combined.finish();
            if !dependencies.contains(&file.name) {
                dependencies.push(file.name.clone());
            }
        }

        Ok(Self {
            language: attr("Language"),
            namespace,
            class_name,
            base_type: inherits.clone().or_else(|| default_base(kind).map(str::to_string)),
            inherits,
            code_file,
            controls,
            references,
            fingerprint,
            dependencies,
            directive_location: directive
                .map_or_else(|| Location::start_of(identity.path()), |d| d.location.clone()),
        })
    }

    /// Fully qualified name of the generated class.
    pub fn qualified_class(&self) -> String {
        loom_common::qualified_name(&self.namespace, &self.class_name)
    }

    /// Emits the template's code unit.
    pub fn generate(
        &self,
        identity: &ArtifactIdentity,
        sources: &SourceDb,
    ) -> Result<CodeCompileUnit, BuildError> {
        let mut unit = CodeCompileUnit::new();
        for reference in &self.references {
            unit.add_reference(reference.clone());
        }

        let fields: Vec<TypeMember> = self
            .controls
            .iter()
            .map(|c| TypeMember::new(c.id.clone(), MemberKind::Field, c.type_name.clone()))
            .collect();

        let mut class = TypeDeclaration::new(self.class_name.clone()).partial();
        class.base_type = self.base_type.clone();

        match (&self.code_file, &self.inherits) {
            (Some(code_file), Some(inherits)) => {
                let file = sources.find(code_file).ok_or_else(|| {
                    BuildError::from_parse(
                        identity,
                        ParseError::IncludeNotFound {
                            location: self.directive_location.clone(),
                            filename: code_file.clone(),
                        },
                    )
                })?;
                unit.snippets.push(file.content.clone());
                let (base_ns, base_name) = split_type_name(inherits);
                let mut base = TypeDeclaration::new(base_name).partial();
                base.members = fields;
                unit.namespace_mut(&base_ns).types.push(base);
            }
            _ => class.members = fields,
        }
        unit.namespace_mut(&self.namespace).types.push(class);
        Ok(unit)
    }
}

fn structural(identity: &ArtifactIdentity, location: &Location, message: String) -> BuildError {
    BuildError::from_parse(
        identity,
        ParseError::Structural {
            location: location.clone(),
            message,
        },
    )
}

fn main_directive(kind: ProviderKind) -> Option<&'static str> {
    match kind {
        ProviderKind::Page => Some("Page"),
        ProviderKind::UserControl => Some("Control"),
        ProviderKind::MasterPage => Some("Master"),
        ProviderKind::Application => Some("Application"),
        _ => None,
    }
}

/// The nameless `<%@ Language="..." %>` form also counts as the main directive.
fn is_main_directive(name: &str, main: Option<&str>) -> bool {
    name.is_empty() || main.is_some_and(|m| m.eq_ignore_ascii_case(name))
}

fn default_base(kind: ProviderKind) -> Option<&'static str> {
    match kind {
        ProviderKind::Page => Some("System.Web.UI.Page"),
        ProviderKind::UserControl => Some("System.Web.UI.UserControl"),
        ProviderKind::MasterPage => Some("System.Web.UI.MasterPage"),
        ProviderKind::Application => Some("System.Web.HttpApplication"),
        _ => None,
    }
}

/// Maps a server tag to the control type it declares.
fn control_type(tag: &str) -> String {
    match tag.split_once(':') {
        Some((prefix, name)) if prefix.eq_ignore_ascii_case("asp") => {
            format!("System.Web.UI.WebControls.{name}")
        }
        Some(_) => "System.Web.UI.UserControl".to_string(),
        None if tag.eq_ignore_ascii_case("form") => "System.Web.UI.HtmlControls.HtmlForm".to_string(),
        None => "System.Web.UI.HtmlControls.HtmlGenericControl".to_string(),
    }
}

/// `site/Default.aspx` → `default_aspx`.
pub fn class_name_for(path: &str) -> String {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let mut name: String = file
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if name.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Splits `A.B.Type` into (`A.B`, `Type`).
fn split_type_name(name: &str) -> (String, String) {
    match name.rsplit_once('.') {
        Some((ns, ty)) => (ns.to_string(), ty.to_string()),
        None => (String::new(), name.to_string()),
    }
}

/// Resolves `target` against the directory of `path`; `~/` is app-relative.
fn relative_to(path: &str, target: &str) -> String {
    let target = target.replace('\\', "/");
    if let Some(rooted) = target.strip_prefix("~/") {
        return rooted.to_string();
    }
    match path.replace('\\', "/").rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/{target}"),
        None => target,
    }
}
