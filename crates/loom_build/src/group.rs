//! Compilation batches.

use crate::compiler::{CompilerRegistry, RegisteredCompiler};
use crate::provider::BuildProvider;
use loom_config::ProviderKind;
use tracing::debug;

/// Prefix for batches of generic content.
pub const WEB_PREFIX: &str = "App_Web";
/// Prefix for the application descriptor batch.
pub const APPLICATION_PREFIX: &str = "App_global.asax";
/// Prefix for theme batches.
pub const THEME_PREFIX: &str = "App_Theme";

/// Which batch family a provider belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupCategory {
    /// The application descriptor.
    Application,
    /// Theme directories.
    Theme,
    /// Everything else.
    Web,
}

impl GroupCategory {
    /// The category of `kind`.
    pub fn of(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Application => Self::Application,
            ProviderKind::Theme => Self::Theme,
            _ => Self::Web,
        }
    }

    /// Prefix for the synthetic assembly name.
    pub fn name_prefix(self) -> &'static str {
        match self {
            Self::Application => APPLICATION_PREFIX,
            Self::Theme => THEME_PREFIX,
            Self::Web => WEB_PREFIX,
        }
    }
}

/// Providers compiled together in one request.
///
/// The first provider added fixes the name prefix, the category flags, and
/// the compiler backend. Later providers are appended as they come; callers
/// only batch providers of one language together.
#[derive(Debug, Default)]
pub struct BuildProviderGroup {
    name_prefix: Option<&'static str>,
    application: bool,
    master: bool,
    standalone: bool,
    compiler: Option<RegisteredCompiler>,
    providers: Vec<BuildProvider>,
}

impl BuildProviderGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `provider`, classifying the group if it is the first.
    ///
    /// A language with no registered compiler leaves the group without a
    /// backend; it still accepts members but cannot be compiled.
    pub fn add_provider(&mut self, provider: BuildProvider, registry: &CompilerRegistry) {
        if self.providers.is_empty() {
            let category = GroupCategory::of(provider.kind());
            self.name_prefix = Some(category.name_prefix());
            self.application = category == GroupCategory::Application;
            self.master = category == GroupCategory::Theme;
            self.compiler = registry.lookup(provider.language_name()).cloned();
            debug!(
                prefix = category.name_prefix(),
                language = provider.language_name(),
                backend = self.compiler.as_ref().map(|c| c.info.backend.as_str()),
                "opened provider group"
            );
        }
        self.providers.push(provider);
    }

    /// The synthetic name prefix, or [`WEB_PREFIX`] before any member is added.
    pub fn name_prefix(&self) -> &'static str {
        self.name_prefix.unwrap_or(WEB_PREFIX)
    }

    /// Whether this is the application descriptor batch.
    pub fn is_application(&self) -> bool {
        self.application
    }

    /// Whether this is a theme master batch.
    pub fn is_master(&self) -> bool {
        self.master
    }

    /// Marks the group as a theme master batch.
    pub fn set_master(&mut self, master: bool) {
        self.master = master;
    }

    /// Whether this batch holds a single artifact compiled on its own.
    pub fn is_standalone(&self) -> bool {
        self.standalone
    }

    /// Marks the group as a single-artifact batch.
    pub fn set_standalone(&mut self, standalone: bool) {
        self.standalone = standalone;
    }

    /// The backend chosen for the first member.
    pub fn compiler(&self) -> Option<&RegisteredCompiler> {
        self.compiler.as_ref()
    }

    /// Language of the first member.
    pub fn language(&self) -> Option<&str> {
        self.providers.first().map(BuildProvider::language_name)
    }

    /// Members in insertion order.
    pub fn providers(&self) -> &[BuildProvider] {
        &self.providers
    }

    /// Takes the members out of the group.
    pub fn into_providers(self) -> Vec<BuildProvider> {
        self.providers
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` before any member is added.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::RecordingBackend;
    use loom_config::LoomConfig;
    use loom_source::ArtifactIdentity;
    use std::sync::Arc;

    fn registry() -> CompilerRegistry {
        CompilerRegistry::recording(&LoomConfig::default(), Arc::new(RecordingBackend::new()))
    }

    fn provider(path: &str, kind: ProviderKind, language: &str) -> BuildProvider {
        BuildProvider::new(ArtifactIdentity::durable(path), kind, language)
    }

    #[test]
    fn application_first() {
        let mut group = BuildProviderGroup::new();
        group.add_provider(provider("Global.asax", ProviderKind::Application, "csharp"), &registry());
        assert_eq!(group.name_prefix(), "App_global.asax");
        assert!(group.is_application());
        assert!(!group.is_master());
    }

    #[test]
    fn generic_first() {
        let mut group = BuildProviderGroup::new();
        group.add_provider(provider("a.aspx", ProviderKind::Page, "csharp"), &registry());
        assert_eq!(group.name_prefix(), "App_Web");
        assert!(!group.is_application());
        assert_eq!(group.compiler().unwrap().info.language, "csharp");
    }

    #[test]
    fn theme_first_is_master() {
        let mut group = BuildProviderGroup::new();
        group.add_provider(provider("App_Themes/Blue/a.skin", ProviderKind::Theme, "csharp"), &registry());
        assert_eq!(group.name_prefix(), "App_Theme");
        assert!(group.is_master());
    }

    #[test]
    fn later_members_do_not_reclassify() {
        let registry = registry();
        let mut group = BuildProviderGroup::new();
        group.add_provider(provider("a.aspx", ProviderKind::Page, "csharp"), &registry);
        group.add_provider(provider("Global.asax", ProviderKind::Application, "vb"), &registry);
        assert_eq!(group.name_prefix(), "App_Web");
        assert!(!group.is_application());
        assert_eq!(group.compiler().unwrap().info.language, "csharp");
        let paths: Vec<_> = group.providers().iter().map(|p| p.identity().path()).collect();
        assert_eq!(paths, vec!["a.aspx", "Global.asax"]);
    }

    #[test]
    fn unknown_language_leaves_group_open() {
        let registry = registry();
        let mut group = BuildProviderGroup::new();
        group.add_provider(provider("a.aspx", ProviderKind::Page, "cobol"), &registry);
        group.add_provider(provider("b.aspx", ProviderKind::Page, "cobol"), &registry);
        assert!(group.compiler().is_none());
        assert_eq!(group.len(), 2);
        assert_eq!(group.language(), Some("cobol"));
    }

    #[test]
    fn flags_are_settable() {
        let mut group = BuildProviderGroup::new();
        assert!(group.is_empty());
        group.set_standalone(true);
        group.set_master(true);
        assert!(group.is_standalone());
        assert!(group.is_master());
    }
}
