//! LIFO stack of open server tags.

/// Stack of currently open tag identifiers.
///
/// Comparisons are case-insensitive and culture-independent: both sides are
/// lowercased with Unicode's locale-free mapping.
#[derive(Debug, Default)]
pub struct TagStack {
    tags: Vec<String>,
}

impl TagStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an open tag.
    pub fn push(&mut self, tag_id: impl Into<String>) {
        self.tags.push(tag_id.into());
    }

    /// Removes and returns the most recently opened tag, or `None` when empty.
    pub fn pop(&mut self) -> Option<String> {
        self.tags.pop()
    }

    /// The most recently opened tag.
    pub fn current(&self) -> Option<&str> {
        self.tags.last().map(String::as_str)
    }

    /// Returns `true` when `tag_id` names the current top. Always `false`
    /// on an empty stack.
    pub fn compare_to(&self, tag_id: &str) -> bool {
        self.current().is_some_and(|top| tag_eq(top, tag_id))
    }

    /// Returns `true` when `tag_id` is open anywhere on the stack.
    pub fn contains(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|t| tag_eq(t, tag_id))
    }

    /// Number of open tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` when no tag is open.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

fn tag_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_never_matches() {
        let stack = TagStack::new();
        for tag in ["", "div", "DIV", "asp:Label"] {
            assert!(!stack.compare_to(tag));
        }
    }

    #[test]
    fn compare_is_case_insensitive() {
        let mut stack = TagStack::new();
        stack.push("DIV");
        assert!(stack.compare_to("div"));
        assert!(stack.compare_to("Div"));
        assert!(!stack.compare_to("span"));
    }

    #[test]
    fn compare_handles_non_ascii() {
        let mut stack = TagStack::new();
        stack.push("ÉTIQUETTE");
        assert!(stack.compare_to("étiquette"));
    }

    #[test]
    fn pop_empty_returns_none() {
        let mut stack = TagStack::new();
        assert_eq!(stack.pop(), None);
        stack.push("a");
        assert_eq!(stack.pop().as_deref(), Some("a"));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn only_top_is_compared() {
        let mut stack = TagStack::new();
        stack.push("asp:Panel");
        stack.push("asp:Label");
        assert!(!stack.compare_to("asp:panel"));
        assert!(stack.contains("asp:panel"));
        assert_eq!(stack.len(), 2);
    }
}
