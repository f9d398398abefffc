// Shared prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the template type they are all expressed in.

/// A fixed (system, user) prompt pair for one task.
///
/// The user text contains `{name}` placeholders filled by plain string substitution.
/// `id` is stable and identifies the task in logs, caches and test stubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub id: &'static str,
    pub system: &'static str,
    pub user: &'static str,
}

impl PromptTemplate {
    /// Substitutes every `{key}` in the user text in a single pass.
    /// Unknown keys are left untouched and substituted values are never rescanned.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.user.len());
        let mut rest = self.user;

        while let Some((before, name, after)) = next_placeholder(rest) {
            out.push_str(before);
            match vars.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => out.push_str(value),
                None => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }
            rest = after;
        }

        out.push_str(rest);
        out
    }

    /// Placeholder names appearing in the user text, in order of first appearance.
    #[cfg(test)]
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.user;
        while let Some((_, name, after)) = next_placeholder(rest) {
            if !names.contains(&name) {
                names.push(name);
            }
            rest = after;
        }
        names
    }
}

/// Splits `text` around its first `{identifier}`: (text before, identifier, text after).
fn next_placeholder(text: &str) -> Option<(&str, &str, &str)> {
    let mut offset = 0;
    while let Some(open) = text[offset..].find('{') {
        let start = offset + open;
        let after_open = &text[start + 1..];
        let close = after_open.find('}')?;
        let name = &after_open[..close];
        if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Some((&text[..start], name, &after_open[close + 1..]));
        }
        offset = start + 1;
    }
    None
}
