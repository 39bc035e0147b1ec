//! Translation-key message factory.
//!
//! Option descriptions and suggestion tooltips are produced as a
//! translation key plus arguments; a localizing host renders the final
//! string. The `Display` impl is a plain fallback for hosts (and tests)
//! that don't localize.

/// A localizable message: a stable key and its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    key: &'static str,
    args: Vec<String>,
}

impl Message {
    /// A message with no arguments.
    pub fn translatable(key: &'static str) -> Self {
        Message { key, args: Vec::new() }
    }

    /// A message with positional arguments.
    pub fn with_args(key: &'static str, args: impl IntoIterator<Item = String>) -> Self {
        Message { key, args: args.into_iter().collect() }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}({})", self.key, self.args.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_key_and_args() {
        let plain = Message::translatable("argument.entity.options.name.description");
        assert_eq!(plain.to_string(), "argument.entity.options.name.description");

        let with_args = Message::with_args("argument.entity.selector.unknown", ["@x".to_string()]);
        assert_eq!(with_args.to_string(), "argument.entity.selector.unknown(@x)");
        assert_eq!(with_args.args(), ["@x"]);
    }
}
