//! Query Configuration

/// Names and behaviour of a published constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Canonical global name
    pub name: String,

    /// Short alias, bound only when the name is still free
    pub alias: Option<String>,

    /// Report misuse of instance methods (e.g. an empty class name) as
    /// errors instead of ignoring the call
    pub strict: bool,
}

impl QueryConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_alias(mut self, alias: Option<&str>) -> Self {
        self.alias = alias.map(str::to_string);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            name: "jQuery".to_string(),
            alias: Some("$".to_string()),
            strict: false,
        }
    }
}
