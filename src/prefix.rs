use std::fmt;

/// One piece of a line prefix.
pub enum Prefix {
    /// Text rendered as is on every line.
    Static(String),
    /// Called once per line, right before the line is written out.
    Dynamic(Box<dyn Fn() -> String + Send + Sync>),
}

impl Prefix {
    fn render_into(&self, out: &mut Vec<u8>) {
        match self {
            Prefix::Static(text) => out.extend_from_slice(text.as_bytes()),
            Prefix::Dynamic(provider) => out.extend_from_slice(provider().as_bytes()),
        }
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Prefix::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Ordered list of prefix pieces.
#[derive(Debug, Default)]
pub(crate) struct Prefixes(Vec<Prefix>);

impl Prefixes {
    pub(crate) fn push(&mut self, prefix: Prefix) {
        self.0.push(prefix);
    }

    /// Concatenates every piece in order and adds one trailing space, unless
    /// the result is empty.
    pub(crate) fn render(&self) -> Vec<u8> {
        let mut out = Vec::new();

        for prefix in &self.0 {
            prefix.render_into(&mut out);
        }

        if !out.is_empty() {
            out.push(b' ');
        }

        out
    }
}
