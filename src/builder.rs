use std::io::{
    self,
    Write,
};
use std::sync::Arc;
use termcolor::ColorChoice;

use crate::color::{
    use_color,
    ColorAdapter,
    ColorLock,
    ColorSource,
};
use crate::prefix::{
    Prefix,
    Prefixes,
};
use crate::LinePrefixWriter;

/// Configuration for a [`LinePrefixWriter`].
///
/// Prefixes are rendered in the order they were added, concatenated, and
/// followed by a single space when anything was rendered.
#[derive(Debug)]
pub struct Builder<W> {
    writer: W,
    prefixes: Prefixes,

    color: Option<Arc<dyn ColorSource>>,
    color_choice: ColorChoice,
    color_lock: Option<ColorLock>,

    render_escaped: bool,
}

impl Builder<io::Stdout> {
    /// Builder writing to stdout, without prefixes, color or escape rendering.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: io::stdout(),
            prefixes: Prefixes::default(),

            color: None,
            color_choice: ColorChoice::Auto,
            color_lock: None,

            render_escaped: false,
        }
    }
}

impl Default for Builder<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Builder<W> {
    /// Set the writer lines are written to.
    pub fn writer<T: Write>(self, writer: T) -> Builder<T> {
        Builder {
            writer,
            prefixes: self.prefixes,

            color: self.color,
            color_choice: self.color_choice,
            color_lock: self.color_lock,

            render_escaped: self.render_escaped,
        }
    }

    /// Add a static prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(Prefix::Static(prefix.into()));
        self
    }

    /// Add a prefix computed right before each line is written, e.g. a
    /// timestamp.
    #[must_use]
    pub fn prefix_fn<F>(mut self, prefix: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.prefixes.push(Prefix::Dynamic(Box::new(prefix)));
        self
    }

    /// Set the color of the line content. The prefix is not colored.
    #[must_use]
    pub fn color<C: ColorSource + 'static>(mut self, color: C) -> Self {
        self.color = Some(Arc::new(color));
        self
    }

    /// Decide when the color is used. Defaults to [`ColorChoice::Auto`],
    /// which drops the color if `NO_COLOR` is set, `TERM` is `dumb` or
    /// stdout is not a terminal.
    #[must_use]
    pub fn color_choice(mut self, choice: ColorChoice) -> Self {
        self.color_choice = choice;
        self
    }

    /// Guard color emission with `lock` instead of [`ColorLock::global`].
    #[must_use]
    pub fn color_lock(mut self, lock: ColorLock) -> Self {
        self.color_lock = Some(lock);
        self
    }

    /// Render `\n`, `\t`, `\\`, `\"` and `\'` as the characters they stand
    /// for.
    #[must_use]
    pub fn render_escaped(mut self, render: bool) -> Self {
        self.render_escaped = render;
        self
    }
}

impl<W: Write> Builder<W> {
    /// Build the writer.
    pub fn build(self) -> LinePrefixWriter<W> {
        let Builder {
            writer,
            prefixes,
            color,
            color_choice,
            color_lock,
            render_escaped,
        } = self;

        let color = color
            .filter(|_| use_color(color_choice))
            .map(|source| ColorAdapter::new(source, color_lock.unwrap_or_else(ColorLock::global)));

        LinePrefixWriter::from_parts(writer, prefixes, color, render_escaped)
    }
}
