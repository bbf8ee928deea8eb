//! Color control sequences for line content.
//!
//! Color sources emit into whatever target they are handed. Emission goes
//! through a [`ColorLock`] so that writers sharing one source never interleave
//! their set and reset sequences.

use parking_lot::Mutex;
use std::env;
use std::fmt;
use std::io::{
    self,
    IsTerminal,
    Write,
};
use std::sync::{
    Arc,
    OnceLock,
};
use termcolor::{
    Ansi,
    ColorChoice,
    ColorSpec,
    WriteColor,
};

/// Something that can switch terminal colors on and off in a target.
pub trait ColorSource: fmt::Debug + Send + Sync {
    /// Writes the sequence that turns the color on.
    ///
    /// # Errors
    ///
    /// Returns the error of `target`.
    fn on(&self, target: &mut dyn Write) -> io::Result<()>;

    /// Writes the sequence that resets the color.
    ///
    /// # Errors
    ///
    /// Returns the error of `target`.
    fn off(&self, target: &mut dyn Write) -> io::Result<()>;
}

impl ColorSource for ColorSpec {
    fn on(&self, target: &mut dyn Write) -> io::Result<()> {
        Ansi::new(target).set_color(self)
    }

    fn off(&self, target: &mut dyn Write) -> io::Result<()> {
        Ansi::new(target).reset()
    }
}

/// Critical section around color emission.
///
/// Clones share the same lock. [`ColorLock::global`] is the one used unless a
/// writer is given another.
#[derive(Debug, Clone, Default)]
pub struct ColorLock(Arc<Mutex<()>>);

impl ColorLock {
    /// Creates a lock independent of every other one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process wide lock.
    #[must_use]
    pub fn global() -> Self {
        static GLOBAL: OnceLock<ColorLock> = OnceLock::new();

        GLOBAL.get_or_init(ColorLock::new).clone()
    }

    fn with<T>(&self, f: impl FnOnce() -> T) -> T {
        let _guard = self.0.lock();
        f()
    }
}

/// Binds a [`ColorSource`] to a [`ColorLock`].
#[derive(Debug, Clone)]
pub(crate) struct ColorAdapter {
    source: Arc<dyn ColorSource>,
    lock: ColorLock,
}

impl ColorAdapter {
    /// Creates an adapter for `source` guarded by `lock`.
    pub(crate) fn new(source: Arc<dyn ColorSource>, lock: ColorLock) -> Self {
        Self { source, lock }
    }

    /// Emits the color on sequence into `sink`.
    ///
    /// # Errors
    ///
    /// Returns the error of `sink`.
    pub(crate) fn enable(&self, sink: &mut dyn Write) -> io::Result<()> {
        self.lock.with(|| self.source.on(sink))
    }

    /// Emits the color reset sequence into `sink`.
    ///
    /// # Errors
    ///
    /// Returns the error of `sink`.
    pub(crate) fn disable(&self, sink: &mut dyn Write) -> io::Result<()> {
        self.lock.with(|| self.source.off(sink))
    }
}

/// Whether colors should be emitted for `choice`.
///
/// `Auto` follows `NO_COLOR`, `TERM=dumb` and whether stdout is a terminal.
pub(crate) fn use_color(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always | ColorChoice::AlwaysAnsi => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => env_allows_color() && io::stdout().is_terminal(),
    }
}

fn env_allows_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    !matches!(env::var_os("TERM"), Some(term) if term == "dumb")
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::io::{
        self,
        Write,
    };
    use std::sync::Arc;
    use std::thread;
    use termcolor::{
        Color,
        ColorChoice,
        ColorSpec,
    };

    use super::{
        use_color,
        ColorAdapter,
        ColorLock,
        ColorSource,
    };

    fn blue() -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Blue));
        spec
    }

    #[derive(Debug)]
    struct Marker(&'static str);

    impl ColorSource for Marker {
        fn on(&self, target: &mut dyn Write) -> io::Result<()> {
            // split on purpose so a missing lock shows up as interleaving
            for byte in self.0.bytes() {
                target.write_all(&[byte])?;
                thread::yield_now();
            }
            Ok(())
        }

        fn off(&self, target: &mut dyn Write) -> io::Result<()> {
            target.write_all(b"/")
        }
    }

    #[test]
    fn color_spec_emits_ansi() {
        let adapter = ColorAdapter::new(Arc::new(blue()), ColorLock::new());

        let mut sink = Vec::new();
        adapter.enable(&mut sink).unwrap();
        adapter.disable(&mut sink).unwrap();

        assert_eq!("\x1B[0m\x1B[34m\x1B[0m", String::from_utf8(sink).unwrap());
    }

    #[test]
    fn global_lock_is_shared() {
        let ColorLock(first) = ColorLock::global();
        let ColorLock(second) = ColorLock::global();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn new_lock_is_independent() {
        let ColorLock(global) = ColorLock::global();
        let ColorLock(own) = ColorLock::new();

        assert!(!Arc::ptr_eq(&global, &own));
    }

    #[test]
    fn shared_target_is_not_interleaved() {
        let lock = ColorLock::new();
        let target = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let handles = ["aaaa", "bbbb"]
            .into_iter()
            .map(|sequence| {
                let adapter = ColorAdapter::new(Arc::new(Marker(sequence)), lock.clone());
                let target = Arc::clone(&target);

                thread::spawn(move || {
                    for _ in 0..200 {
                        let mut writer = SharedTarget(&target);
                        adapter.enable(&mut writer).unwrap();
                    }
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.join().unwrap();
        }

        let written = target.lock();
        for chunk in written.chunks(4) {
            assert!(chunk == b"aaaa" || chunk == b"bbbb", "interleaved: {chunk:?}");
        }
    }

    struct SharedTarget<'a>(&'a parking_lot::Mutex<Vec<u8>>);

    impl Write for SharedTarget<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn explicit_choices() {
        assert!(use_color(ColorChoice::Always));
        assert!(use_color(ColorChoice::AlwaysAnsi));
        assert!(!use_color(ColorChoice::Never));
    }
}
