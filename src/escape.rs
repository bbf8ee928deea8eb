//! Translation of backslash escapes into the characters they name.

/// Lead byte of an escape sequence.
pub(crate) const MARKER: u8 = b'\\';

/// Result of one translation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    /// Byte to buffer, `None` when the marker was deferred to the next write.
    pub(crate) output: Option<u8>,
    /// Input bytes consumed by this step (0, 1 or 2).
    pub(crate) consumed: usize,
}

impl Step {
    fn emit(byte: u8, consumed: usize) -> Self {
        Self {
            output: Some(byte),
            consumed,
        }
    }
}

/// Rewrites `\n`, `\t`, `\\`, `\"` and `\'`. Any other byte after the marker
/// is left alone and the marker is kept.
///
/// A marker that ends one write is remembered and resolved against the first
/// byte of the next write.
#[derive(Debug)]
pub(crate) struct Unescaper {
    enabled: bool,
    pending: bool,
}

impl Unescaper {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            pending: false,
        }
    }

    /// True when the last write ended on an unresolved marker.
    pub(crate) fn is_pending(&self) -> bool {
        self.pending
    }

    /// Translates the byte at `at`. `at` must be inside `input`.
    pub(crate) fn step(&mut self, input: &[u8], at: usize) -> Step {
        let byte = input[at];

        if !self.enabled {
            return Step::emit(byte, 1);
        }

        if at == 0 && std::mem::take(&mut self.pending) {
            // the marker itself was consumed by the previous write
            return match resolve(byte) {
                Some(translated) => Step::emit(translated, 1),
                None => Step::emit(MARKER, 0),
            };
        }

        if byte != MARKER {
            return Step::emit(byte, 1);
        }

        match input.get(at + 1) {
            None => {
                self.pending = true;
                Step {
                    output: None,
                    consumed: 1,
                }
            }
            Some(&next) => match resolve(next) {
                Some(translated) => Step::emit(translated, 2),
                None => Step::emit(MARKER, 1),
            },
        }
    }
}

fn resolve(byte: u8) -> Option<u8> {
    match byte {
        b'n' => Some(b'\n'),
        b't' => Some(b'\t'),
        MARKER | b'"' | b'\'' => Some(byte),
        _ => None,
    }
}
