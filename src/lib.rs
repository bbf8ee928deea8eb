#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::unwrap_used)]
#![warn(rust_2018_idioms, unused_lifetimes, missing_debug_implementations)]

//! Crate for a writer that buffers output line by line and writes every
//! line with one or more prefixes, optionally coloring the line content.
//!
//! Useful to tell apart the interleaved output of several processes:
//! give every process its own [`LinePrefixWriter`] with its own prefix.
//!
//! ```
//! use line_prefix::LinePrefixWriter;
//! use std::io::Write;
//!
//! let mut output = Vec::new();
//! {
//!     let mut writer = LinePrefixWriter::builder()
//!         .prefix("app |")
//!         .writer(&mut output)
//!         .build();
//!
//!     writeln!(writer, "hello world")?;
//!     write!(writer, "unfinished")?;
//!     writer.close()?;
//! }
//!
//! assert_eq!(b"app | hello world\nunfinished".as_slice(), output.as_slice());
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! Prefixes can be computed per line with [`Builder::prefix_fn`], and the
//! line content can be colored with any [`ColorSource`], for example a
//! [`termcolor::ColorSpec`].

mod builder;
mod color;
mod error;
mod escape;
mod prefix;
mod prefix_writer;

pub use builder::Builder;
pub use color::{
    ColorLock,
    ColorSource,
};
pub use error::Error;
pub use prefix::Prefix;
pub use prefix_writer::LinePrefixWriter;

pub use termcolor;
