//! Target text format shared by the detection compiler and the packager.
//!
//! - [`Stanza`]: one `[header]` section with ordered `key = value` entries
//! - [`render`]: the Stanza Emitter, byte-for-byte deterministic
//! - [`parse_conf`]: reads hand-written `.conf` files for pass-through
//! - [`BuildConfig`]: directory layout of an application source tree

pub mod config;
pub mod emit;
pub mod error;
pub mod parse;
pub mod stanza;

pub use config::{load_dotenv, BuildConfig};
pub use emit::{continue_lines, render};
pub use error::*;
pub use parse::parse_conf;
pub use stanza::*;
