//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! LL(k) parsing table generator.
//!
//! `llk-gen` reads a grammar file, builds its canonical and extended LL(k)
//! tables with [`llk`] and writes them out as a text report:
//!  * [`notation`]: the `%token ... %% rules` grammar notation;
//!  * [`render`]: text writers for grammars, states and tables;
//!  * [`generate`]: the file-to-report pipeline behind the `llkptg` binary.

pub mod generate;
pub mod notation;
pub mod render;

pub use generate::{generate, generate_report};
pub use notation::{NotationError, read_grammar};
