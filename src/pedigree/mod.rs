//! Ancestor trees from flat, positionally indexed cells.

mod assembler;
mod layout;

pub use assembler::{Ancestors, PedigreeAssembler};
pub use layout::{parse_key, PedigreeLayout};
