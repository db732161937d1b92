//! Type system utilities and aliases.
//!
//! - [`aliases`]: Type aliases for the shared `Rc<RefCell<T>>` handles used
//!   between the editors and the shape collection.

pub mod aliases;

pub use aliases::*;
