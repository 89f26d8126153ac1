pub mod editing;
pub mod editor;
pub mod io;
pub mod keys;
pub mod raw;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{commands::*, document::*, history::*, patch::*, shortcuts::*, style::*};
pub use editor::*;
pub use io::*;
pub use keys::*;
pub use raw::*;
