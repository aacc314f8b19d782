//! Menu traversal and render hints

pub mod locale;
pub mod walk;

pub use locale::{LocaleInfo, TextDirection};
pub use walk::{ItemPath, OptionPath};
