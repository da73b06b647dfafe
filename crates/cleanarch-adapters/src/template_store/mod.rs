//! Template lookup backed by a directory tree.

mod directory;

pub use directory::DirectoryTemplateProvider;
