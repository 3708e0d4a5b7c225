//! Unix-specific platform implementations

mod filesystem;
mod paths;
mod signals;
mod terminal;

pub use filesystem::UnixFilesystem;
pub use paths::UnixPaths;
pub use signals::UnixSignals;
pub use terminal::UnixTerminal;
