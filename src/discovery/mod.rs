mod file_finder;

pub use file_finder::{resource_folder, FileFinder, FileStats, FileType, SourceFile};
