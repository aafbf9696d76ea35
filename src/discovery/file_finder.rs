use crate::config::Config;
use ignore::WalkBuilder;
use miette::{IntoDiagnostic, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Type of project file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Java,
    /// `res/values*/*.xml`
    XmlValues,
    /// `res/layout*/*.xml`
    XmlLayout,
    /// Any other XML file under `res/`
    XmlResource,
}

impl FileType {
    /// Determine file type from path
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        match extension {
            "java" => Some(FileType::Java),
            "xml" => {
                let folder = resource_folder(path)?;
                if folder.starts_with("values") {
                    Some(FileType::XmlValues)
                } else if folder.starts_with("layout") {
                    Some(FileType::XmlLayout)
                } else {
                    Some(FileType::XmlResource)
                }
            }
            _ => None,
        }
    }

    pub fn is_xml(&self) -> bool {
        !matches!(self, FileType::Java)
    }
}

/// Name of the resource folder (`values-de`) when the file sits in `res/<folder>/`
pub fn resource_folder(path: &Path) -> Option<&str> {
    let folder = path.parent()?;
    let res = folder.parent()?;
    if res.file_name()?.to_str()? != "res" {
        return None;
    }
    folder.file_name()?.to_str()
}

/// Represents a discovered project file
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path to the file
    pub path: PathBuf,

    /// Type of project file
    pub file_type: FileType,
}

impl SourceFile {
    pub fn new(path: PathBuf, file_type: FileType) -> Self {
        Self { path, file_type }
    }

    /// Resource folder name, `None` for Java sources
    pub fn folder(&self) -> Option<&str> {
        resource_folder(&self.path)
    }

    pub fn read_contents(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).into_diagnostic()
    }
}

/// File finder for discovering resource and Java files in a project
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Find all analyzable files under `root`, sorted by path
    pub fn find_files(&self, root: &Path) -> Result<Vec<SourceFile>> {
        debug!("Scanning for files in: {}", root.display());

        if !root.exists() {
            return Err(miette::miette!("Path does not exist: {}", root.display()));
        }

        let mut files: Vec<SourceFile> = self.walk(root).into_par_iter().filter_map(|path| {
            if self.config.should_exclude(&path) {
                trace!("Excluding: {}", path.display());
                return None;
            }
            let file_type = FileType::from_path(&path)?;
            trace!("Found {:?}: {}", file_type, path.display());
            Some(SourceFile::new(path, file_type))
        })
        .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("Found {} files", files.len());
        Ok(files)
    }

    fn walk(&self, dir: &Path) -> Vec<PathBuf> {
        let walker = WalkBuilder::new(dir)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true)
            .follow_links(false)
            .build();

        walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.into_path())
            .collect()
    }
}

/// Statistics about discovered files
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FileStats {
    pub java_files: usize,
    pub values_files: usize,
    pub layout_files: usize,
    pub other_resource_files: usize,
}

impl FileStats {
    pub fn from_files(files: &[SourceFile]) -> Self {
        let mut stats = Self::default();
        for file in files {
            match file.file_type {
                FileType::Java => stats.java_files += 1,
                FileType::XmlValues => stats.values_files += 1,
                FileType::XmlLayout => stats.layout_files += 1,
                FileType::XmlResource => stats.other_resource_files += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.java_files + self.values_files + self.layout_files + self.other_resource_files
    }
}
