//! Loading a project tree into parsed documents

use super::{DeclarationTag, FolderConfiguration, ResourceItem, ResourceType, ResourceValue};
use crate::config::Config;
use crate::discovery::{resource_folder, FileFinder, FileType, SourceFile};
use crate::location::{Location, SourceText, Span};
use crate::parser::java::{JavaFile, JavaParser};
use crate::parser::xml::XmlDocument;
use miette::IntoDiagnostic;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },
    #[error("not a resource or Java file: {0}")]
    Unsupported(PathBuf),
}

/// Whether the whole project or a single file is visible to the pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisScope {
    #[default]
    Project,
    SingleFile(PathBuf),
}

impl AnalysisScope {
    pub fn is_single_file(&self) -> bool {
        matches!(self, AnalysisScope::SingleFile(_))
    }

    pub fn includes(&self, path: &Path) -> bool {
        match self {
            AnalysisScope::Project => true,
            AnalysisScope::SingleFile(file) => path == file,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Values,
    Layout,
    /// Menus, drawables and other file-based XML resources
    Other,
}

/// A parsed XML file under `res/<folder>/`
#[derive(Debug, Clone)]
pub struct ResourceDocument {
    pub folder: String,
    pub config: FolderConfiguration,
    pub kind: DocumentKind,
    pub xml: XmlDocument,
}

impl ResourceDocument {
    /// `None` when the file does not sit in a resource folder
    pub fn new(xml: XmlDocument) -> Option<Self> {
        let folder = resource_folder(xml.source().path())?.to_string();
        let kind = if folder.starts_with("values") {
            DocumentKind::Values
        } else if folder.starts_with("layout") {
            DocumentKind::Layout
        } else {
            DocumentKind::Other
        };
        Some(Self {
            config: FolderConfiguration::from_folder_name(&folder),
            folder,
            kind,
            xml,
        })
    }

    /// Resource type named by the folder, e.g. `layout` for `layout-land`
    pub fn folder_type(&self) -> Option<ResourceType> {
        self.folder.split('-').next().and_then(ResourceType::from_name)
    }

    /// File name without its extension
    pub fn resource_name(&self) -> String {
        self.xml
            .source()
            .path()
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The resource declared by the file itself
    pub fn file_item(&self, document: usize) -> Option<ResourceItem> {
        let resource_type = self.folder_type()?;
        let location = match self.xml.root() {
            Some(root) => self.xml.location(root.name_span),
            None => self.xml.location(Span::empty(0)),
        };
        Some(ResourceItem {
            resource_type,
            name: self.resource_name(),
            config: self.config.clone(),
            value: ResourceValue::None,
            location,
            name_location: None,
            translatable: false,
            declared_by: DeclarationTag::File,
            document,
            element: self.xml.root_id(),
        })
    }
}

/// A file that could not be parsed
#[derive(Debug, Clone)]
pub struct ParseFailure {
    pub location: Location,
    pub message: String,
}

/// All parsed files of one pass, sorted by path
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub scope: AnalysisScope,
    pub documents: Vec<ResourceDocument>,
    pub java: Vec<JavaFile>,
    pub failures: Vec<ParseFailure>,
}

impl Project {
    /// Discover and load every file under `root` that the scope includes
    pub fn load(root: &Path, config: &Config, scope: AnalysisScope) -> miette::Result<Self> {
        let files = match &scope {
            AnalysisScope::Project => FileFinder::new(config).find_files(root)?,
            AnalysisScope::SingleFile(path) => {
                let file_type = FileType::from_path(path)
                    .ok_or_else(|| LoadError::Unsupported(path.clone()))
                    .into_diagnostic()?;
                vec![SourceFile::new(path.clone(), file_type)]
            }
        };
        let loader = ProjectLoader::new(root, scope, config.abort_on_parse_error);
        debug!("Loading {} files from {}", files.len(), root.display());
        loader.load(&files).into_diagnostic()
    }

    pub fn document_for(&self, path: &str) -> Option<usize> {
        self.documents
            .iter()
            .position(|d| d.xml.display_path() == path)
    }
}

enum Loaded {
    Resource(ResourceDocument),
    Java(JavaFile),
    Failed(ParseFailure),
    Skipped,
}

pub struct ProjectLoader {
    root: PathBuf,
    scope: AnalysisScope,
    abort_on_parse_error: bool,
}

impl ProjectLoader {
    pub fn new(root: &Path, scope: AnalysisScope, abort_on_parse_error: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            scope,
            abort_on_parse_error,
        }
    }

    pub fn load(&self, files: &[SourceFile]) -> Result<Project, LoadError> {
        let loaded: Vec<Loaded> = files
            .par_iter()
            .filter(|file| self.scope.includes(&file.path))
            .map_init(JavaParser::new, |parser, file| self.load_file(parser, file))
            .collect::<Result<_, _>>()?;

        let mut project = Project {
            root: self.root.clone(),
            scope: self.scope.clone(),
            documents: Vec::new(),
            java: Vec::new(),
            failures: Vec::new(),
        };
        for entry in loaded {
            match entry {
                Loaded::Resource(document) => project.documents.push(document),
                Loaded::Java(file) => project.java.push(file),
                Loaded::Failed(failure) => project.failures.push(failure),
                Loaded::Skipped => {}
            }
        }

        if let Some(failure) = project.failures.first() {
            if self.abort_on_parse_error {
                return Err(LoadError::Parse {
                    file: failure.location.file.clone(),
                    line: failure.location.line(),
                    message: failure.message.clone(),
                });
            }
        }

        info!(
            "Loaded {} resource files and {} Java files ({} failed to parse)",
            project.documents.len(),
            project.java.len(),
            project.failures.len()
        );
        Ok(project)
    }

    fn load_file(
        &self,
        parser: &mut Result<JavaParser, crate::parser::java::JavaError>,
        file: &SourceFile,
    ) -> Result<Loaded, LoadError> {
        let text = std::fs::read_to_string(&file.path).map_err(|source| LoadError::Io {
            path: file.path.clone(),
            source,
        })?;
        let source = SourceText::relative_to(&self.root, file.path.clone(), text);

        if file.file_type == FileType::Java {
            let result = match parser {
                Ok(parser) => parser.parse(source.clone()),
                Err(e) => Err(e.clone()),
            };
            return Ok(match result {
                Ok(java) => Loaded::Java(java),
                Err(e) => {
                    warn!("Failed to parse {}: {}", source.display_path(), e);
                    Loaded::Failed(ParseFailure {
                        location: source.location(Span::empty(e.offset())),
                        message: e.to_string(),
                    })
                }
            });
        }

        match XmlDocument::parse(source.clone()) {
            Ok(xml) => Ok(ResourceDocument::new(xml).map_or(Loaded::Skipped, Loaded::Resource)),
            Err(e) => {
                warn!("Failed to parse {}: {}", source.display_path(), e);
                let offset = e.offset().min(source.text().len());
                Ok(Loaded::Failed(ParseFailure {
                    location: source.location(Span::empty(offset)),
                    message: e.to_string(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, path: &str, text: &str) -> PathBuf {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, text).unwrap();
        full
    }

    #[test]
    fn test_load_partial_failure() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "res/values/strings.xml", "<resources><string name=\"a\">A</string></resources>");
        write(dir.path(), "res/layout/broken.xml", "<LinearLayout><TextView></LinearLayout>");

        let project = Project::load(dir.path(), &Config::default(), AnalysisScope::Project).unwrap();
        assert_eq!(project.documents.len(), 1);
        assert_eq!(project.failures.len(), 1);
        assert_eq!(project.failures[0].location.file, "res/layout/broken.xml");
    }

    #[test]
    fn test_abort_on_parse_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "res/layout/broken.xml", "<LinearLayout>");
        let config = Config {
            abort_on_parse_error: true,
            ..Config::default()
        };
        let result = Project::load(dir.path(), &config, AnalysisScope::Project);
        assert!(result.is_err());
    }

    #[test]
    fn test_single_file_scope() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "res/values/strings.xml", "<resources/>");
        let layout = write(dir.path(), "res/layout-land/main.xml", "<FrameLayout/>");

        let project = Project::load(
            dir.path(),
            &Config::default(),
            AnalysisScope::SingleFile(layout),
        )
        .unwrap();
        assert_eq!(project.documents.len(), 1);
        assert_eq!(project.documents[0].kind, DocumentKind::Layout);
        assert_eq!(project.documents[0].config.qualifier_string(), "land");
        assert_eq!(project.documents[0].resource_name(), "main");
    }
}
