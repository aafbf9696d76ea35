use super::{apply_edits, Fix, TextEdit};
use crate::parser::xml::XmlDocument;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{debug, warn};

/// Writes lowered fixes back to source files
pub struct FileEditor;

impl FileEditor {
    pub fn new() -> Self {
        Self
    }

    /// Apply several fixes to the file behind `doc`.
    ///
    /// Fixes are taken in order; one whose edits overlap an earlier fix or no
    /// longer lower against the document is skipped. Returns the number of
    /// fixes applied.
    pub fn apply_fixes(&self, doc: &XmlDocument, fixes: &[&Fix]) -> Result<usize> {
        let path = doc.source().path();
        let current = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        if current != doc.text() {
            return Err(miette::miette!(
                "{} changed since it was analyzed",
                doc.display_path()
            ));
        }

        let mut accepted: Vec<TextEdit> = Vec::new();
        let mut applied = 0;
        for fix in fixes {
            let lowered: std::result::Result<Vec<TextEdit>, _> =
                fix.edits.iter().map(|edit| edit.lower(doc)).collect();
            let lowered = match lowered {
                Ok(lowered) => lowered,
                Err(e) => {
                    warn!("Skipping fix \"{}\": {}", fix.description, e);
                    continue;
                }
            };
            let mut candidate = accepted.clone();
            candidate.extend(lowered);
            if apply_edits(doc.text(), &candidate).is_err() {
                debug!("Skipping overlapping fix \"{}\"", fix.description);
                continue;
            }
            accepted = candidate;
            applied += 1;
        }

        if applied > 0 {
            let fixed = apply_edits(doc.text(), &accepted).into_diagnostic()?;
            std::fs::write(path, fixed)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            debug!("Applied {} fixes to {}", applied, doc.display_path());
        }
        Ok(applied)
    }
}

impl Default for FileEditor {
    fn default() -> Self {
        Self::new()
    }
}
