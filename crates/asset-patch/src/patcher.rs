//! Document patch orchestration.

use asset_graph::Document;
use asset_ref::TemplateStore;
use serde::Deserialize;
use tracing::{info, warn};

use crate::apply::apply_patch;
use crate::error::PatchError;
use crate::types::Patch;

// ── Options ───────────────────────────────────────────────────────────────

/// What to do when a document fails to patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorPolicy {
    /// Abort the run on the first failure.
    #[default]
    FailFast,
    /// Leave the failed document untouched and continue with the next.
    SkipDocument,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatchOptions {
    pub on_error: ErrorPolicy,
}

// ── Outcome ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum PatchOutcome {
    Patched {
        name: String,
        document: Document,
        edits: usize,
    },
    /// Only produced under [`ErrorPolicy::SkipDocument`].
    Skipped {
        name: String,
        original: Document,
        error: PatchError,
    },
}

impl PatchOutcome {
    pub fn name(&self) -> &str {
        match self {
            PatchOutcome::Patched { name, .. } | PatchOutcome::Skipped { name, .. } => name,
        }
    }

    /// The document to write back: the patched one, or the untouched
    /// original of a skipped document.
    pub fn document(&self) -> &Document {
        match self {
            PatchOutcome::Patched { document, .. } => document,
            PatchOutcome::Skipped { original, .. } => original,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, PatchOutcome::Skipped { .. })
    }
}

// ── Patcher ───────────────────────────────────────────────────────────────

/// Applies a loaded patch set to documents, one document at a time.
#[derive(Clone, Copy)]
pub struct Patcher<'a> {
    patches: &'a [Patch],
    templates: Option<TemplateStore<'a>>,
    options: PatchOptions,
}

impl<'a> Patcher<'a> {
    pub fn new(patches: &'a [Patch]) -> Self {
        Self {
            patches,
            templates: None,
            options: PatchOptions::default(),
        }
    }

    pub fn with_templates(mut self, templates: TemplateStore<'a>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn with_options(mut self, options: PatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply every patch, in order, to a copy of `doc`.
    ///
    /// Each patch sees the unmodified `doc` for matching and reference
    /// lookups, while its edits accumulate on the shared copy.
    pub fn patch_document(&self, doc: &Document) -> Result<Document, PatchError> {
        self.run(doc).map(|(document, _)| document)
    }

    fn run(&self, doc: &Document) -> Result<(Document, usize), PatchError> {
        let mut working = doc.clone();
        let mut edits = 0;
        for patch in self.patches {
            edits += apply_patch(doc, &mut working, patch, self.templates)?;
        }
        Ok((working, edits))
    }

    /// Patch a sequence of named documents.
    ///
    /// Under [`ErrorPolicy::FailFast`] the first failure is returned,
    /// wrapped with the name of the document. Under
    /// [`ErrorPolicy::SkipDocument`] failures are reported as
    /// [`PatchOutcome::Skipped`] and the run continues.
    pub fn patch_all<I>(&self, docs: I) -> Result<Vec<PatchOutcome>, PatchError>
    where
        I: IntoIterator<Item = (String, Document)>,
    {
        let mut outcomes = Vec::new();
        for (name, doc) in docs {
            match self.run(&doc) {
                Ok((document, edits)) => {
                    info!(document = %name, edits, "patched document");
                    outcomes.push(PatchOutcome::Patched { name, document, edits });
                }
                Err(error) => match self.options.on_error {
                    ErrorPolicy::FailFast => {
                        return Err(PatchError::Document {
                            name,
                            source: Box::new(error),
                        })
                    }
                    ErrorPolicy::SkipDocument => {
                        warn!(document = %name, %error, "skipping document");
                        outcomes.push(PatchOutcome::Skipped { name, original: doc, error });
                    }
                },
            }
        }
        Ok(outcomes)
    }
}
