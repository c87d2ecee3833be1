// src/diagnostics/mod.rs
//
// Structured error accumulation. Errors carry a source location, a category
// from a closed set, a formatted header, and optional annotated sections.
// `begin_error` returns None when the category is suppressed, so call sites
// can skip expensive formatting entirely.
//
// The buffer is internally a RefCell: lattice and lookup code report
// diagnostics while holding shared borrows of GlobalState, and the checker
// is single-threaded per GlobalState.

use std::cell::RefCell;

use rustc_hash::FxHashSet;

use crate::frontend::Loc;

/// Closed set of diagnostic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InvalidMethodSignature,
    InvalidTypeDeclaration,
    InvalidTypeDeclarationTyped,
    BadStdlibGeneric,
    Resolver,
    DeprecatedSyntax,
}

impl ErrorCategory {
    pub fn code(self) -> u16 {
        match self {
            ErrorCategory::InvalidMethodSignature => 5001,
            ErrorCategory::InvalidTypeDeclaration => 5002,
            ErrorCategory::InvalidTypeDeclarationTyped => 5003,
            ErrorCategory::BadStdlibGeneric => 5004,
            ErrorCategory::Resolver => 5005,
            ErrorCategory::DeprecatedSyntax => 5006,
        }
    }

    pub fn code_string(self) -> String {
        format!("E{:04}", self.code())
    }
}

/// An additional annotated location inside a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLine {
    pub loc: Option<Loc>,
    pub message: String,
}

/// A titled group of error lines ("Expected:", "Got:", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSection {
    pub header: String,
    pub lines: Vec<ErrorLine>,
}

/// A committed diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub loc: Loc,
    pub category: ErrorCategory,
    pub header: String,
    pub lines: Vec<ErrorLine>,
    pub sections: Vec<ErrorSection>,
}

impl Diagnostic {
    pub fn new(loc: Loc, category: ErrorCategory, header: impl Into<String>) -> Self {
        Self {
            loc,
            category,
            header: header.into(),
            lines: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Dynamic miette rendering for the driver collaborator.
    pub fn to_miette(&self) -> miette::MietteDiagnostic {
        let mut labels = vec![miette::LabeledSpan::at(
            miette::SourceSpan::from(self.loc),
            self.header.clone(),
        )];
        for line in &self.lines {
            if let Some(loc) = line.loc {
                labels.push(miette::LabeledSpan::at(
                    miette::SourceSpan::from(loc),
                    line.message.clone(),
                ));
            }
        }
        miette::MietteDiagnostic::new(self.header.clone())
            .with_code(self.category.code_string())
            .with_labels(labels)
    }
}

/// Accumulates diagnostics for one check session.
#[derive(Debug, Default)]
pub struct DiagnosticBuffer {
    diags: RefCell<Vec<Diagnostic>>,
    suppressed: FxHashSet<ErrorCategory>,
}

impl Clone for DiagnosticBuffer {
    fn clone(&self) -> Self {
        Self {
            diags: RefCell::new(self.diags.borrow().clone()),
            suppressed: self.suppressed.clone(),
        }
    }
}

impl DiagnosticBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suppressed(suppressed: FxHashSet<ErrorCategory>) -> Self {
        Self {
            diags: RefCell::new(Vec::new()),
            suppressed,
        }
    }

    pub fn is_suppressed(&self, category: ErrorCategory) -> bool {
        self.suppressed.contains(&category)
    }

    /// Start a diagnostic. Returns None when the category is suppressed; the
    /// builder commits to the buffer when dropped.
    pub fn begin_error(&self, loc: Loc, category: ErrorCategory) -> Option<ErrorBuilder<'_>> {
        if self.is_suppressed(category) {
            return None;
        }
        Some(ErrorBuilder {
            buffer: self,
            diag: Some(Diagnostic::new(loc, category, String::new())),
        })
    }

    /// Commit an already-built diagnostic, honoring suppression.
    pub fn push(&self, diag: Diagnostic) {
        if self.is_suppressed(diag.category) {
            return;
        }
        self.diags.borrow_mut().push(diag);
    }

    /// Commit a batch (e.g. errors surfaced out of a dispatch).
    pub fn absorb(&self, diags: Vec<Diagnostic>) {
        for diag in diags {
            self.push(diag);
        }
    }

    pub fn len(&self) -> usize {
        self.diags.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.diags.borrow().is_empty()
    }

    pub fn errors(&self) -> Vec<Diagnostic> {
        self.diags.borrow().clone()
    }

    /// Drain the buffer, leaving it empty.
    pub fn take_errors(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diags.borrow_mut())
    }
}

/// In-progress diagnostic; commits on drop.
pub struct ErrorBuilder<'a> {
    buffer: &'a DiagnosticBuffer,
    diag: Option<Diagnostic>,
}

impl ErrorBuilder<'_> {
    fn diag_mut(&mut self) -> &mut Diagnostic {
        self.diag.as_mut().expect("diagnostic already committed")
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.diag_mut().header = header.into();
    }

    pub fn add_error_line(&mut self, loc: Loc, message: impl Into<String>) {
        self.diag_mut().lines.push(ErrorLine {
            loc: Some(loc),
            message: message.into(),
        });
    }

    pub fn add_note(&mut self, message: impl Into<String>) {
        self.diag_mut().lines.push(ErrorLine {
            loc: None,
            message: message.into(),
        });
    }

    pub fn add_section(&mut self, section: ErrorSection) {
        self.diag_mut().sections.push(section);
    }
}

impl Drop for ErrorBuilder<'_> {
    fn drop(&mut self) {
        if let Some(diag) = self.diag.take() {
            self.buffer.diags.borrow_mut().push(diag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_error_commits_on_drop() {
        let buffer = DiagnosticBuffer::new();
        {
            let mut e = buffer
                .begin_error(Loc::new(0, 3, 1), ErrorCategory::InvalidMethodSignature)
                .unwrap();
            e.set_header("Malformed signature");
            e.add_error_line(Loc::new(5, 8, 1), "declared here");
        }
        let errors = buffer.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].header, "Malformed signature");
        assert_eq!(errors[0].lines.len(), 1);
        assert_eq!(errors[0].category.code_string(), "E5001");
    }

    #[test]
    fn suppressed_category_yields_none() {
        let mut suppressed = FxHashSet::default();
        suppressed.insert(ErrorCategory::DeprecatedSyntax);
        let buffer = DiagnosticBuffer::with_suppressed(suppressed);

        assert!(buffer
            .begin_error(Loc::none(), ErrorCategory::DeprecatedSyntax)
            .is_none());
        assert!(buffer
            .begin_error(Loc::none(), ErrorCategory::Resolver)
            .is_some());
        // The unsuppressed builder committed on drop.
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn absorb_honors_suppression() {
        let mut suppressed = FxHashSet::default();
        suppressed.insert(ErrorCategory::Resolver);
        let buffer = DiagnosticBuffer::with_suppressed(suppressed);

        buffer.absorb(vec![
            Diagnostic::new(Loc::none(), ErrorCategory::Resolver, "dropped"),
            Diagnostic::new(Loc::none(), ErrorCategory::BadStdlibGeneric, "kept"),
        ]);
        let errors = buffer.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].header, "kept");
    }

    #[test]
    fn take_errors_drains() {
        let buffer = DiagnosticBuffer::new();
        buffer.push(Diagnostic::new(
            Loc::none(),
            ErrorCategory::Resolver,
            "one",
        ));
        assert_eq!(buffer.take_errors().len(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn miette_conversion_carries_code_and_labels() {
        let mut diag = Diagnostic::new(
            Loc::new(2, 6, 1),
            ErrorCategory::BadStdlibGeneric,
            "use the typed wrapper",
        );
        diag.lines.push(ErrorLine {
            loc: Some(Loc::new(8, 9, 1)),
            message: "legacy spelling here".to_string(),
        });
        let rendered = diag.to_miette();
        assert_eq!(rendered.code.as_deref(), Some("E5004"));
        assert_eq!(rendered.labels.as_ref().map(Vec::len), Some(2));
    }
}
