//! Caret rendering of diagnostics against the parsed source.

use std::fmt::Write;

use annotate_snippets::{Annotation, AnnotationKind, Group, Level, Patch, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Renders diagnostics one per line, or as caret snippets once a source is set.
///
/// The caret is labelled with what the parser expected there, or with the
/// bracket recovery inserted. Related spans (the real bracket of a repaired
/// group) are drawn as secondary markers, and a fix becomes a `help` patch.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return self.format_plain(w);
        };
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report(source, diag)))?;
        }
        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{diag}")?;
        }
        Ok(())
    }
}

fn report<'a>(source: &'a str, diag: &'a DiagnosticMessage) -> Vec<Group<'a>> {
    let span = caret_span(diag.range, source.len());
    let related = diag.related.iter().map(|r| {
        AnnotationKind::Context
            .span(caret_span(r.range, source.len()))
            .label(&r.message)
    });
    let snippet = Snippet::source(source)
        .line_start(1)
        .annotation(primary(span.clone(), diag))
        .annotations(related);

    let mut groups = vec![level(diag.severity()).primary_title(&diag.message).element(snippet)];
    if let Some(fix) = &diag.fix {
        let patch = Snippet::source(source)
            .line_start(1)
            .patch(Patch::new(span, &fix.replacement));
        groups.push(Level::HELP.secondary_title(&fix.description).element(patch));
    }
    groups
}

fn primary(span: std::ops::Range<usize>, diag: &DiagnosticMessage) -> Annotation<'static> {
    let label = match (&diag.inserted, diag.expected.as_slice()) {
        (Some(text), _) => Some(format!("`{text}` inserted here")),
        (None, []) => None,
        (None, [one]) => Some(format!("expected `{one}`")),
        (None, many) => Some(format!("expected one of {} token kinds", many.len())),
    };
    AnnotationKind::Primary.span(span).label(label)
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Zero-width ranges (end of input, synthetic brackets) still get one caret.
fn caret_span(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();
    if start == end {
        start..(start + 1).min(limit)
    } else {
        start..end
    }
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}
