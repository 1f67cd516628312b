use std::fmt::Write;

use rowan::NodeOrToken;

use crate::cst::{Assoc, Fixity, Node};

/// Indented tree dump, one element per line.
pub struct TreePrinter<'n> {
    node: &'n Node,
    spans: bool,
    precedence: bool,
}

impl<'n> TreePrinter<'n> {
    pub fn new(node: &'n Node) -> Self {
        Self {
            node,
            spans: false,
            precedence: false,
        }
    }

    pub fn with_spans(mut self, value: bool) -> Self {
        self.spans = value;
        self
    }

    pub fn with_precedence(mut self, value: bool) -> Self {
        self.precedence = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        self.format_node(self.node, 0, w)
    }

    fn format_node(&self, node: &Node, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        let prefix = "  ".repeat(indent);
        let span = self.span_str(node.range());
        let prec = self.prec_str(node);
        writeln!(w, "{}{}{}{}", prefix, node.kind(), span, prec)?;

        for child in node.children() {
            match child {
                NodeOrToken::Node(n) => self.format_node(n, indent + 1, w)?,
                NodeOrToken::Token(l) => {
                    let child_prefix = "  ".repeat(indent + 1);
                    let span = self.span_str(l.range());
                    let synthetic = if l.is_synthetic() { " synthetic" } else { "" };
                    writeln!(
                        w,
                        "{}{}{} {:?}{}",
                        child_prefix,
                        l.kind(),
                        span,
                        l.text(),
                        synthetic
                    )?;
                }
            }
        }
        Ok(())
    }

    fn span_str(&self, range: rowan::TextRange) -> String {
        if !self.spans {
            return String::new();
        }
        format!(
            " [{}..{}]",
            u32::from(range.start()),
            u32::from(range.end())
        )
    }

    fn prec_str(&self, node: &Node) -> String {
        if !self.precedence {
            return String::new();
        }
        let Some(op) = node.operator() else {
            return String::new();
        };
        match (op.fixity, op.assoc) {
            (Fixity::Infix, Some(Assoc::Left)) => format!(" p{} left", op.precedence),
            (Fixity::Infix, Some(Assoc::Right)) => format!(" p{} right", op.precedence),
            (fixity, _) => format!(" p{} {}", op.precedence, fixity),
        }
    }
}

impl Node {
    pub fn printer(&self) -> TreePrinter<'_> {
        TreePrinter::new(self)
    }

    pub fn dump(&self) -> String {
        self.printer().dump()
    }
}
