use stratum_core::Node;

use crate::builtin;
use crate::feature::Feature;
use crate::grammar::Grammar;
use crate::parser::ParseOutput;
use crate::recovery::Validators;

impl Grammar {
    #[track_caller]
    pub fn expect(&self, src: &str) -> ParseOutput {
        self.parse(src).unwrap()
    }

    #[track_caller]
    pub fn expect_valid(&self, src: &str) -> Node {
        let output = self.expect(src);
        if !output.is_valid() {
            panic!(
                "Expected valid input, got error:\n{}",
                output.diagnostics()
            );
        }
        output.into_cst().unwrap()
    }

    /// Tree dump with precedence annotations.
    #[track_caller]
    pub fn expect_valid_cst(&self, src: &str) -> String {
        self.expect_valid(src).printer().with_precedence(true).dump()
    }

    /// Bracketed text of the parsed tree.
    #[track_caller]
    pub fn expect_valid_text(&self, src: &str) -> String {
        self.expect_valid(src).display_text()
    }

    /// Diagnostics, one per line.
    #[track_caller]
    pub fn expect_invalid(&self, src: &str) -> String {
        let output = self.expect(src);
        if output.is_valid() {
            panic!(
                "Expected invalid input, got valid:\n{}",
                output.cst().map(Node::dump).unwrap_or_default()
            );
        }
        output.diagnostics().to_string()
    }

    /// Bracketed text of every alternative reading.
    #[track_caller]
    pub fn expect_alternatives(&self, src: &str, validators: &Validators) -> Vec<String> {
        self.expect(src)
            .alternatives(validators)
            .map(|tree| tree.display_text())
            .collect()
    }
}

#[track_caller]
pub fn builtin_grammar() -> Grammar {
    builtin::grammar().unwrap()
}

/// `groupRecovery`, `unarySubtract`, `add` and `multiply` over numbers.
#[track_caller]
pub fn small_recovery_grammar() -> Grammar {
    let operators: Vec<Feature> = vec![
        builtin::group_recovery_parens(),
        builtin::unary_subtract(),
        builtin::add(),
        builtin::multiply(),
    ];
    let bases = vec![builtin::number(), builtin::group_recovery_base_parens()];
    Grammar::new(operators, bases).unwrap()
}
