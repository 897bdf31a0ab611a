use crate::cfg::terminal::{is_terminal_name, Terminal};
use crate::cfg::variable::Variable;
use crate::error::GrammarError;
use itertools::Itertools;

/// One symbol of a production body.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Symbol {
    T(Terminal),
    V(Variable),
}

impl Symbol {
    /// Classifies a token as a terminal or a non-terminal. Tokens that are
    /// neither (e.g. `Ab`, `#`) are a syntax error.
    pub fn parse(token: &str) -> Result<Symbol, GrammarError> {
        if Variable::is_valid_name(token) {
            Ok(Symbol::V(Variable::new(token)))
        } else if is_terminal_name(token) {
            Ok(Symbol::T(Terminal::new(token)))
        } else {
            Err(GrammarError::InvalidSymbol(token.to_string()))
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Symbol::V(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::T(_))
    }

    /// The symbol's textual name.
    pub fn display(&self) -> &str {
        match self {
            Symbol::T(terminal) => terminal.get_name(),
            Symbol::V(variable) => variable.get_name(),
        }
    }
}

/// A production rule `head -> body`; an empty body is an epsilon
/// production.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Production {
    pub head: Variable,
    pub body: Vec<Symbol>,
}

impl Production {
    /// Create a new Production
    pub fn new(head: Variable, body: Vec<Symbol>) -> Self {
        Production { head, body }
    }

    /// Display the production as a string
    pub fn display(&self) -> String {
        format!(
            "{} -> {}",
            self.head.get_name(),
            self.body.iter().map(|symbol| symbol.display()).join(" ")
        )
    }
}
