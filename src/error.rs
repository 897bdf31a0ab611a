use thiserror::Error;

/// Errors raised while compiling a postfix regular expression.
///
/// All of these are construction errors: the caller never receives an
/// automaton when one is returned. Recognition itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    #[error("symbol {0:?} is not part of the regex alphabet")]
    UnknownSymbol(char),
    #[error("operator {0:?} is applied to too few operands")]
    MissingOperand(char),
    #[error("postfix expression leaves {0} operands instead of one")]
    Unbalanced(usize),
}

/// Errors raised while building a context-free grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("{0:?} is not a valid non-terminal")]
    InvalidNonTerminal(String),
    #[error("{0:?} is neither a non-terminal nor a terminal")]
    InvalidSymbol(String),
    #[error("malformed grammar rule {0:?}")]
    MalformedRule(String),
}
