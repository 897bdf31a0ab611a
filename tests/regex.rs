use langcheck::error::RegexError;
use langcheck::language::Language;
use langcheck::regex::postfix::{check_postfix_regex, postfix_to_dfa, postfix_to_nfa};

#[test]
fn test_valid_postfix_expressions() {
    assert!(check_postfix_regex("a").is_ok());
    assert!(check_postfix_regex("1").is_ok());
    assert!(check_postfix_regex("ab.").is_ok());
    assert!(check_postfix_regex("ab+").is_ok());
    assert!(check_postfix_regex("a*").is_ok());
    assert!(check_postfix_regex("ab+*").is_ok());
    assert!(check_postfix_regex("ab+abb...*").is_ok());
    assert!(check_postfix_regex("aa.*b*.cc.*.").is_ok());
    assert!(check_postfix_regex("a1+").is_ok());
}

#[test]
fn test_unknown_symbols_are_rejected() {
    assert_eq!(
        check_postfix_regex("aB."),
        Err(RegexError::UnknownSymbol('B')),
        "uppercase letters are not part of the regex alphabet"
    );
    assert_eq!(
        check_postfix_regex("a2."),
        Err(RegexError::UnknownSymbol('2'))
    );
    assert_eq!(
        check_postfix_regex("(a)"),
        Err(RegexError::UnknownSymbol('('))
    );
    assert_eq!(
        check_postfix_regex("ab "),
        Err(RegexError::UnknownSymbol(' '))
    );
}

#[test]
fn test_operator_underflow_is_rejected() {
    assert_eq!(
        check_postfix_regex("*"),
        Err(RegexError::MissingOperand('*')),
        "a star with nothing on the stack is a syntax error"
    );
    assert_eq!(
        check_postfix_regex("a+"),
        Err(RegexError::MissingOperand('+'))
    );
    assert_eq!(
        check_postfix_regex("."),
        Err(RegexError::MissingOperand('.'))
    );
    assert_eq!(
        check_postfix_regex("ab.."),
        Err(RegexError::MissingOperand('.'))
    );
}

#[test]
fn test_leftover_operands_are_rejected() {
    assert_eq!(check_postfix_regex(""), Err(RegexError::Unbalanced(0)));
    assert_eq!(
        check_postfix_regex("ab"),
        Err(RegexError::Unbalanced(2)),
        "two operands without an operator must not validate"
    );
    assert_eq!(check_postfix_regex("abc"), Err(RegexError::Unbalanced(3)));
}

#[test]
fn test_construction_fails_on_invalid_input() {
    assert!(postfix_to_nfa("ab").is_err());
    assert!(postfix_to_dfa("x)").is_err());
}

#[test]
fn test_empty_word_marker() {
    let dfa = postfix_to_dfa("1").unwrap();
    assert!(dfa.accepts_string(""));
    assert!(!dfa.accepts_string("a"));

    // the marker composes like any other operand
    let dfa = postfix_to_dfa("a1.").unwrap();
    assert!(dfa.accepts_string("a"));
    assert!(!dfa.accepts_string(""));
    assert!(!dfa.accepts_string("a1"));

    let dfa = postfix_to_dfa("a1+").unwrap();
    assert!(dfa.accepts_string("a"));
    assert!(dfa.accepts_string(""));
    assert!(!dfa.accepts_string("aa"));
}

#[test]
fn test_single_letter_language() {
    let dfa = postfix_to_dfa("a").unwrap();
    assert!(dfa.accepts_string("a"));
    assert!(!dfa.accepts_string(""));
    assert!(!dfa.accepts_string("aa"));
    assert!(!dfa.accepts_string("b"));
}
