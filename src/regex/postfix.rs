use crate::error::RegexError;
use crate::fa::dfa::DFA;
use crate::fa::nfa::NFA;
use crate::input_symbol::char_to_symbol;
use tracing::debug;

pub const CONCAT_SYMBOL: char = '.';
pub const UNION_SYMBOL: char = '+';
pub const KLEENE_SYMBOL: char = '*';
pub const EMPTY_WORD_SYMBOL: char = '1';

/// Whether `c` is a literal of the regex alphabet.
pub fn is_regex_letter(c: char) -> bool {
    c.is_ascii_lowercase()
}

/// Checks that `regex` is a well-formed postfix encoding of a regular
/// expression.
///
/// Runs the operand-count simulation: a literal (a letter or the empty-word
/// marker) pushes one operand, concatenation and union pop two and push
/// one, the Kleene star pops one and pushes one. The sequence is valid iff
/// no operator underflows the stack and exactly one operand remains at the
/// end.
pub fn check_postfix_regex(regex: &str) -> Result<(), RegexError> {
    let mut operands: usize = 0;
    for symbol in regex.chars() {
        match symbol {
            c if is_regex_letter(c) || c == EMPTY_WORD_SYMBOL => operands += 1,
            CONCAT_SYMBOL | UNION_SYMBOL => {
                if operands < 2 {
                    return Err(RegexError::MissingOperand(symbol));
                }
                operands -= 1;
            }
            KLEENE_SYMBOL => {
                if operands < 1 {
                    return Err(RegexError::MissingOperand(symbol));
                }
            }
            _ => return Err(RegexError::UnknownSymbol(symbol)),
        }
    }
    if operands != 1 {
        return Err(RegexError::Unbalanced(operands));
    }
    Ok(())
}

/// Compiles a validated postfix regex into an NFA via Thompson
/// construction.
///
/// A left-to-right scan keeps a stack of partial automata: literals push a
/// fresh two-state fragment, each operator pops its operands and pushes the
/// composed fragment. After validation the scan cannot underflow and ends
/// with exactly one automaton on the stack.
pub fn postfix_to_nfa(regex: &str) -> Result<NFA, RegexError> {
    check_postfix_regex(regex)?;

    let mut stack: Vec<NFA> = Vec::new();
    for symbol in regex.chars() {
        match symbol {
            c if is_regex_letter(c) => stack.push(NFA::literal(&char_to_symbol(c as u8))),
            EMPTY_WORD_SYMBOL => stack.push(NFA::empty_word()),
            CONCAT_SYMBOL => {
                let right = stack.pop().expect("validated postfix cannot underflow");
                let left = stack.pop().expect("validated postfix cannot underflow");
                stack.push(left.concatenate(right));
            }
            UNION_SYMBOL => {
                let right = stack.pop().expect("validated postfix cannot underflow");
                let left = stack.pop().expect("validated postfix cannot underflow");
                stack.push(left.union(right));
            }
            KLEENE_SYMBOL => {
                let operand = stack.pop().expect("validated postfix cannot underflow");
                stack.push(operand.kleene());
            }
            _ => unreachable!("rejected by check_postfix_regex"),
        }
    }
    Ok(stack.pop().expect("validated postfix leaves one automaton"))
}

/// Compiles a postfix regex all the way to a DFA.
pub fn postfix_to_dfa(regex: &str) -> Result<DFA, RegexError> {
    let nfa = postfix_to_nfa(regex)?;
    let dfa = nfa.to_deterministic();
    debug!(regex, states = dfa.states.len(), "compiled postfix regex");
    Ok(dfa)
}
