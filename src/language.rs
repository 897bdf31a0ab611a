use crate::input_symbol::{char_to_symbol, InputSymbol};

/// A language that can decide membership of a word.
///
/// Membership never errors: a word over symbols the language has never seen
/// is simply not a member.
pub trait Language {
    fn accepts(&self, input: &Vec<InputSymbol>) -> bool;

    /// This function takes a string input, converts it into a
    /// Vec<InputSymbol>, and checks membership of the resulting word.
    fn accepts_string(&self, input: &str) -> bool {
        // Convert the string into a Vec of InputSymbol
        let input_symbols: Vec<InputSymbol> = input.bytes().map(char_to_symbol).collect();

        self.accepts(&input_symbols)
    }
}
