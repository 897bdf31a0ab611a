use crate::input_symbol::InputSymbol;

// Terminals are the input symbols of the recognizers.
// NOTE: The epsilon symbol *does not exist* as a terminal; empty production
// bodies represent it.
pub type Terminal = InputSymbol;

/// Whether `name` is a terminal: exactly one lowercase latin letter.
pub fn is_terminal_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_lowercase())
}
