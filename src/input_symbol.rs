/// A single symbol of an automaton alphabet.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InputSymbol {
    pub name: String,
}

pub const EPSILON: &str = "epsilon";

/// Spellings of the empty word accepted in grammar text.
pub const EPSILON_SYMBOLS: [&str; 3] = ["epsilon", "ε", "$"];

impl InputSymbol {
    /// Create a new InputSymbol
    pub fn new(name: &str) -> Self {
        InputSymbol {
            name: name.to_string(),
        }
    }

    /// Create a new InputSymbol from a String
    pub fn from_string(name: String) -> Self {
        InputSymbol { name }
    }

    /// Get the name of the symbol
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

/// The distinguished symbol consuming no input.
pub fn epsilon() -> InputSymbol {
    InputSymbol::new(EPSILON)
}

pub fn char_to_symbol(i: u8) -> InputSymbol {
    InputSymbol {
        name: if (0x20..=0x7e).contains(&i) {
            (i as char).to_string()
        } else {
            format!("\\x{:02x}", i)
        },
    }
}
