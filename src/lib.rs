pub mod cfg;
pub mod error;
pub mod fa;
pub mod input_symbol;
pub mod language;
pub mod regex;
