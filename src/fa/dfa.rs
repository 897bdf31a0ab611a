use crate::input_symbol::InputSymbol;
use crate::language::Language;
use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt::{self, Display, Formatter};

/// A deterministic finite automaton produced by subset construction.
///
/// Each DFA state stands for a canonical (sorted, deduplicated) set of NFA
/// states; two DFA states are equal iff those sets are equal. The
/// transition table maps (state, symbol) to at most one successor, which is
/// what distinguishes it from the NFA relation.
#[derive(Debug, Clone)]
pub struct DFA {
    pub state_index_map: FxHashMap<Vec<usize>, usize>, // Map of underlying NFA-state sets to indices
    pub alphabet_index_map: HashMap<InputSymbol, usize>, // Map of input symbols to indices

    pub states: Vec<Vec<usize>>,    // Each state is a set of NFA states
    pub alphabet: Vec<InputSymbol>, // Input symbols (alphabet)

    pub transitions: Vec<HashMap<usize, usize>>, // Transitions (state -> input_symbol -> next state)
    pub start_state: usize,
    pub accept_states: HashSet<usize>,
}

impl DFA {
    /// Returns the next state given the current state and input symbol
    fn next_state(&self, state: usize, symbol: usize) -> Option<usize> {
        self.transitions[state].get(&symbol).cloned()
    }

    /// Whether `state` is accepting, i.e. its underlying NFA-state set
    /// contains the NFA finish state.
    pub fn is_accepting(&self, state: usize) -> bool {
        self.accept_states.contains(&state)
    }
}

impl Language for DFA {
    /// Walks the input symbol by symbol. A symbol outside the alphabet or
    /// a missing transition rejects immediately; the empty word is accepted
    /// iff the start state itself is accepting.
    fn accepts(&self, input: &Vec<InputSymbol>) -> bool {
        let mut current_state = self.start_state;
        for symbol in input {
            let symbol_index = match self.alphabet_index_map.get(symbol) {
                Some(&index) => index,
                None => return false,
            };
            match self.next_state(current_state, symbol_index) {
                Some(next_state) => current_state = next_state,
                None => return false,
            }
        }
        self.accept_states.contains(&current_state)
    }
}

impl Display for DFA {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "start: q{}", self.start_state)?;
        writeln!(
            f,
            "accept: {}",
            self.accept_states
                .iter()
                .sorted()
                .map(|state| format!("q{}", state))
                .join(" ")
        )?;
        for (from, row) in self.transitions.iter().enumerate() {
            for (&symbol, &to) in row.iter().sorted_by_key(|(&symbol, _)| symbol) {
                writeln!(f, "(q{}, {}, q{})", from, self.alphabet[symbol].get_name(), to)?;
            }
        }
        Ok(())
    }
}
