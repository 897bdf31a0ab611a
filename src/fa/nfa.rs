use crate::fa::dfa::DFA;
use crate::fa::state::State;
use crate::input_symbol::{epsilon, InputSymbol};
use crate::language::Language;
use hashbrown::{HashMap, HashSet};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use tracing::debug;

/// A non-deterministic finite automaton with epsilon transitions.
///
/// Every automaton built here is a Thompson fragment: exactly one start
/// state and one finish state, the start state has no incoming transitions
/// and the finish state has no outgoing ones. Each composition operator
/// below preserves this shape.
///
/// States are arena indices into `transitions`; a fresh state is a push of
/// an empty row. Symbols are interned per automaton through
/// `alphabet_index_map`.
#[derive(Debug, Clone)]
pub struct NFA {
    pub alphabet_index_map: HashMap<InputSymbol, usize>, // Map of input symbols to indices
    pub alphabet: Vec<InputSymbol>,                      // Input symbols (alphabet)

    pub transitions: Vec<HashMap<usize, HashSet<usize>>>, // Transitions state -> input_symbol -> set of next states
    pub start_state: State,
    pub finish_state: State,
}

impl NFA {
    /// Creates the two-state automaton for a single symbol, or for the
    /// empty word when `symbol` is epsilon.
    pub fn literal(symbol: &InputSymbol) -> Self {
        let mut nfa = NFA {
            alphabet_index_map: HashMap::new(),
            alphabet: Vec::new(),
            transitions: vec![HashMap::new(), HashMap::new()],
            start_state: State(0),
            finish_state: State(1),
        };
        nfa.add_transition(State(0), symbol, State(1));
        nfa
    }

    /// Creates the automaton accepting only the empty word.
    pub fn empty_word() -> Self {
        NFA::literal(&epsilon())
    }

    /// Allocates a fresh state owned by this automaton.
    fn fresh_state(&mut self) -> State {
        self.transitions.push(HashMap::new());
        State(self.transitions.len() - 1)
    }

    fn symbol_index(&mut self, symbol: &InputSymbol) -> usize {
        *self
            .alphabet_index_map
            .entry(symbol.clone())
            .or_insert_with(|| {
                let index = self.alphabet.len();
                self.alphabet.push(symbol.clone());
                index
            })
    }

    /// Adds a transition from state `from` to state `to` on input `symbol`
    pub fn add_transition(&mut self, from: State, symbol: &InputSymbol, to: State) {
        let symbol_index = self.symbol_index(symbol);
        self.transitions[from.index()]
            .entry(symbol_index)
            .or_insert_with(HashSet::new)
            .insert(to.index());
    }

    /// Copies `other`'s transition rows into this automaton, sending each
    /// of `other`'s states through `map_state` and interning its symbols
    /// into this automaton's alphabet. The operand is consumed, so the two
    /// automata never alias a transition table after a merge.
    fn splice(&mut self, other: NFA, map_state: impl Fn(usize) -> usize) {
        // merge the alphabets, remembering where other's symbols land
        let mut symbol_map = vec![0usize; other.alphabet.len()];
        for (index, symbol) in other.alphabet.iter().enumerate() {
            symbol_map[index] = self.symbol_index(symbol);
        }

        for (from, row) in other.transitions.into_iter().enumerate() {
            let target = map_state(from);
            for (symbol, next_states) in row {
                self.transitions[target]
                    .entry(symbol_map[symbol])
                    .or_insert_with(HashSet::new)
                    .extend(next_states.into_iter().map(&map_state));
            }
        }
    }

    /// Concatenation: `other`'s start state is merged into this automaton's
    /// finish state, so its outgoing transitions continue where this
    /// automaton used to accept. `other`'s finish becomes the finish of the
    /// combined automaton.
    pub fn concatenate(mut self, other: NFA) -> NFA {
        let offset = self.transitions.len();
        let finish = self.finish_state.index();
        let other_start = other.start_state.index();
        let other_finish = other.finish_state.index();

        // one slot less: other's start collapses onto our finish
        for _ in 1..other.transitions.len() {
            self.transitions.push(HashMap::new());
        }
        let map_state = move |state: usize| {
            if state == other_start {
                finish
            } else if state > other_start {
                state + offset - 1
            } else {
                state + offset
            }
        };
        let new_finish = map_state(other_finish);
        self.splice(other, map_state);
        self.finish_state = State(new_finish);
        self
    }

    /// Union: a fresh start state branches into both operands, both old
    /// finish states continue into a fresh finish state.
    pub fn union(mut self, other: NFA) -> NFA {
        let offset = self.transitions.len();
        for _ in 0..other.transitions.len() {
            self.transitions.push(HashMap::new());
        }
        let left_start = self.start_state;
        let left_finish = self.finish_state;
        let right_start = State(other.start_state.index() + offset);
        let right_finish = State(other.finish_state.index() + offset);
        self.splice(other, move |state| state + offset);

        let new_start = self.fresh_state();
        let new_finish = self.fresh_state();
        let eps = epsilon();
        self.add_transition(new_start, &eps, left_start);
        self.add_transition(new_start, &eps, right_start);
        self.add_transition(left_finish, &eps, new_finish);
        self.add_transition(right_finish, &eps, new_finish);
        self.start_state = new_start;
        self.finish_state = new_finish;
        self
    }

    /// Kleene star: fresh start and finish states around the operand, with
    /// the loop edge from the old finish back to the old start and the
    /// escape edge skipping the operand entirely.
    pub fn kleene(mut self) -> NFA {
        let old_start = self.start_state;
        let old_finish = self.finish_state;
        let new_start = self.fresh_state();
        let new_finish = self.fresh_state();
        let eps = epsilon();
        self.add_transition(new_start, &eps, old_start);
        self.add_transition(new_start, &eps, new_finish);
        self.add_transition(old_finish, &eps, old_start);
        self.add_transition(old_finish, &eps, new_finish);
        self.start_state = new_start;
        self.finish_state = new_finish;
        self
    }

    /// Epsilon-closure: all states reachable from `states` using epsilon
    /// transitions alone. The result is canonical (sorted, deduplicated)
    /// regardless of traversal order.
    pub fn epsilon_closure(&self, states: &BTreeSet<usize>) -> BTreeSet<usize> {
        let mut closure = states.clone();
        let mut stack: Vec<usize> = states.iter().cloned().collect();
        let epsilon_index = match self.alphabet_index_map.get(&epsilon()) {
            Some(&index) => index,
            None => return closure,
        };

        while let Some(state) = stack.pop() {
            if let Some(next_states) = self.transitions[state].get(&epsilon_index) {
                for &next_state in next_states {
                    if closure.insert(next_state) {
                        stack.push(next_state);
                    }
                }
            }
        }

        closure
    }

    /// The union of all destinations reachable from `states` on `symbol`.
    fn next_states<'a>(
        &self,
        states: impl IntoIterator<Item = &'a usize>,
        symbol: usize,
    ) -> BTreeSet<usize> {
        let mut next = BTreeSet::new();
        for &state in states {
            if let Some(next_set) = self.transitions[state].get(&symbol) {
                next.extend(next_set.iter().cloned());
            }
        }
        next
    }

    /// Subset construction: builds the equivalent DFA.
    ///
    /// Each DFA state is the epsilon-closure of a set of NFA states, kept
    /// as a sorted vector so equal sets intern to the same state. The
    /// worklist processes every registered set exactly once, and there are
    /// at most 2^k distinct sets for k NFA states, so this terminates.
    pub fn to_deterministic(&self) -> DFA {
        let start_closure = self.epsilon_closure(&BTreeSet::from([self.start_state.index()]));
        let start_set: Vec<usize> = start_closure.into_iter().collect();

        // the DFA alphabet is this automaton's alphabet without epsilon
        let epsilon_symbol = epsilon();
        let mut dfa_alphabet: Vec<InputSymbol> = Vec::new();
        let mut dfa_alphabet_index_map: HashMap<InputSymbol, usize> = HashMap::new();
        let mut symbol_pairs: Vec<(usize, usize)> = Vec::new(); // (nfa symbol, dfa symbol)
        for (index, symbol) in self.alphabet.iter().enumerate() {
            if *symbol == epsilon_symbol {
                continue;
            }
            dfa_alphabet_index_map.insert(symbol.clone(), dfa_alphabet.len());
            symbol_pairs.push((index, dfa_alphabet.len()));
            dfa_alphabet.push(symbol.clone());
        }

        let mut state_index_map: FxHashMap<Vec<usize>, usize> = FxHashMap::default();
        state_index_map.insert(start_set.clone(), 0);
        let mut dfa_states: Vec<Vec<usize>> = vec![start_set];
        let mut dfa_transitions: Vec<HashMap<usize, usize>> = vec![HashMap::new()];
        let mut accept_states: HashSet<usize> = HashSet::new();

        let mut to_process: Vec<usize> = vec![0];
        while let Some(current) = to_process.pop() {
            let current_set = dfa_states[current].clone();
            if current_set.contains(&self.finish_state.index()) {
                accept_states.insert(current);
            }

            for &(nfa_symbol, dfa_symbol) in &symbol_pairs {
                let adjacent = self.next_states(&current_set, nfa_symbol);
                if adjacent.is_empty() {
                    continue;
                }
                let closure: Vec<usize> = self.epsilon_closure(&adjacent).into_iter().collect();
                let next_index = match state_index_map.get(&closure) {
                    Some(&index) => index,
                    None => {
                        let index = dfa_states.len();
                        state_index_map.insert(closure.clone(), index);
                        dfa_states.push(closure);
                        dfa_transitions.push(HashMap::new());
                        to_process.push(index);
                        index
                    }
                };
                dfa_transitions[current].insert(dfa_symbol, next_index);
            }
        }

        debug!(
            nfa_states = self.transitions.len(),
            dfa_states = dfa_states.len(),
            "subset construction finished"
        );
        DFA {
            state_index_map,
            alphabet_index_map: dfa_alphabet_index_map,
            states: dfa_states,
            alphabet: dfa_alphabet,
            transitions: dfa_transitions,
            start_state: 0,
            accept_states,
        }
    }
}

impl Language for NFA {
    /// Direct simulation: tracks the epsilon-closed set of current states
    /// through the input and accepts if the finish state is reachable at
    /// the end.
    fn accepts(&self, input: &Vec<InputSymbol>) -> bool {
        let mut current = self.epsilon_closure(&BTreeSet::from([self.start_state.index()]));
        for symbol in input {
            let symbol_index = match self.alphabet_index_map.get(symbol) {
                Some(&index) => index,
                None => return false,
            };
            let next = self.next_states(&current, symbol_index);
            current = self.epsilon_closure(&next);
            if current.is_empty() {
                return false;
            }
        }
        current.contains(&self.finish_state.index())
    }
}
