use langcheck::language::Language;
use langcheck::regex::postfix::{postfix_to_dfa, postfix_to_nfa};

#[test]
fn test_transition_function_is_deterministic() {
    // at most one successor per (state, symbol), for every state and symbol
    let dfa = postfix_to_dfa("aa.*b*.cc.*.").unwrap();
    for row in &dfa.transitions {
        for symbol in 0..dfa.alphabet.len() {
            let successors = row.get(&symbol).into_iter().count();
            assert!(successors <= 1);
        }
    }
}

#[test]
fn test_states_are_canonical_sets() {
    let dfa = postfix_to_dfa("ab+*").unwrap();
    for (index, state_set) in dfa.states.iter().enumerate() {
        assert!(
            state_set.windows(2).all(|pair| pair[0] < pair[1]),
            "state q{} is not a sorted, deduplicated set",
            index
        );
        assert_eq!(dfa.state_index_map[state_set], index);
    }
}

#[test]
fn test_subset_construction_state_bound() {
    for regex in ["a", "ab+*", "aa.*b*.cc.*.", "ab.b.a+*"] {
        let nfa = postfix_to_nfa(regex).unwrap();
        let dfa = nfa.to_deterministic();
        assert!(
            dfa.states.len() <= 1 << nfa.transitions.len(),
            "subset construction exceeded 2^k states for {}",
            regex
        );
    }
}

#[test]
fn test_union_star_language() {
    // (a+b)*
    let dfa = postfix_to_dfa("ab+*").unwrap();
    assert!(dfa.accepts_string(""));
    assert!(dfa.accepts_string("a"));
    assert!(dfa.accepts_string("ab"));
    assert!(dfa.accepts_string("bbaa"));
    assert!(!dfa.accepts_string("c"));
    assert!(!dfa.accepts_string("ac"));
}

#[test]
fn test_star_concatenation_language() {
    // (aa)*b*(cc)*
    let dfa = postfix_to_dfa("aa.*b*.cc.*.").unwrap();
    assert!(dfa.accepts_string(""));
    assert!(dfa.accepts_string("aa"));
    assert!(dfa.accepts_string("b"));
    assert!(dfa.accepts_string("aaaab"));
    assert!(dfa.accepts_string("aabcccc"));
    assert!(dfa.accepts_string("cc"));
    assert!(dfa.accepts_string("aabbcc"));

    assert!(!dfa.accepts_string("ab"), "an odd run of a's is not (aa)*");
    assert!(!dfa.accepts_string("aaab"));
    assert!(!dfa.accepts_string("aaba"), "no a's may follow the b block");
    assert!(!dfa.accepts_string("abc"));
    assert!(!dfa.accepts_string("ccb"), "b's may not follow the c block");
}

#[test]
fn test_empty_word_iff_start_state_accepts() {
    let star = postfix_to_dfa("a*").unwrap();
    assert!(star.is_accepting(star.start_state));
    assert!(star.accepts_string(""));

    let letter = postfix_to_dfa("a").unwrap();
    assert!(!letter.is_accepting(letter.start_state));
    assert!(!letter.accepts_string(""));
}

#[test]
fn test_missing_transition_rejects() {
    let dfa = postfix_to_dfa("ab.").unwrap();
    assert!(dfa.accepts_string("ab"));
    // no transition on 'a' after "ab" has been consumed
    assert!(!dfa.accepts_string("aba"));
    // no transition on 'b' from the start state
    assert!(!dfa.accepts_string("ba"));
}

#[test]
fn test_symbols_outside_the_alphabet_reject() {
    let dfa = postfix_to_dfa("ab+*").unwrap();
    assert!(!dfa.accepts_string("z"));
    assert!(!dfa.accepts_string("aZb"));
    assert!(!dfa.accepts_string("a b"));
}

#[test]
fn test_accepting_states_contain_the_nfa_finish() {
    let nfa = postfix_to_nfa("ab+*").unwrap();
    let dfa = nfa.to_deterministic();
    for (index, state_set) in dfa.states.iter().enumerate() {
        assert_eq!(
            dfa.accept_states.contains(&index),
            state_set.contains(&nfa.finish_state.index()),
            "q{} acceptance must mirror membership of the NFA finish state",
            index
        );
    }
}
