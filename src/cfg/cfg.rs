use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};
use tracing::debug;

use crate::cfg::production::{Production, Symbol};
use crate::cfg::terminal::Terminal;
use crate::cfg::variable::Variable;
use crate::error::GrammarError;
use crate::input_symbol::{InputSymbol, EPSILON_SYMBOLS};
use crate::language::Language;

/// A production body; the empty body is an epsilon production.
pub type Body = Vec<Symbol>;

/// A context-free grammar: a start symbol plus, per non-terminal, the set
/// of right-hand sides it produces.
///
/// The Chomsky-normal-form view used for membership queries is derived
/// lazily and cached with single-assignment semantics: it is computed on
/// the first `accepts` call and read thereafter.
#[derive(Debug, Clone)]
pub struct CFG {
    start_symbol: Variable,
    productions: HashMap<Variable, HashSet<Body>>,
    chomsky_form: OnceCell<Box<CFG>>,
}

impl CFG {
    /// Creates a grammar from a start symbol and a list of productions.
    ///
    /// Fails if the start symbol or any production head violates the
    /// non-terminal naming rule; on failure no grammar is observable.
    pub fn from_start_and_productions(
        start_symbol: Variable,
        productions: Vec<Production>,
    ) -> Result<Self, GrammarError> {
        if !Variable::is_valid_name(start_symbol.get_name()) {
            return Err(GrammarError::InvalidNonTerminal(start_symbol.name));
        }
        let mut production_map: HashMap<Variable, HashSet<Body>> = HashMap::new();
        for production in productions {
            if !Variable::is_valid_name(production.head.get_name()) {
                return Err(GrammarError::InvalidNonTerminal(production.head.name));
            }
            production_map
                .entry(production.head)
                .or_insert_with(HashSet::new)
                .insert(production.body);
        }
        Ok(CFG {
            start_symbol,
            productions: production_map,
            chomsky_form: OnceCell::new(),
        })
    }

    /// Reads a grammar from text, one rule per line:
    /// `head -> body1 | body2 | ...`.
    ///
    /// Non-terminals are an uppercase letter followed by digits, terminals
    /// single lowercase letters; `epsilon`, `ε` and `$` denote the empty
    /// body.
    pub fn from_text(text: &str, start_symbol: Variable) -> Result<Self, GrammarError> {
        let mut productions = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if !line.is_empty() {
                CFG::read_line(line, &mut productions)?;
            }
        }
        CFG::from_start_and_productions(start_symbol, productions)
    }

    /// Internal helper to process a single line of a grammar rule.
    fn read_line(line: &str, productions: &mut Vec<Production>) -> Result<(), GrammarError> {
        let (head_text, body_text) = line
            .split_once("->")
            .ok_or_else(|| GrammarError::MalformedRule(line.to_string()))?;
        let head = Variable::new(head_text.trim());
        if !Variable::is_valid_name(head.get_name()) {
            return Err(GrammarError::InvalidNonTerminal(head.name));
        }
        for sub_body in body_text.split('|') {
            let mut body = Vec::new();
            for component in sub_body.split_whitespace() {
                if EPSILON_SYMBOLS.contains(&component) {
                    // Epsilon productions are represented with empty bodies
                    continue;
                }
                body.push(Symbol::parse(component)?);
            }
            productions.push(Production::new(head.clone(), body));
        }
        Ok(())
    }

    /// Returns the start symbol of the grammar
    pub fn get_start_symbol(&self) -> &Variable {
        &self.start_symbol
    }

    /// All productions of the grammar, in no particular order.
    pub fn get_productions(&self) -> Vec<Production> {
        self.productions
            .iter()
            .flat_map(|(head, bodies)| {
                bodies
                    .iter()
                    .map(move |body| Production::new(head.clone(), body.clone()))
            })
            .collect()
    }

    /// The bodies produced by `head`, if any.
    pub fn get_productions_of(&self, head: &Variable) -> Option<&HashSet<Body>> {
        self.productions.get(head)
    }

    pub fn to_text(&self) -> String {
        let mut result = format!("start: {}\n", self.start_symbol.get_name());
        for (head, bodies) in self
            .productions
            .iter()
            .sorted_by_key(|(head, _)| head.name.clone())
        {
            let rendered = bodies
                .iter()
                .sorted()
                .map(|body| {
                    if body.is_empty() {
                        "ε".to_string()
                    } else {
                        body.iter().map(|symbol| symbol.display()).join(" ")
                    }
                })
                .join(" | ");
            result.push_str(&format!("{} -> {}\n", head.get_name(), rendered));
        }
        result
    }

    /// The set of non-terminals that derive the empty word. Grows
    /// monotonically and is bounded by the number of non-terminals, so the
    /// loop terminates.
    fn nullable_set(&self) -> HashSet<Variable> {
        let mut nullable: HashSet<Variable> = HashSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for (head, bodies) in &self.productions {
                if nullable.contains(head) {
                    continue;
                }
                let derives_empty = bodies.iter().any(|body| {
                    body.iter().all(|symbol| match symbol {
                        Symbol::V(variable) => nullable.contains(variable),
                        Symbol::T(_) => false,
                    })
                });
                if derives_empty {
                    nullable.insert(head.clone());
                    changed = true;
                }
            }
        }
        nullable
    }

    /// Whether the grammar derives the empty word.
    pub fn generates_epsilon(&self) -> bool {
        self.nullable_set().contains(&self.start_symbol)
    }

    /// Whether every production is CNF-shaped: a single terminal or two
    /// non-terminals, with an empty body permitted on the start symbol
    /// only.
    pub fn is_chomsky_normal_form(&self) -> bool {
        self.productions.iter().all(|(head, bodies)| {
            bodies.iter().all(|body| match body.as_slice() {
                [] => *head == self.start_symbol,
                [Symbol::T(_)] => true,
                [Symbol::V(_), Symbol::V(_)] => true,
                _ => false,
            })
        })
    }

    /// The Chomsky-normal-form view of this grammar, computed on first use
    /// and reused for every later membership query.
    pub fn chomsky_normal_form(&self) -> &CFG {
        self.chomsky_form
            .get_or_init(|| Box::new(self.to_chomsky_normal_form()))
    }

    /// Rewrites the grammar into an equivalent Chomsky normal form through
    /// four ordered passes: START (fresh start symbol), DEL (epsilon
    /// elimination), UNIT (unit elimination) and BIN/TERM (binarization
    /// plus terminal lifting).
    pub fn to_chomsky_normal_form(&self) -> CFG {
        if self.is_chomsky_normal_form() {
            return CFG {
                start_symbol: self.start_symbol.clone(),
                productions: self.productions.clone(),
                chomsky_form: OnceCell::new(),
            };
        }
        let mut fresh = FreshVariables::for_grammar(self);
        let normalized = self
            .with_new_start(&mut fresh)
            .without_epsilon_rules()
            .without_unit_rules()
            .with_binarized_rules(&mut fresh);
        debug!(
            variables = normalized.productions.len(),
            "grammar rewritten to Chomsky normal form"
        );
        normalized
    }

    /// START: introduces a fresh start symbol producing only the old one,
    /// so epsilon and unit elimination on the start symbol cannot disturb
    /// the rest of the grammar.
    fn with_new_start(&self, fresh: &mut FreshVariables) -> CFG {
        let new_start = fresh.next();
        let mut productions = self.productions.clone();
        productions
            .entry(new_start.clone())
            .or_insert_with(HashSet::new)
            .insert(vec![Symbol::V(self.start_symbol.clone())]);
        CFG {
            start_symbol: new_start,
            productions,
            chomsky_form: OnceCell::new(),
        }
    }

    /// DEL: removes epsilon productions.
    ///
    /// The nullable set is computed up front, then every body is rewritten
    /// into all variants with each nullable occurrence independently kept
    /// or removed. The start symbol keeps an empty body iff the grammar
    /// was nullable.
    fn without_epsilon_rules(&self) -> CFG {
        let nullable = self.nullable_set();
        let start_nullable = nullable.contains(&self.start_symbol);
        let mut productions: HashMap<Variable, HashSet<Body>> = HashMap::new();
        for (head, bodies) in &self.productions {
            let new_bodies = productions
                .entry(head.clone())
                .or_insert_with(HashSet::new);
            for body in bodies {
                for variant in body_variants(body, &nullable) {
                    if !variant.is_empty() {
                        new_bodies.insert(variant);
                    }
                }
            }
        }
        if start_nullable {
            productions
                .entry(self.start_symbol.clone())
                .or_insert_with(HashSet::new)
                .insert(Vec::new());
        }
        CFG {
            start_symbol: self.start_symbol.clone(),
            productions,
            chomsky_form: OnceCell::new(),
        }
    }

    /// The transitive closure of unit pairs `(A, B)`: A derives B through
    /// unit productions alone. Every variable pairs with itself. The pair
    /// set grows monotonically within a finite square, so the worklist
    /// drains.
    fn unit_pairs(&self) -> HashSet<(Variable, Variable)> {
        let mut unit_successors: HashMap<&Variable, HashSet<&Variable>> = HashMap::new();
        for (head, bodies) in &self.productions {
            for body in bodies {
                if let [Symbol::V(target)] = body.as_slice() {
                    unit_successors
                        .entry(head)
                        .or_insert_with(HashSet::new)
                        .insert(target);
                }
            }
        }

        let mut pairs: HashSet<(Variable, Variable)> = HashSet::new();
        let mut to_process: Vec<(Variable, Variable)> = Vec::new();
        for head in self.productions.keys() {
            pairs.insert((head.clone(), head.clone()));
            to_process.push((head.clone(), head.clone()));
        }
        while let Some((head, via)) = to_process.pop() {
            if let Some(successors) = unit_successors.get(&via) {
                for &next in successors {
                    let pair = (head.clone(), next.clone());
                    if pairs.insert(pair.clone()) {
                        to_process.push(pair);
                    }
                }
            }
        }
        pairs
    }

    /// UNIT: removes unit productions by replacing each variable's bodies
    /// with the non-unit bodies of everything it unit-derives.
    fn without_unit_rules(&self) -> CFG {
        let pairs = self.unit_pairs();
        let mut productions: HashMap<Variable, HashSet<Body>> = HashMap::new();
        for head in self.productions.keys() {
            productions.insert(head.clone(), HashSet::new());
        }
        for (head, via) in pairs {
            if let Some(bodies) = self.productions.get(&via) {
                let new_bodies = productions
                    .entry(head)
                    .or_insert_with(HashSet::new);
                for body in bodies {
                    if !matches!(body.as_slice(), [Symbol::V(_)]) {
                        new_bodies.insert(body.clone());
                    }
                }
            }
        }
        CFG {
            start_symbol: self.start_symbol.clone(),
            productions,
            chomsky_form: OnceCell::new(),
        }
    }

    /// BIN + TERM: splits bodies longer than two symbols, then lifts
    /// terminals out of two-symbol bodies through proxy variables.
    ///
    /// Splitting moves everything after the first symbol into a fresh
    /// variable's single production; each split strictly shrinks the body
    /// being placed, so the worklist drains. One proxy variable is
    /// allocated per distinct terminal.
    fn with_binarized_rules(&self, fresh: &mut FreshVariables) -> CFG {
        let mut productions: HashMap<Variable, HashSet<Body>> = HashMap::new();
        for head in self.productions.keys() {
            productions.insert(head.clone(), HashSet::new());
        }

        let mut to_place: Vec<(Variable, Body)> = self
            .productions
            .iter()
            .flat_map(|(head, bodies)| {
                bodies.iter().map(move |body| (head.clone(), body.clone()))
            })
            .collect();
        while let Some((head, body)) = to_place.pop() {
            if body.len() > 2 {
                let tail: Body = body[1..].to_vec();
                let continuation = fresh.next();
                productions
                    .entry(head)
                    .or_insert_with(HashSet::new)
                    .insert(vec![body[0].clone(), Symbol::V(continuation.clone())]);
                to_place.push((continuation, tail));
            } else {
                productions
                    .entry(head)
                    .or_insert_with(HashSet::new)
                    .insert(body);
            }
        }

        // lift terminals out of the remaining two-symbol bodies
        let mut terminal_proxies: HashMap<Terminal, Variable> = HashMap::new();
        let mut lifted: HashMap<Variable, HashSet<Body>> = HashMap::new();
        for (head, bodies) in productions {
            let new_bodies = lifted.entry(head).or_insert_with(HashSet::new);
            for body in bodies {
                if body.len() == 2 {
                    let new_body: Body = body
                        .into_iter()
                        .map(|symbol| match symbol {
                            Symbol::T(terminal) => {
                                let proxy = terminal_proxies
                                    .entry(terminal)
                                    .or_insert_with(|| fresh.next())
                                    .clone();
                                Symbol::V(proxy)
                            }
                            variable => variable,
                        })
                        .collect();
                    new_bodies.insert(new_body);
                } else {
                    new_bodies.insert(body);
                }
            }
        }
        for (terminal, proxy) in terminal_proxies {
            lifted
                .entry(proxy)
                .or_insert_with(HashSet::new)
                .insert(vec![Symbol::T(terminal)]);
        }

        CFG {
            start_symbol: self.start_symbol.clone(),
            productions: lifted,
            chomsky_form: OnceCell::new(),
        }
    }

    /// CYK membership test. `self` must be in Chomsky normal form.
    ///
    /// Fills a (variable, i, j) table of derivable spans bottom-up by span
    /// length; the word is a member iff the start symbol derives the full
    /// span. The table is built fresh per query and discarded.
    fn cyk_accepts(&self, input: &[InputSymbol]) -> bool {
        if input.is_empty() {
            return self
                .productions
                .get(&self.start_symbol)
                .map_or(false, |bodies| bodies.contains(&Vec::new()));
        }
        let n = input.len();

        // intern every variable appearing as a head or inside a body
        let mut variable_index: FxHashMap<&Variable, usize> = FxHashMap::default();
        let mut variable_count = 0usize;
        for (head, bodies) in &self.productions {
            if !variable_index.contains_key(head) {
                variable_index.insert(head, variable_count);
                variable_count += 1;
            }
            for body in bodies {
                for symbol in body {
                    if let Symbol::V(variable) = symbol {
                        if !variable_index.contains_key(variable) {
                            variable_index.insert(variable, variable_count);
                            variable_count += 1;
                        }
                    }
                }
            }
        }
        let start_index = match variable_index.get(&self.start_symbol) {
            Some(&index) => index,
            None => return false,
        };

        // index the CNF rules
        let mut terminal_rules: FxHashMap<&str, SmallVec<[usize; 4]>> = FxHashMap::default();
        let mut binary_rules: Vec<(usize, usize, usize)> = Vec::new();
        for (head, bodies) in &self.productions {
            let head_index = variable_index[head];
            for body in bodies {
                match body.as_slice() {
                    [Symbol::T(terminal)] => terminal_rules
                        .entry(terminal.get_name())
                        .or_insert_with(SmallVec::new)
                        .push(head_index),
                    [Symbol::V(left), Symbol::V(right)] => {
                        binary_rules.push((head_index, variable_index[left], variable_index[right]))
                    }
                    _ => {}
                }
            }
        }

        // table[v][i][j]: variable v derives input[i..j]
        let mut table = vec![vec![vec![false; n + 1]; n + 1]; variable_count];
        for (i, symbol) in input.iter().enumerate() {
            if let Some(heads) = terminal_rules.get(symbol.get_name()) {
                for &head in heads {
                    table[head][i][i + 1] = true;
                }
            }
        }
        for length in 2..=n {
            for i in 0..=n - length {
                let j = i + length;
                for &(head, left, right) in &binary_rules {
                    if table[head][i][j] {
                        continue;
                    }
                    for k in i + 1..j {
                        if table[left][i][k] && table[right][k][j] {
                            table[head][i][j] = true;
                            break;
                        }
                    }
                }
            }
        }
        table[start_index][0][n]
    }
}

impl Language for CFG {
    /// Membership via the memoized Chomsky normal form and the CYK
    /// algorithm.
    fn accepts(&self, input: &Vec<InputSymbol>) -> bool {
        self.chomsky_normal_form().cyk_accepts(input)
    }
}

impl Display for CFG {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

/// All copies of `body` with each nullable occurrence independently kept or
/// removed.
fn body_variants(body: &[Symbol], nullable: &HashSet<Variable>) -> Vec<Body> {
    let first_nullable = body
        .iter()
        .position(|symbol| matches!(symbol, Symbol::V(variable) if nullable.contains(variable)));
    match first_nullable {
        None => vec![body.to_vec()],
        Some(index) => {
            let tails = body_variants(&body[index + 1..], nullable);
            let prefix = &body[..index];
            let mut variants = Vec::with_capacity(tails.len() * 2);
            for tail in &tails {
                let mut dropped: Body = prefix.to_vec();
                dropped.extend(tail.iter().cloned());
                variants.push(dropped);

                let mut kept: Body = prefix.to_vec();
                kept.push(body[index].clone());
                kept.extend(tail.iter().cloned());
                variants.push(kept);
            }
            variants
        }
    }
}

/// Generates fresh non-terminals (`N0`, `N1`, ...) for one normalization
/// session, skipping any name the grammar already uses.
struct FreshVariables {
    used: HashSet<String>,
    counter: usize,
}

impl FreshVariables {
    fn for_grammar(grammar: &CFG) -> Self {
        let mut used = HashSet::new();
        used.insert(grammar.start_symbol.name.clone());
        for (head, bodies) in &grammar.productions {
            used.insert(head.name.clone());
            for body in bodies {
                for symbol in body {
                    if let Symbol::V(variable) = symbol {
                        used.insert(variable.name.clone());
                    }
                }
            }
        }
        FreshVariables { used, counter: 0 }
    }

    fn next(&mut self) -> Variable {
        loop {
            let name = format!("N{}", self.counter);
            self.counter += 1;
            if self.used.insert(name.clone()) {
                return Variable::from_string(name);
            }
        }
    }
}
