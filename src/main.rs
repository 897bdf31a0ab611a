use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use langcheck::cfg::cfg::CFG;
use langcheck::cfg::production::{Production, Symbol};
use langcheck::cfg::variable::Variable;
use langcheck::language::Language;
use langcheck::regex::postfix::postfix_to_dfa;

/// Reads a grammar file: the first line holds the rule count (ignored, the
/// reader consumes whatever lines remain), each following line is
/// `LHS [sym ...]` and an absent RHS is an epsilon production. The first
/// rule's left-hand side is the start symbol.
fn read_grammar(path: &str) -> Result<CFG, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines();
    lines.next(); // rule count

    let mut start_symbol: Option<Variable> = None;
    let mut productions = Vec::new();
    for line in lines {
        let mut tokens = line.split_whitespace();
        let head = match tokens.next() {
            Some(token) => Variable::new(token),
            None => continue,
        };
        if start_symbol.is_none() {
            start_symbol = Some(head.clone());
        }
        let body = tokens.map(Symbol::parse).collect::<Result<Vec<_>, _>>()?;
        productions.push(Production::new(head, body));
    }
    let start_symbol = start_symbol.ok_or("grammar file contains no rules")?;
    Ok(CFG::from_start_and_productions(start_symbol, productions)?)
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let dfa = postfix_to_dfa(&args[1])?;
    let grammar = read_grammar(&args[2])?;
    let num_words: usize = args[3].parse()?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for _ in 0..num_words {
        let word = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let word = word.trim();
        let member = grammar.accepts_string(word) && dfa.accepts_string(word);
        writeln!(out, "{}", if member { "YES" } else { "NO" })?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("usage: langcheck <postfix-regex> <grammar-file> <num-words>");
        return ExitCode::FAILURE;
    }
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}
