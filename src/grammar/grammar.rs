use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use super::{error::GrammarError, END_MARK, EPSILON, EPSILON_ALIASES};

/// A context-free grammar. Non-terminals and their productions keep the
/// order in which they were declared; that order defines the production
/// numbers used by the SLR(1) table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    productions: IndexMap<String, Vec<Vec<String>>>,
    start_symbol: Option<String>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `head -> body`. The first head ever added becomes the start
    /// symbol unless one was set explicitly. An empty body is stored as the
    /// epsilon production, and every spelling in `EPSILON_ALIASES` is
    /// stored as `EPSILON`.
    pub fn add_production<S: AsRef<str>>(&mut self, head: &str, body: &[S]) {
        let head = normalize_epsilon(head);
        let body: Vec<String> = if body.is_empty() {
            vec![EPSILON.to_string()]
        } else {
            body.iter()
                .map(|s| normalize_epsilon(s.as_ref()).to_string())
                .collect()
        };
        if self.start_symbol.is_none() {
            self.start_symbol = Some(head.to_string());
        }
        self.productions
            .entry(head.to_string())
            .or_insert_with(Vec::new)
            .push(body);
    }

    pub fn set_start_symbol(&mut self, name: &str) -> Result<(), GrammarError> {
        if !self.is_non_terminal(name) {
            return Err(GrammarError::UnknownStartSymbol(name.to_string()));
        }
        self.start_symbol = Some(name.to_string());
        Ok(())
    }

    pub fn start_symbol(&self) -> Option<&str> {
        self.start_symbol.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.productions.contains_key(name)
    }

    pub fn is_terminal(&self, name: &str) -> bool {
        name != EPSILON && name != END_MARK && !self.is_non_terminal(name)
    }

    /// Non-terminals in declaration order.
    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &str> {
        self.productions.keys().map(|k| k.as_str())
    }

    /// Terminals in sorted order, without `$`.
    pub fn terminal_iter(&self) -> impl Iterator<Item = &str> {
        self.productions
            .values()
            .flatten()
            .flatten()
            .map(|s| s.as_str())
            .filter(|s| self.is_terminal(s))
            .collect::<BTreeSet<_>>()
            .into_iter()
    }

    pub fn productions_of(&self, head: &str) -> &[Vec<String>] {
        self.productions
            .get(head)
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }

    /// Every `(head, body)` pair in declaration order.
    pub fn production_iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.productions.iter().flat_map(|(head, bodies)| {
            bodies
                .iter()
                .map(move |body| (head.as_str(), body.as_slice()))
        })
    }

    /// Appends `'` to `name` until it no longer collides with a grammar symbol.
    pub fn get_symbol_prime_name(&self, mut name: String) -> String {
        let used: BTreeSet<&str> = self
            .productions
            .keys()
            .map(|k| k.as_str())
            .chain(self.terminal_iter())
            .collect();
        while used.contains(name.as_str()) {
            name.push('\'');
        }
        name
    }

    /// Checks what every construction step relies on: a start symbol that
    /// is a non-terminal, no `$` inside a body and no production for
    /// epsilon.
    pub fn validate(&self) -> Result<&str, GrammarError> {
        if self.is_empty() {
            return Err(GrammarError::Empty);
        }
        if self.is_non_terminal(EPSILON) {
            return Err(GrammarError::ReservedSymbol(EPSILON.to_string()));
        }
        if self.is_non_terminal(END_MARK)
            || self
                .production_iter()
                .any(|(_, body)| body.iter().any(|s| s == END_MARK))
        {
            return Err(GrammarError::ReservedSymbol(END_MARK.to_string()));
        }
        match self.start_symbol() {
            None => Err(GrammarError::NoStartSymbol),
            Some(s) if !self.is_non_terminal(s) => {
                Err(GrammarError::UnknownStartSymbol(s.to_string()))
            }
            Some(s) => Ok(s),
        }
    }
}

fn normalize_epsilon(symbol: &str) -> &str {
    if EPSILON_ALIASES.contains(&symbol) {
        EPSILON
    } else {
        symbol
    }
}

/// One numbered production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub head: String,
    /// Body as declared, epsilon included.
    pub body: Vec<String>,
    /// Body with epsilon symbols removed; this is what items walk over and
    /// what a reduce pops.
    pub symbols: Vec<String>,
}

impl Rule {
    fn new(head: &str, body: &[String]) -> Self {
        Self {
            head: head.to_string(),
            body: body.to_vec(),
            symbols: body.iter().filter(|s| *s != EPSILON).cloned().collect(),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.head, self.body.join(" "))
    }
}

/// Production numbering in both directions. Rule 0 is the augmented
/// `S' -> S`; declared productions are numbered from 1 in declaration order.
#[derive(Debug, Clone)]
pub struct ProductionTable {
    rules: Vec<Rule>,
    numbers: HashMap<(String, Vec<String>), usize>,
    by_head: IndexMap<String, Vec<usize>>,
}

impl ProductionTable {
    pub fn new(grammar: &Grammar) -> Result<Self, GrammarError> {
        let start = grammar.validate()?;
        let augmented = grammar.get_symbol_prime_name(start.to_string());

        let mut table = Self {
            rules: vec![Rule::new(&augmented, &[start.to_string()])],
            numbers: HashMap::new(),
            by_head: IndexMap::new(),
        };
        for (head, body) in grammar.production_iter() {
            let n = table.rules.len();
            table.rules.push(Rule::new(head, body));
            table
                .numbers
                .entry((head.to_string(), body.to_vec()))
                .or_insert(n);
            table.by_head.entry(head.to_string()).or_default().push(n);
        }
        Ok(table)
    }

    pub fn augmented(&self) -> &Rule {
        &self.rules[0]
    }

    pub fn get(&self, number: usize) -> Option<&Rule> {
        self.rules.get(number)
    }

    pub fn number_of<S: AsRef<str>>(&self, head: &str, body: &[S]) -> Option<usize> {
        let body: Vec<String> = body.iter().map(|s| s.as_ref().to_string()).collect();
        self.numbers.get(&(head.to_string(), body)).cloned()
    }

    /// Numbers of the productions whose head is `head`.
    pub fn rules_of(&self, head: &str) -> &[usize] {
        self.by_head.get(head).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Declared rules with their numbers, rule 0 excluded.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Rule)> {
        self.rules.iter().enumerate().skip(1)
    }

    pub fn len(&self) -> usize {
        self.rules.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
