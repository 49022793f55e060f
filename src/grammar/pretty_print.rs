use std::collections::{BTreeMap, BTreeSet, HashSet};

use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    error::SyntaxError,
    ll1_table::{LL1Entry, LL1Table},
    lr_dfa::{LR0Automaton, LR0Item},
    slr_table::{Action, SLRTable},
    FirstFollow, Grammar, ProductionTable, Step, EPSILON,
};

const EPSILON_DISPLAY: &str = "ε";

fn show(symbol: &str) -> &str {
    if symbol == EPSILON {
        EPSILON_DISPLAY
    } else {
        symbol
    }
}

fn tex(symbol: &str) -> String {
    if symbol == EPSILON {
        "\\epsilon".to_string()
    } else {
        escape::tex(symbol).to_string()
    }
}

/// Pads every column to its widest cell and joins cells with ` | `.
fn align(output: &[Vec<String>]) -> String {
    let columns = output.iter().map(|line| line.len()).max().unwrap_or(0);
    let width: Vec<usize> = (0..columns)
        .map(|j| {
            output
                .iter()
                .filter_map(|line| line.get(j))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    output
        .iter()
        .map(|line| {
            line.iter()
                .enumerate()
                .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.iter().map(|s| show(s)).collect::<Vec<_>>().join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left))
        };
        let right = self
            .rights
            .iter()
            .map(|right| right.iter().map(|s| tex(s)).collect::<Vec<_>>().join(" \\ "))
            .collect::<Vec<_>>()
            .join(" \\mid ");

        left + &right
    }
}

#[derive(Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.chars().count())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex(true)))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let productions = self
            .non_terminal_iter()
            .map(|left| ProductionOutput {
                left,
                rights: self
                    .productions_of(left)
                    .iter()
                    .map(|body| body.iter().map(|s| s.as_str()).collect())
                    .collect(),
            })
            .collect();
        ProductionOutputVec { productions }
    }
}

impl ProductionTable {
    /// Numbered production list, the numbers being the ones used by reduce
    /// actions.
    pub fn to_plaintext(&self) -> String {
        self.iter()
            .map(|(n, rule)| {
                let body = rule.body.iter().map(|s| show(s)).collect::<Vec<_>>();
                format!("({}) {} -> {}", n, rule.head, body.join(" "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Serialize)]
struct SymbolOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl SymbolOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "FIRST({}) = {{{}}}, FOLLOW({}) = {{{}}}",
            self.name,
            self.first.iter().map(|s| show(s)).collect::<Vec<_>>().join(", "),
            self.name,
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter().map(|s| tex(s)).collect::<Vec<_>>().join(r"\ ")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Serialize)]
pub struct FirstFollowOutputVec<'a> {
    data: Vec<SymbolOutput<'a>>,
}

impl FirstFollowOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl FirstFollow {
    /// One line per non-terminal, sorted by name.
    pub fn to_output_vec(&self) -> FirstFollowOutputVec {
        let mut data: Vec<SymbolOutput> = self
            .follow
            .iter()
            .map(|(name, follow)| SymbolOutput {
                name: name.as_str(),
                nullable: self.is_nullable(name),
                first: self
                    .first(name)
                    .into_iter()
                    .flatten()
                    .map(|s| s.as_str())
                    .collect(),
                follow: follow.iter().map(|s| s.as_str()).collect(),
            })
            .collect();
        data.sort_by(|a, b| a.name.cmp(b.name));
        FirstFollowOutputVec { data }
    }
}

impl LL1Entry {
    fn to_plaintext(&self, left: &str) -> String {
        match self {
            LL1Entry::Expand(body) => format!(
                "{} -> {}",
                left,
                body.iter().map(|s| show(s)).collect::<Vec<_>>().join(" ")
            ),
            LL1Entry::Sync => "sync".to_string(),
        }
    }

    fn to_latex(&self, left: &str, terminal_set: &HashSet<&str>) -> String {
        match self {
            LL1Entry::Expand(body) => format!(
                "${} \\rightarrow {}$",
                escape::tex(left),
                body.iter()
                    .map(|s| if terminal_set.contains(s.as_str()) {
                        format!("\\text{{{}}}", escape::tex(s))
                    } else {
                        tex(s)
                    })
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            ),
            LL1Entry::Sync => "sync".to_string(),
        }
    }
}

impl LL1Table {
    pub fn to_plaintext(&self) -> String {
        let terminals = self.terminals_in_order();
        let mut header: Vec<String> = vec![String::new()];
        header.extend(terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];

        for (left, row) in self.sorted_rows() {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(terminals.iter().map(|t| {
                row.get(*t)
                    .map(|entry| entry.to_plaintext(left))
                    .unwrap_or_default()
            }));
            output.push(line);
        }

        align(&output)
    }

    pub fn to_latex(&self) -> String {
        let terminals = self.terminals_in_order();
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(terminals.len()),
        )];
        header.extend(
            terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape::tex(t))),
        );
        let header = header.join(" & ");

        let terminal_set: HashSet<&str> = terminals.iter().cloned().collect();
        let mut output: Vec<String> = Vec::new();
        for (left, row) in self.sorted_rows() {
            let mut line: Vec<String> = vec![escape::tex(left).to_string()];
            line.extend(terminals.iter().map(|t| {
                row.get(*t)
                    .map(|entry| entry.to_latex(left, &terminal_set))
                    .unwrap_or_default()
            }));
            output.push(line.join(" & "));
        }

        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }

    /// Column order fixed by `LL1Table::new`: terminals as the grammar
    /// lists them, `$` last.
    fn terminals_in_order(&self) -> Vec<&str> {
        self.terminals.iter().map(|t| t.as_str()).collect()
    }

    fn sorted_rows(&self) -> Vec<(&str, &BTreeMap<String, LL1Entry>)> {
        let mut rows: Vec<_> = self.rows.iter().map(|(k, v)| (k.as_str(), v)).collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows
    }
}

impl LR0Automaton {
    pub fn item_to_plaintext(&self, item: &LR0Item) -> String {
        let rule = match self.rule(item) {
            Some(rule) => rule,
            None => return String::new(),
        };
        let mut right: Vec<&str> = rule.symbols.iter().map(|s| s.as_str()).collect();
        right.insert(item.position.min(right.len()), ".");
        format!("{} -> {}", rule.head, right.join(" "))
    }

    pub fn item_to_latex(&self, item: &LR0Item) -> String {
        let rule = match self.rule(item) {
            Some(rule) => rule,
            None => return String::new(),
        };
        let mut right: Vec<String> = rule.symbols.iter().map(|s| tex(s)).collect();
        right.insert(item.position.min(right.len()), ".".to_string());
        format!("${} \\rightarrow {}$", escape::tex(&rule.head), right.join(" "))
    }

    pub fn to_plaintext(&self) -> String {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| {
                let items = state
                    .items
                    .iter()
                    .map(|item| self.item_to_plaintext(item))
                    .collect::<Vec<_>>()
                    .join("\n");
                let edges = if state.edges.is_empty() {
                    String::new()
                } else {
                    format!(
                        "\n===\n{}",
                        state
                            .edges
                            .iter()
                            .map(|(k, v)| format!("- {} -> {}", k, v))
                            .collect::<Vec<_>>()
                            .join("\n")
                    )
                };
                format!("I{}\n{}{}", i, items, edges)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn to_latex(&self) -> String {
        let nodes = self.states.iter().enumerate().map(|(id, state)| {
            let content = state
                .items
                .iter()
                .map(|item| self.item_to_latex(item))
                .collect::<Vec<_>>()
                .join(" \\\\ \n");
            format!(
                "\\node [block] (I_{}){}\n{{\n$I_{}$\\\\\n{}\n}};",
                id,
                if id == 0 {
                    String::new()
                } else if id % 2 == 0 {
                    format!(" [below of = I_{}] ", id - 2)
                } else {
                    format!(" [right of = I_{}] ", id - 1)
                },
                id,
                content
            )
        });
        let edges = self.states.iter().enumerate().flat_map(|(id, state)| {
            state.edges.iter().map(move |(e, v)| {
                format!(
                    "\\path [->] (I_{}) edge {} node [above]{{{}}} (I_{});",
                    id,
                    if id == *v { "[loop left]" } else { "[right]" },
                    escape::tex(e),
                    v
                )
            })
        });
        format!(
            "\\begin{{tikzpicture}}[node distance=5cm,block/.style={{state, rectangle, text width=6em}}]\n{}\n\\end{{tikzpicture}}",
            nodes.chain(edges).collect::<Vec<_>>().join("\n")
        )
    }

    pub fn to_output_vec(&self) -> Vec<LR0StateOutput> {
        self.states
            .iter()
            .map(|state| LR0StateOutput {
                items: state
                    .items
                    .iter()
                    .map(|item| self.item_to_plaintext(item))
                    .collect(),
                edges: state.edges.clone(),
            })
            .collect()
    }
}

#[derive(Serialize)]
pub struct LR0StateOutput {
    items: Vec<String>,
    edges: BTreeMap<String, usize>,
}

impl Action {
    pub fn to_latex(&self) -> String {
        match self {
            Action::Shift(s) => format!("shift {}", s),
            Action::Reduce(r) => format!("reduce {}", r),
            Action::Accept => "accept".to_string(),
        }
    }
}

impl SLRTable {
    pub fn to_plaintext(&self) -> String {
        let non_terminals = self.sorted_non_terminals();
        let mut output: Vec<Vec<String>> = Vec::new();

        output.push(vec![String::new()]);
        for s in self.terminals.iter().map(|s| s.as_str()).chain(non_terminals.iter().cloned()) {
            output[0].push(s.to_string());
        }

        for (i, (r1, r2)) in self.action.iter().zip(self.goto.iter()).enumerate() {
            let row: Vec<String> = std::iter::once(i.to_string())
                .chain(
                    self.terminals
                        .iter()
                        .map(|t| r1.get(t).map(|a| a.to_string()).unwrap_or_default()),
                )
                .chain(
                    non_terminals
                        .iter()
                        .map(|nt| r2.get(*nt).map(|s| s.to_string()).unwrap_or_default()),
                )
                .collect();
            output.push(row);
        }

        align(&output)
    }

    pub fn to_latex(&self) -> String {
        let non_terminals = self.sorted_non_terminals();
        let header: String = format!(
            "\\begin{{tabular}}{{c{}}}\n & \\multicolumn{{{}}}{{c}}{{action}} & \\multicolumn{{{}}}{{|c}}{{goto}}\\\\",
            "|l".repeat(self.terminals.len() + non_terminals.len()),
            self.terminals.len(),
            non_terminals.len(),
        );

        let mut first_row: Vec<String> = vec![String::new()];
        for s in self.terminals.iter().map(|s| s.as_str()).chain(non_terminals.iter().cloned()) {
            first_row.push(escape::tex(s).to_string());
        }
        let first_row = first_row.join(" & ");

        let content = self
            .action
            .iter()
            .zip(self.goto.iter())
            .enumerate()
            .map(|(i, (r1, r2))| {
                std::iter::once(i.to_string())
                    .chain(
                        self.terminals
                            .iter()
                            .map(|t| r1.get(t).map(|a| a.to_latex()).unwrap_or_default()),
                    )
                    .chain(
                        non_terminals
                            .iter()
                            .map(|nt| r2.get(*nt).map(|s| s.to_string()).unwrap_or_default()),
                    )
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join(" \\\\\n");

        format!(
            "{}\n{} \\\\\\hline\n{}\n\\end{{tabular}}",
            header, first_row, content
        )
    }

    fn sorted_non_terminals(&self) -> Vec<&str> {
        self.non_terminals
            .iter()
            .map(|s| s.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Outcome of one parse call, for display.
#[derive(Serialize)]
pub struct ParseOutput<'a> {
    pub parser: &'a str,
    pub accepted: bool,
    pub derivation: Vec<String>,
    pub error: Option<String>,
}

impl<'a> ParseOutput<'a> {
    pub fn new(parser: &'a str, result: &Result<Vec<Step>, SyntaxError>) -> Self {
        match result {
            Ok(steps) => Self {
                parser,
                accepted: true,
                derivation: steps.iter().map(|s| s.to_string()).collect(),
                error: None,
            },
            Err(e) => Self {
                parser,
                accepted: false,
                derivation: e.derivation().iter().map(|s| s.to_string()).collect(),
                error: Some(e.to_string()),
            },
        }
    }

    pub fn to_plaintext(&self) -> String {
        let verdict = match &self.error {
            None => format!("{}: accepted", self.parser),
            Some(e) => format!("{}: rejected ({})", self.parser, e),
        };
        std::iter::once(verdict)
            .chain(self.derivation.iter().map(|s| format!("  {}", s)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let steps = self
            .derivation
            .iter()
            .map(|s| format!("\\item {}", escape::tex(s)))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "\\textbf{{{}}}: {}\n\\begin{{enumerate}}\n{}\n\\end{{enumerate}}",
            escape::tex(self.parser),
            if self.accepted { "accepted" } else { "rejected" },
            steps
        )
    }
}
