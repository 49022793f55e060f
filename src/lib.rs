extern crate wasm_bindgen;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod grammar;
pub mod tokenize;

use grammar::pretty_print::ParseOutput;

pub use grammar::error::{BuildError, ConflictError, GrammarError, SyntaxError};
pub use grammar::{FirstFollow, Grammar, LL1Parser, SLRParser, Step};
pub use tokenize::InputAlphabetError;

fn to_json<T: Serialize>(value: Result<T, String>) -> String {
    match value {
        Ok(v) => serde_json::to_string(&v)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string()),
        Err(e) => serde_json::json!({ "error": e }).to_string(),
    }
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    to_json(
        Grammar::parse(grammar)
            .map_err(|e| e.to_string())
            .map(|g| FirstFollow::new(&g)),
    )
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    to_json(
        Grammar::parse(grammar)
            .map_err(BuildError::from)
            .and_then(|g| LL1Parser::new(&g))
            .map(|p| p.table().clone())
            .map_err(|e| e.to_string()),
    )
}

#[wasm_bindgen]
pub fn slr_table_to_json(grammar: &str) -> String {
    to_json(
        Grammar::parse(grammar)
            .map_err(BuildError::from)
            .and_then(|g| SLRParser::new(&g))
            .map(|p| p.table().clone())
            .map_err(|e| e.to_string()),
    )
}

/// Parses `input` (one token per character) with the parser named by
/// `parser`, `"ll1"` or `"slr"`.
#[wasm_bindgen]
pub fn parse_to_json(grammar: &str, parser: &str, input: &str) -> String {
    let run = || -> Result<ParseOutput<'static>, String> {
        let g = Grammar::parse(grammar).map_err(|e| e.to_string())?;
        let tokens = tokenize::tokenize_chars(input).map_err(|e| e.to_string())?;
        match parser {
            "ll1" => {
                let p = LL1Parser::new(&g).map_err(|e| e.to_string())?;
                Ok(ParseOutput::new("LL(1)", &p.parse(&tokens)))
            }
            "slr" => {
                let p = SLRParser::new(&g).map_err(|e| e.to_string())?;
                Ok(ParseOutput::new("SLR(1)", &p.parse(&tokens)))
            }
            other => Err(format!("unknown parser `{}`", other)),
        }
    };
    to_json(run())
}



#[cfg(test)]
mod ll1_tests {
    use crate::{
        grammar::ll1_table::LL1Entry, BuildError, ConflictError, Grammar, GrammarError, LL1Parser,
        SyntaxError,
    };

    fn expression() -> LL1Parser {
        LL1Parser::new(&Grammar::parse("E -> T E2\nE2 -> + T E2 | e\nT -> id").unwrap()).unwrap()
    }

    fn steps(derivation: &[crate::Step]) -> Vec<String> {
        derivation.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn leftmost_derivation() {
        let derivation = expression().parse(&["id", "+", "id"]).unwrap();

        assert_eq!(
            steps(&derivation),
            vec![
                "E -> T E2",
                "T -> id",
                "E2 -> + T E2",
                "T -> id",
                "E2 -> e",
            ]
        );
    }

    #[test]
    fn table_cells() {
        let parser = expression();
        let table = parser.table();

        assert_eq!(
            table.get("E", "id"),
            Some(&LL1Entry::Expand(vec!["T".to_string(), "E2".to_string()]))
        );
        assert_eq!(
            table.get("E2", "$"),
            Some(&LL1Entry::Expand(vec!["e".to_string()]))
        );
        assert_eq!(table.get("T", "+"), Some(&LL1Entry::Sync));
        assert_eq!(table.get("T", "$"), Some(&LL1Entry::Sync));
        assert_eq!(table.get("E", "+"), None);
    }

    #[test]
    fn plaintext_columns_end_with_end_mark() {
        let parser = expression();
        let plain = parser.table().to_plaintext();
        let header: Vec<&str> = plain
            .lines()
            .next()
            .unwrap()
            .split('|')
            .map(|s| s.trim())
            .collect();

        assert_eq!(header, vec!["", "+", "id", "$"]);
    }

    #[test]
    fn truncated_input_is_rejected_at_end_mark() {
        let err = expression().parse(&["id", "+"]).unwrap_err();

        match &err {
            SyntaxError::UnexpectedToken {
                position,
                token,
                expected,
                derivation,
            } => {
                assert_eq!(*position, 2);
                assert_eq!(token, "$");
                assert_eq!(expected, &vec!["id".to_string()]);
                assert_eq!(
                    steps(derivation),
                    vec!["E -> T E2", "T -> id", "E2 -> + T E2"]
                );
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn terminal_mismatch() {
        let parser =
            LL1Parser::new(&Grammar::parse("S -> ( S ) | x").unwrap()).unwrap();
        let err = parser.parse(&["(", "x", "x"]).unwrap_err();

        assert_eq!(
            err,
            SyntaxError::Mismatch {
                position: 2,
                expected: ")".to_string(),
                token: "x".to_string(),
                derivation: vec![
                    crate::Step::new("S", &["(".to_string(), "S".to_string(), ")".to_string()]),
                    crate::Step::new("S", &["x".to_string()]),
                ],
            }
        );
    }

    #[test]
    fn trailing_input_is_rejected() {
        let err = expression().parse(&["id", "id"]).unwrap_err();

        assert_eq!(err.position(), Some(1));
        assert_eq!(err.token(), Some("id"));
    }

    #[test]
    fn empty_input() {
        let parser = LL1Parser::new(&Grammar::parse("S -> a S | e").unwrap()).unwrap();

        assert_eq!(steps(&parser.parse::<&str>(&[]).unwrap()), vec!["S -> e"]);
    }

    #[test]
    fn common_prefix_conflict() {
        let err = LL1Parser::new(&Grammar::parse("S -> a | a b").unwrap()).unwrap_err();

        match err {
            BuildError::Conflict(ConflictError::LL1 {
                non_terminal,
                terminal,
                ..
            }) => {
                assert_eq!(non_terminal, "S");
                assert_eq!(terminal, "a");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn left_recursion_conflict() {
        let err = LL1Parser::new(&Grammar::parse("E -> E + T | T\nT -> id").unwrap()).unwrap_err();

        assert!(matches!(
            err,
            BuildError::Conflict(ConflictError::LL1 { ref non_terminal, ref terminal, .. })
                if non_terminal == "E" && terminal == "id"
        ));
    }

    #[test]
    fn epsilon_follow_conflict() {
        let err = LL1Parser::new(&Grammar::parse("S -> A a\nA -> a | e").unwrap()).unwrap_err();

        assert!(matches!(
            err,
            BuildError::Conflict(ConflictError::LL1 { ref non_terminal, ref terminal, .. })
                if non_terminal == "A" && terminal == "a"
        ));
    }

    #[test]
    fn empty_grammar_is_rejected() {
        assert_eq!(
            LL1Parser::new(&Grammar::new()).unwrap_err(),
            BuildError::Grammar(GrammarError::Empty)
        );
    }

    #[test]
    fn parses_are_independent() {
        let parser = expression();

        assert!(parser.parse(&["+"]).is_err());
        assert!(parser.parse(&["id"]).is_ok());
    }
}

#[cfg(test)]
mod slr_tests {
    use crate::{
        grammar::{lr_dfa::LR0Automaton, slr_table::Action},
        BuildError, ConflictError, Grammar, LL1Parser, SLRParser, SyntaxError,
    };

    fn steps(derivation: &[crate::Step]) -> Vec<String> {
        derivation.iter().map(|s| s.to_string()).collect()
    }

    fn left_recursive() -> Grammar {
        Grammar::parse("E -> E + T | T\nT -> id").unwrap()
    }

    #[test]
    fn reduction_order() {
        let parser = SLRParser::new(&left_recursive()).unwrap();
        let derivation = parser.parse(&["id", "+", "id"]).unwrap();

        assert_eq!(
            steps(&derivation),
            vec!["T -> id", "E -> T", "T -> id", "E -> E + T"]
        );
        assert_eq!(derivation.last().unwrap().head, "E");
    }

    #[test]
    fn canonical_collection() {
        let automaton = LR0Automaton::new(&left_recursive()).unwrap();

        assert_eq!(automaton.states.len(), 6);
        assert_eq!(automaton.rules.augmented().head, "E'");
        assert_eq!(automaton.states[0].items.len(), 4);
    }

    #[test]
    fn closure_and_goto() {
        let automaton = LR0Automaton::new(&left_recursive()).unwrap();
        let start = &automaton.states[0].items;

        assert_eq!(automaton.closure(start.clone()), *start);
        assert!(automaton.goto(start, "+").is_none());

        let on_e = automaton.goto(start, "E").unwrap();
        let index = automaton.goto_state(0, "E").unwrap();
        assert_eq!(automaton.states[index].items, on_e);
    }

    #[test]
    fn table_actions() {
        let parser = SLRParser::new(&left_recursive()).unwrap();
        let table = parser.table();
        let on_e = parser.automaton().goto_state(0, "E").unwrap();
        let on_id = parser.automaton().goto_state(0, "id").unwrap();
        let t_id = parser.rules().number_of("T", &["id"]).unwrap();

        assert_eq!(table.action(on_e, "$"), Some(Action::Accept));
        assert_eq!(table.action(0, "id"), Some(Action::Shift(on_id)));
        assert_eq!(table.action(on_id, "+"), Some(Action::Reduce(t_id)));
        assert_eq!(table.action(on_id, "$"), Some(Action::Reduce(t_id)));
        assert_eq!(table.goto(0, "E"), Some(on_e));
        assert_eq!(table.action(0, "+"), None);
    }

    #[test]
    fn production_numbers_follow_declaration_order() {
        let g = Grammar::parse("S -> B A\nB -> b\nA -> a | e").unwrap();
        let first = SLRParser::new(&g).unwrap();
        let second = SLRParser::new(&g).unwrap();

        for parser in [&first, &second] {
            let rules = parser.rules();
            assert_eq!(rules.number_of("S", &["B", "A"]), Some(1));
            assert_eq!(rules.number_of("B", &["b"]), Some(2));
            assert_eq!(rules.number_of("A", &["a"]), Some(3));
            assert_eq!(rules.number_of("A", &["e"]), Some(4));
            assert_eq!(rules.get(4).unwrap().to_string(), "A -> e");
        }
        assert_eq!(first.table().action, second.table().action);
    }

    #[test]
    fn epsilon_production_reduces_without_popping() {
        let parser = SLRParser::new(&Grammar::parse("S -> a S | e").unwrap()).unwrap();

        assert_eq!(
            steps(&parser.parse(&["a", "a"]).unwrap()),
            vec!["S -> e", "S -> a S", "S -> a S"]
        );
        assert_eq!(steps(&parser.parse::<&str>(&[]).unwrap()), vec!["S -> e"]);
    }

    #[test]
    fn rejection_reports_state() {
        let parser = SLRParser::new(&left_recursive()).unwrap();
        let err = parser.parse(&["id", "+"]).unwrap_err();
        let after_plus = parser
            .automaton()
            .goto_state(parser.automaton().goto_state(0, "E").unwrap(), "+")
            .unwrap();

        match err {
            SyntaxError::NoAction {
                position,
                state,
                token,
                expected,
                derivation,
            } => {
                assert_eq!(position, 2);
                assert_eq!(state, after_plus);
                assert_eq!(token, "$");
                assert_eq!(expected, vec!["id".to_string()]);
                assert_eq!(steps(&derivation), vec!["T -> id", "E -> T"]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn shift_reduce_conflict_is_reported() {
        let g = Grammar::parse("S -> L = R | R\nL -> * R | id\nR -> L").unwrap();
        let err = SLRParser::new(&g).unwrap_err();

        match err {
            BuildError::Conflict(ConflictError::Slr {
                terminal,
                existing,
                incoming,
                ..
            }) => {
                assert_eq!(terminal, "=");
                assert!(existing.starts_with('r'));
                assert!(incoming.starts_with('s'));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn ambiguous_grammar_is_rejected() {
        let err = SLRParser::new(&Grammar::parse("E -> E + E | id").unwrap()).unwrap_err();

        assert!(matches!(
            err,
            BuildError::Conflict(ConflictError::Slr { ref terminal, .. }) if terminal == "+"
        ));
    }

    #[test]
    fn ll1_but_not_slr1() {
        let g = Grammar::parse("S -> A a A b | B b B a\nA -> e\nB -> e").unwrap();

        assert!(LL1Parser::new(&g).is_ok());
        assert!(matches!(
            SLRParser::new(&g).unwrap_err(),
            BuildError::Conflict(ConflictError::Slr { state: 0, .. })
        ));
    }

    #[test]
    fn larger_automaton() {
        let g = Grammar::parse(
            "E -> E + T | E - T | T
             T -> T * F | T / F | F
             F -> ( E ) | [ E ] | id | num | - F",
        )
        .unwrap();
        let parser = SLRParser::new(&g).unwrap();

        assert!(parser.automaton().states.len() > 20);
        let tokens = ["(", "id", "+", "num", ")", "*", "-", "[", "id", "]", "/", "id"];
        let derivation = parser.parse(&tokens).unwrap();
        assert_eq!(derivation.last().unwrap().to_string(), "E -> T");
    }
}

#[cfg(test)]
mod tokenize_tests {
    use crate::{
        tokenize::{tokenize_chars, tokenize_words},
        Grammar, InputAlphabetError,
    };

    #[test]
    fn single_characters() {
        assert_eq!(
            tokenize_chars("a + (b)").unwrap(),
            vec!["a", "+", "(", "b", ")"]
        );
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        assert_eq!(
            tokenize_chars("a#b"),
            Err(InputAlphabetError::UnexpectedCharacter { ch: '#', position: 1 })
        );
    }

    #[test]
    fn words_must_be_terminals() {
        let g = Grammar::parse("E -> T E2\nE2 -> + T E2 | e\nT -> id").unwrap();

        assert_eq!(tokenize_words("id + id", &g).unwrap(), vec!["id", "+", "id"]);
        assert_eq!(
            tokenize_words("id + T", &g),
            Err(InputAlphabetError::UnknownTerminal {
                token: "T".to_string(),
                position: 2
            })
        );
    }
}

#[cfg(test)]
mod json_tests {
    #[test]
    fn first_follow_json() {
        let json: serde_json::Value =
            serde_json::from_str(&crate::first_follow_to_json("S -> a S | e")).unwrap();

        assert_eq!(json["first"]["S"], serde_json::json!(["a", "e"]));
        assert_eq!(json["follow"]["S"], serde_json::json!(["$"]));
    }

    #[test]
    fn conflict_is_reported_as_error() {
        let json: serde_json::Value =
            serde_json::from_str(&crate::ll1_table_to_json("S -> a | a b")).unwrap();

        assert!(json["error"].as_str().unwrap().contains("LL(1) conflict"));
    }

    #[test]
    fn parse_json() {
        let json: serde_json::Value = serde_json::from_str(&crate::parse_to_json(
            "E -> E + T | T\nT -> a",
            "slr",
            "a+a",
        ))
        .unwrap();

        assert_eq!(json["accepted"], serde_json::json!(true));
        assert_eq!(json["derivation"][0], serde_json::json!("T -> a"));
    }
}
