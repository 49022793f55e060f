use std::collections::BTreeSet;

use proptest::{collection, prelude::*};

use super::{FirstFollow, Grammar, LL1Parser, SLRParser, END_MARK, EPSILON};

const SYMBOLS: [&str; 8] = ["S", "A", "B", "C", "a", "b", "c", EPSILON];

fn symbols(indices: &[usize]) -> Vec<&'static str> {
    indices.iter().map(|&i| SYMBOLS[i]).collect()
}

/// Small grammars over `S A B C` and `a b c`. A name that never gets a
/// production ends up as a terminal.
fn grammar() -> impl Strategy<Value = Grammar> {
    let body = collection::vec(0..SYMBOLS.len(), 0..4);
    (body.clone(), collection::vec((0..4usize, body), 0..8)).prop_map(|(start_body, rest)| {
        let mut g = Grammar::new();
        g.add_production("S", &symbols(&start_body));
        for (head, body) in rest {
            g.add_production(SYMBOLS[head], &symbols(&body));
        }
        g
    })
}

fn input() -> impl Strategy<Value = Vec<&'static str>> {
    collection::vec(prop::sample::select(vec!["a", "b", "c"]), 0..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn terminals_and_epsilon_start_themselves(g in grammar()) {
        let ff = FirstFollow::new(&g);
        for t in g.terminal_iter() {
            prop_assert_eq!(ff.first(t).cloned(), Some(BTreeSet::from([t.to_string()])));
        }
        prop_assert_eq!(
            ff.first(EPSILON).cloned(),
            Some(BTreeSet::from([EPSILON.to_string()]))
        );
    }

    #[test]
    fn start_is_followed_by_end_mark(g in grammar()) {
        let ff = FirstFollow::new(&g);
        prop_assert!(ff.follow("S").map_or(false, |f| f.contains(END_MARK)));
    }

    #[test]
    fn converged_sets_are_stable(g in grammar()) {
        let ff = FirstFollow::new(&g);
        let mut again = ff.clone();
        again.converge(&g);
        prop_assert_eq!(again, ff);
    }

    #[test]
    fn construction_is_deterministic(g in grammar()) {
        match (SLRParser::new(&g), SLRParser::new(&g)) {
            (Ok(a), Ok(b)) => prop_assert_eq!(&a.table().action, &b.table().action),
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "construction outcome changed"),
        }
        prop_assert_eq!(
            LL1Parser::new(&g).map(|p| p.table().rows.clone()),
            LL1Parser::new(&g).map(|p| p.table().rows.clone())
        );
    }

    #[test]
    fn both_parsers_recognize_the_same_language(g in grammar(), tokens in input()) {
        if let (Ok(ll1), Ok(slr)) = (LL1Parser::new(&g), SLRParser::new(&g)) {
            prop_assert_eq!(ll1.parse(&tokens).is_ok(), slr.parse(&tokens).is_ok());
        }
    }
}
