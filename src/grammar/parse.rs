use super::{error::GrammarError, Grammar};

impl Grammar {
    /// Reads a grammar written as
    ///
    /// ```text
    /// E  -> T E2
    /// E2 -> + T E2
    ///     | e
    /// T  -> id
    /// ```
    ///
    /// Symbols are separated by whitespace. A line starting with `|`
    /// continues the previous left side. `e`, `ε`, `ϵ` and an empty
    /// alternative all denote epsilon. The first left side is the start
    /// symbol.
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let mut g = Self::new();

        let mut raw_productions: Vec<(&str, &str)> = Vec::new();

        let mut previous_left: Option<&str> = None;
        for (i, line) in grammar.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(GrammarError::TooManyArrows(i + 1));
            }
            let (left, rights): (&str, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(GrammarError::EmptyLeft(i + 1));
                } else if left_str.split_whitespace().count() != 1 {
                    return Err(GrammarError::LeftContainsWhitespace(i + 1));
                }
                (left_str, parts[1].trim())
            } else {
                match (previous_left, parts[0].trim().strip_prefix('|')) {
                    (Some(left), Some(rest)) => (left, rest.trim()),
                    _ => return Err(GrammarError::MissingLeft(i + 1)),
                }
            };

            previous_left = Some(left);

            raw_productions.push((left, rights));
        }

        for (left, rights) in raw_productions {
            for right in rights.split('|') {
                let symbols: Vec<&str> = right.split_whitespace().collect();
                g.add_production(left, &symbols);
            }
        }

        if !g.is_empty() {
            g.validate()?;
        }

        Ok(g)
    }
}
