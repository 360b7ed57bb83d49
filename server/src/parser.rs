//! Command-grammar parser turning raw player input into matched verbs.
//!
//! A [`Verb`] owns one canonical [`Pattern`] plus any number of alias
//! patterns. A pattern is an ordered sequence of [`Part`]s: literal words
//! that must match exactly, variables capturing exactly one token, and an
//! optional trailing remainder capturing everything left on the line.
//!
//! [`Parser::parse`] tries verbs in declaration order and the first match
//! wins, which makes declaration order the priority policy: a short
//! literal-only command must be declared before any longer pattern sharing
//! its prefix would shadow it. A failed match is an ordinary `None`, never
//! an error that escapes the parser.

use std::collections::HashMap;

/// One element of a command pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// A word the input token must equal exactly.
    Literal(&'static str),
    /// Captures exactly one token under the given name.
    Variable(&'static str),
    /// Captures all remaining tokens, joined with single spaces. Must be
    /// the final part of its pattern and requires at least one token.
    Remainder(&'static str),
}

/// Shorthand for [`Part::Literal`].
pub fn lit(word: &'static str) -> Part {
    Part::Literal(word)
}

/// Shorthand for [`Part::Variable`].
pub fn var(name: &'static str) -> Part {
    Part::Variable(name)
}

/// Shorthand for [`Part::Remainder`].
pub fn rest(name: &'static str) -> Part {
    Part::Remainder(name)
}

/// Variable and remainder values captured by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures(HashMap<&'static str, String>);

impl Captures {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    fn insert(&mut self, name: &'static str, value: String) {
        self.0.insert(name, value);
    }
}

/// An ordered sequence of parts matched positionally against input tokens.
#[derive(Debug, Clone)]
pub struct Pattern {
    parts: Vec<Part>,
}

impl Pattern {
    pub fn new(parts: Vec<Part>) -> Self {
        debug_assert!(
            parts
                .iter()
                .position(|p| matches!(p, Part::Remainder(_)))
                .map_or(true, |i| i == parts.len() - 1),
            "remainder must be the final pattern part"
        );
        Self { parts }
    }

    /// Matches the pattern against a tokenized command line.
    ///
    /// Without a remainder, the token count must equal the pattern length.
    /// With one, the tokens must at least reach the remainder so it always
    /// captures something. Any literal mismatch fails the whole pattern.
    pub fn matches(&self, tokens: &[&str]) -> Option<Captures> {
        let remainder_at = self
            .parts
            .iter()
            .position(|p| matches!(p, Part::Remainder(_)));

        match remainder_at {
            None if tokens.len() != self.parts.len() => return None,
            Some(at) if tokens.len() <= at => return None,
            _ => {}
        }

        let mut captures = Captures::default();
        for (index, part) in self.parts.iter().enumerate() {
            match *part {
                Part::Literal(word) => {
                    if tokens.get(index).copied() != Some(word) {
                        return None;
                    }
                }
                Part::Variable(name) => {
                    captures.insert(name, tokens.get(index)?.to_string());
                }
                Part::Remainder(name) => {
                    captures.insert(name, tokens[index..].join(" "));
                    break;
                }
            }
        }
        Some(captures)
    }

    /// First literal word of the pattern, if it starts with one.
    pub fn first_word(&self) -> Option<&'static str> {
        match self.parts.first() {
            Some(&Part::Literal(word)) => Some(word),
            _ => None,
        }
    }

    /// Renders the pattern the way the help text displays it,
    /// e.g. `set name to [name]`.
    pub fn render(&self) -> String {
        let words: Vec<String> = self
            .parts
            .iter()
            .map(|part| match part {
                Part::Literal(word) => (*word).to_string(),
                Part::Variable(name) | Part::Remainder(name) => format!("[{name}]"),
            })
            .collect();
        words.join(" ")
    }
}

/// A named command: canonical pattern, alias patterns, help description.
#[derive(Debug, Clone)]
pub struct Verb {
    pattern: Pattern,
    aliases: Vec<Pattern>,
    desc: &'static str,
}

impl Verb {
    pub fn new(parts: Vec<Part>, desc: &'static str) -> Self {
        Self {
            pattern: Pattern::new(parts),
            aliases: Vec::new(),
            desc,
        }
    }

    /// Adds an alternate phrasing. Aliases must capture the same variable
    /// names as the canonical pattern and are tried in declaration order.
    pub fn alias(mut self, parts: Vec<Part>) -> Self {
        self.aliases.push(Pattern::new(parts));
        self
    }

    /// Canonical pattern first, then aliases in order; first success wins.
    pub fn matches(&self, tokens: &[&str]) -> Option<Captures> {
        self.pattern
            .matches(tokens)
            .or_else(|| self.aliases.iter().find_map(|alias| alias.matches(tokens)))
    }

    pub fn first_word(&self) -> Option<&'static str> {
        self.pattern.first_word()
    }

    /// One help line: rendered pattern, then the description.
    pub fn help_line(&self) -> String {
        format!("{} - {}", self.pattern.render(), self.desc)
    }
}

/// Ordered verb registry; declaration order is match priority.
#[derive(Debug, Clone)]
pub struct Parser {
    verbs: Vec<Verb>,
}

impl Parser {
    pub fn new(verbs: Vec<Verb>) -> Self {
        Self { verbs }
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    /// Tokenizes on whitespace and returns the first matching verb's index
    /// with its captures, or `None` when nothing matches (including empty
    /// input).
    pub fn parse(&self, command: &str) -> Option<(usize, Captures)> {
        let tokens: Vec<&str> = command.split_whitespace().collect();
        if tokens.is_empty() {
            return None;
        }
        self.verbs
            .iter()
            .enumerate()
            .find_map(|(index, verb)| verb.matches(&tokens).map(|captures| (index, captures)))
    }

    /// Help lines for every verb whose first literal word is a prefix of
    /// the input, used for "did you mean" output after a failed parse.
    pub fn suggestions(&self, command: &str) -> Vec<String> {
        self.verbs
            .iter()
            .filter(|verb| {
                verb.first_word()
                    .is_some_and(|word| command.starts_with(word))
            })
            .map(Verb::help_line)
            .collect()
    }

    pub fn help_lines(&self) -> Vec<String> {
        self.verbs.iter().map(Verb::help_line).collect()
    }
}
