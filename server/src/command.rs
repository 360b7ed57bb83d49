//! The concrete verb table and its typed [`Command`] representation.
//!
//! Parsing yields a verb index plus captures; this module converts that
//! pair into an exhaustive [`Command`] union so dispatch is a plain `match`
//! over typed arguments rather than a lookup by verb name.

use crate::parser::{lit, rest, var, Captures, Parser, Verb};

/// Closing lines of the generated help text.
const HELP_FOOTER: &str = "\
You can only shoot at someone normally in the room you are in, or an adjacent one.
However, you can only shoot someone you are aiming at the head at if they are in the same room they were in when you aimed at them.
Normal shots do 20 damage, and headshots do 40 damage.";

/// Every command a player can issue, with its captured arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Aim { name: String },
    AimHead { name: String },
    Fire,
    Reload,
    Go { direction: String },
    Look,
    LookDirection { direction: String },
    Info,
    Stats,
    Say { message: String },
    Tell { name: String, message: String },
    SetName { name: String },
    ListPlayers,
    DisplayMap,
    Help,
    Rules,
}

/// What one line of input turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Command(Command),
    /// Nothing matched; `suggestions` holds help lines for verbs whose
    /// first word is a prefix of the input.
    Unknown { suggestions: Vec<String> },
}

type Builder = fn(&Captures) -> Option<Command>;

/// The full verb table plus the help text generated from it.
///
/// Declaration order below is match priority and must not be reordered:
/// `aim [name]` precedes `aim [name] head`, and `look` precedes
/// `look [direction]`.
#[derive(Debug, Clone)]
pub struct CommandSet {
    parser: Parser,
    builders: Vec<Builder>,
    help_text: String,
}

impl CommandSet {
    pub fn standard() -> Self {
        let mut verbs: Vec<Verb> = Vec::new();
        let mut builders: Vec<Builder> = Vec::new();

        verbs.push(Verb::new(
            vec![lit("aim"), var("name")],
            "aim at someone's body",
        ));
        builders.push(|c| {
            Some(Command::Aim {
                name: c.get("name")?.to_string(),
            })
        });

        verbs.push(Verb::new(
            vec![lit("aim"), var("name"), lit("head")],
            "aim at someone's head",
        ));
        builders.push(|c| {
            Some(Command::AimHead {
                name: c.get("name")?.to_string(),
            })
        });

        verbs.push(
            Verb::new(vec![lit("fire")], "fire at whoever you are aiming at")
                .alias(vec![lit("shoot")]),
        );
        builders.push(|_| Some(Command::Fire));

        verbs.push(Verb::new(vec![lit("reload")], "reload your gun"));
        builders.push(|_| Some(Command::Reload));

        verbs.push(Verb::new(
            vec![lit("go"), var("direction")],
            "move to an adjacent room",
        ));
        builders.push(|c| {
            Some(Command::Go {
                direction: c.get("direction")?.to_string(),
            })
        });

        verbs.push(Verb::new(
            vec![lit("look")],
            "look at the room you are in",
        ));
        builders.push(|_| Some(Command::Look));

        verbs.push(Verb::new(
            vec![lit("look"), var("direction")],
            "look into an adjacent room",
        ));
        builders.push(|c| {
            Some(Command::LookDirection {
                direction: c.get("direction")?.to_string(),
            })
        });

        verbs.push(Verb::new(
            vec![lit("info")],
            "get info on your health and inventory",
        ));
        builders.push(|_| Some(Command::Info));

        verbs.push(Verb::new(
            vec![lit("stats")],
            "get your kill and death stats",
        ));
        builders.push(|_| Some(Command::Stats));

        verbs.push(Verb::new(
            vec![lit("say"), rest("message")],
            "say something to everyone on the server",
        ));
        builders.push(|c| {
            Some(Command::Say {
                message: c.get("message")?.to_string(),
            })
        });

        verbs.push(Verb::new(
            vec![lit("tell"), var("name"), rest("message")],
            "tell an individual something",
        ));
        builders.push(|c| {
            Some(Command::Tell {
                name: c.get("name")?.to_string(),
                message: c.get("message")?.to_string(),
            })
        });

        verbs.push(Verb::new(
            vec![lit("set"), lit("name"), lit("to"), var("name")],
            "change your name",
        ));
        builders.push(|c| {
            Some(Command::SetName {
                name: c.get("name")?.to_string(),
            })
        });

        verbs.push(Verb::new(vec![lit("list")], "list all online players"));
        builders.push(|_| Some(Command::ListPlayers));

        verbs.push(Verb::new(vec![lit("map")], "display the map"));
        builders.push(|_| Some(Command::DisplayMap));

        verbs.push(Verb::new(vec![lit("help")], "display this"));
        builders.push(|_| Some(Command::Help));

        verbs.push(Verb::new(
            vec![lit("rules")],
            "display the rules of the current game",
        ));
        builders.push(|_| Some(Command::Rules));

        let parser = Parser::new(verbs);
        let mut help_text = parser.help_lines().join("\n");
        help_text.push('\n');
        help_text.push_str(HELP_FOOTER);

        Self {
            parser,
            builders,
            help_text,
        }
    }

    /// Parses one command line into a typed command, or collects the
    /// "did you mean" suggestions for it.
    pub fn parse(&self, line: &str) -> ParseOutcome {
        match self.parser.parse(line) {
            Some((index, captures)) => match self.builders[index](&captures) {
                Some(command) => ParseOutcome::Command(command),
                // A builder only fails if a pattern was declared without
                // the capture it needs, which the tests below rule out.
                None => ParseOutcome::Unknown {
                    suggestions: Vec::new(),
                },
            },
            None => ParseOutcome::Unknown {
                suggestions: self.parser.suggestions(line),
            },
        }
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }
}
