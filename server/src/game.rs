//! Game composition: one [`World`], one map display, one pluggable rules
//! policy, and the dispatch from typed commands to state-machine methods.

use std::fmt;

use crate::command::{Command, CommandSet, ParseOutcome};
use crate::maps::GameMap;
use crate::player::WeaponFactory;
use crate::world::World;

/// A win-condition policy, evaluated once per server tick independent of
/// any session's I/O readiness.
pub trait GameRules: fmt::Debug + Send {
    fn name(&self) -> &str;

    /// The text the `rules` command prints.
    fn rules(&self) -> &str;

    /// Called once per tick, before player updates and command dispatch.
    fn tick(&self, world: &mut World);
}

/// First to a fixed number of kills wins; the match then resets in place:
/// every player's stats are zeroed and everyone respawns, and the server
/// keeps running.
#[derive(Debug)]
pub struct Deathmatch {
    max_kills: u32,
    rules_text: String,
}

impl Deathmatch {
    pub fn new(max_kills: u32) -> Self {
        Self {
            max_kills,
            rules_text: format!("First to {max_kills} kills."),
        }
    }
}

impl GameRules for Deathmatch {
    fn name(&self) -> &str {
        "Deathmatch"
    }

    fn rules(&self) -> &str {
        &self.rules_text
    }

    fn tick(&self, world: &mut World) {
        if self.max_kills == 0 {
            return;
        }
        let winner = world.player_names().into_iter().find(|name| {
            world
                .player(name)
                .is_some_and(|player| player.kills >= self.max_kills)
        });
        if let Some(winner) = winner {
            world.log_to(&winner, "Congratulations, you win!");
            world.broadcast(&format!("{winner} is the winner!"), Some(&winner));
            world.reset_match();
        }
    }
}

/// Everything one running game owns.
#[derive(Debug)]
pub struct Game {
    world: World,
    commands: CommandSet,
    rules: Box<dyn GameRules>,
    map_name: String,
    map_display: String,
}

impl Game {
    pub fn new(map: GameMap, rules: Box<dyn GameRules>, factory: WeaponFactory) -> Self {
        Self {
            world: World::new(map.rooms, factory),
            commands: CommandSet::standard(),
            rules,
            map_name: map.name,
            map_display: map.display,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    /// Runs the rules policy for this tick.
    pub fn tick_rules(&mut self) {
        self.rules.tick(&mut self.world);
    }

    /// Parses and dispatches one line of input from a player.
    ///
    /// Returns the player's new name when the command was an accepted
    /// rename, so the session can rebind; all other output goes to player
    /// log queues.
    pub fn handle_line(&mut self, actor: &str, line: &str) -> Option<String> {
        match self.commands.parse(line) {
            ParseOutcome::Command(command) => self.dispatch(actor, command),
            ParseOutcome::Unknown { suggestions } => {
                for suggestion in suggestions {
                    self.world
                        .log_to(actor, format!("Did you mean '{suggestion}'?"));
                }
                self.world.log_to(actor, format!("Unknown command '{line}'"));
                None
            }
        }
    }

    fn dispatch(&mut self, actor: &str, command: Command) -> Option<String> {
        match command {
            Command::Aim { name } => self.world.aim(actor, &name),
            Command::AimHead { name } => self.world.aim_head(actor, &name),
            Command::Fire => self.world.fire(actor),
            Command::Reload => self.world.reload(actor),
            Command::Go { direction } => self.world.go(actor, &direction),
            Command::Look => self.world.look(actor),
            Command::LookDirection { direction } => self.world.look_direction(actor, &direction),
            Command::Info => self.world.info(actor),
            Command::Stats => self.world.stats(actor),
            Command::Say { message } => self.world.say(actor, &message),
            Command::Tell { name, message } => self.world.tell(actor, &name, &message),
            Command::SetName { name } => return self.world.set_name(actor, &name),
            Command::ListPlayers => self.world.list_players(actor),
            Command::DisplayMap => {
                let display = self.map_display.clone();
                self.world.log_to(actor, display);
            }
            Command::Rules => {
                let text = self.rules.rules().to_string();
                self.world.log_to(actor, text);
            }
            Command::Help => {
                let help = self.commands.help_text().to_string();
                self.world.log_to(actor, help);
            }
        }
        None
    }
}
