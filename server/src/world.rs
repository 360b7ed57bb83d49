//! The combat state machine: every cross-player operation flows through
//! [`World`], which owns the room registry and the player registry.
//!
//! All mutation happens on the single server loop thread, so operations
//! here are plain `&mut self` methods; a rename or respawn is one atomic
//! step as far as any other player's queries in the same tick can observe.
//!
//! Failures in this module are never errors: an unknown target, an
//! out-of-range shot or a bad direction becomes an informational line on
//! the acting player's log queue and nothing else.

use std::collections::HashMap;

use log::info;

use crate::player::{Aim, AimMode, InjuryCause, InjuryResult, Player, WeaponFactory};
use crate::rooms::{Direction, DirectionLookup, RoomRegistry};

/// Characters a player name may not contain.
const DISALLOWED_NAME_CHARS: &str = "`¬¦!\"£$%^&*()-_=+[{]};:'@#~,<.>/?\\|\n\t ";

/// Room and player registries plus the weapon policy for one running game.
#[derive(Debug)]
pub struct World {
    rooms: RoomRegistry,
    players: HashMap<String, Player>,
    factory: WeaponFactory,
    next_number: u32,
}

impl World {
    pub fn new(rooms: RoomRegistry, factory: WeaponFactory) -> Self {
        Self {
            rooms,
            players: HashMap::new(),
            factory,
            next_number: 0,
        }
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.get_mut(name)
    }

    /// All player names in sorted order.
    pub fn player_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.players.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Creates a player under the smallest free zero-padded numeric name,
    /// spawned in a uniformly random room. Returns the assigned name.
    pub fn spawn_player(&mut self) -> String {
        while self.players.contains_key(&format!("{:03}", self.next_number)) {
            self.next_number += 1;
        }
        let name = format!("{:03}", self.next_number);
        let room = self.rooms.random_room().to_string();
        info!("Player {} spawned in {}", name, room);
        self.players
            .insert(name.clone(), Player::new(&name, &room, self.factory));
        name
    }

    /// Removes a player from the registry. Anyone still aiming at the name
    /// is cleaned up by the next tick's `update_all`.
    pub fn remove_player(&mut self, name: &str) {
        if self.players.remove(name).is_some() {
            info!("Player {} removed", name);
        }
    }

    /// Queues a line on one player's log.
    pub(crate) fn log_to(&mut self, name: &str, message: impl Into<String>) {
        if let Some(player) = self.players.get_mut(name) {
            player.log(message);
        }
    }

    /// Queues a line on every player's log except `exclude`.
    pub fn broadcast(&mut self, message: &str, exclude: Option<&str>) {
        for (name, player) in &mut self.players {
            if Some(name.as_str()) != exclude {
                player.log(message);
            }
        }
    }

    fn broadcast_in_room(&mut self, room: &str, message: &str, exclude: &str) {
        for (name, player) in &mut self.players {
            if player.room == room && name != exclude {
                player.log(message);
            }
        }
    }

    /// Per-tick aim invalidation, run for every player before any command
    /// of the tick is dispatched.
    ///
    /// Head aim breaks when the target's room differs from the snapshot
    /// taken at aim time; body aim breaks when the target leaves the
    /// current room and its four neighbors. A target name that no longer
    /// resolves (the player disconnected) breaks aim the same way.
    pub fn update_all(&mut self) {
        for name in self.player_names() {
            self.update_player(&name);
        }
    }

    fn update_player(&mut self, name: &str) {
        let Some(player) = self.players.get(name) else {
            return;
        };
        let room = player.room.clone();

        match player.aim.clone() {
            Aim::None => {}
            Aim::Head { target, room: snapshot } => {
                let target_room = self.players.get(&target).map(|t| t.room.clone());
                if target_room.as_deref() != Some(snapshot.as_str()) {
                    self.clear_aim(name, "Your target has run out of your sights!");
                }
            }
            Aim::Body { target } => {
                let in_range = self
                    .players
                    .get(&target)
                    .is_some_and(|t| self.rooms.in_range(&room, &t.room));
                if !in_range {
                    self.clear_aim(name, "Your target has run away!");
                }
            }
        }
    }

    fn clear_aim(&mut self, name: &str, message: &str) {
        if let Some(player) = self.players.get_mut(name) {
            player.aim = Aim::None;
            player.log(message);
        }
    }

    /// `aim [name]`: point the gun at someone's body.
    pub fn aim(&mut self, actor: &str, target: &str) {
        self.aim_base(actor, target, AimMode::Body);
    }

    /// `aim [name] head`: point the gun at someone's head, snapshotting
    /// the target's room for displacement detection.
    pub fn aim_head(&mut self, actor: &str, target: &str) {
        self.aim_base(actor, target, AimMode::Head);
    }

    fn aim_base(&mut self, actor: &str, target: &str, mode: AimMode) {
        let Some(actor_room) = self.players.get(actor).map(|p| p.room.clone()) else {
            return;
        };
        let Some(target_room) = self.players.get(target).map(|t| t.room.clone()) else {
            self.log_to(actor, format!("There is nothing called {target}!"));
            return;
        };
        if !self.rooms.in_range(&actor_room, &target_room) {
            self.log_to(actor, format!("{target} is out of range!"));
            return;
        }

        let (aim, message) = match mode {
            AimMode::Body => (
                Aim::Body {
                    target: target.to_string(),
                },
                format!("You point your gun at {target}!"),
            ),
            AimMode::Head => (
                Aim::Head {
                    target: target.to_string(),
                    room: target_room,
                },
                format!("You point your gun at {target}'s head!"),
            ),
        };
        if let Some(player) = self.players.get_mut(actor) {
            player.aim = aim;
            player.log(message);
        }
    }

    /// `fire`: resolve a shot against the current aim target.
    ///
    /// `update_all` has already invalidated stale aim this tick, so an aim
    /// that survives here is trusted; the one remaining hole is a target
    /// that vanished between update and dispatch, which is treated like a
    /// target that ran away.
    pub fn fire(&mut self, actor: &str) {
        let Some(player) = self.players.get(actor) else {
            return;
        };
        let (target, mode) = match player.aim.clone() {
            Aim::None => {
                self.log_to(actor, "You aren't aiming at anything!");
                return;
            }
            Aim::Body { target } => (target, AimMode::Body),
            Aim::Head { target, .. } => (target, AimMode::Head),
        };
        if !self.players.contains_key(&target) {
            self.clear_aim(actor, "Your target has run away!");
            return;
        }

        let Some(shooter) = self.players.get_mut(actor) else {
            return;
        };
        let shooter_room = shooter.room.clone();
        let Some(damage) = shooter.gun.try_fire(mode) else {
            shooter.log("You don't have any ammo!");
            return;
        };

        // The victim's queue sees the hit (and any death) before the
        // shooter's report; observable when shooting yourself.
        let result = self.injure(&target, damage, InjuryCause::Shot);
        self.log_to(actor, format!("You shot {target} for {damage} damage!"));
        self.broadcast_gunfire(&shooter_room, actor);

        if result == InjuryResult::Kill {
            if target == actor {
                // The respawn reset already cleared the aim.
                self.log_to(actor, "You killed yourself!");
            } else if let Some(shooter) = self.players.get_mut(actor) {
                shooter.kills += 1;
                shooter.aim = Aim::None;
                shooter.log(format!("You killed {target}!"));
            }
        }
    }

    /// Gunfire is audible in the shooter's room and every room adjacent
    /// to it, with the direction called out for listeners next door.
    fn broadcast_gunfire(&mut self, shooter_room: &str, shooter: &str) {
        for name in self.player_names() {
            if name == shooter {
                continue;
            }
            let Some(listener_room) = self.players.get(&name).map(|p| p.room.clone()) else {
                continue;
            };
            if listener_room == shooter_room {
                self.log_to(&name, "You hear a loud bang in the room you are in!");
            } else {
                for direction in Direction::ALL {
                    if self.rooms.neighbor(&listener_room, direction) == Some(shooter_room) {
                        self.log_to(
                            &name,
                            format!("You hear a loud bang to the {}!", direction.name()),
                        );
                    }
                }
            }
        }
    }

    /// Applies damage. Death is instantaneous respawn; there is no
    /// intermediate dead state.
    fn injure(&mut self, victim: &str, damage: i32, cause: InjuryCause) -> InjuryResult {
        let Some(player) = self.players.get_mut(victim) else {
            return InjuryResult::NoKill;
        };
        player.health -= damage;
        player.log(format!("You were shot for {damage} damage!"));
        if player.health <= 0 {
            self.die(victim, cause);
            InjuryResult::Kill
        } else {
            InjuryResult::NoKill
        }
    }

    /// Death bookkeeping: one death, a uniformly random respawn room and a
    /// full combat reset.
    fn die(&mut self, victim: &str, _cause: InjuryCause) {
        let room = self.rooms.random_room().to_string();
        let factory = self.factory;
        if let Some(player) = self.players.get_mut(victim) {
            player.log("You were killed!");
            player.deaths += 1;
            player.room = room;
            player.reset(factory);
        }
    }

    /// `reload`: move rounds from the pockets into the gun, reporting the
    /// number actually transferred even when it is zero.
    pub fn reload(&mut self, actor: &str) {
        let Some(player) = self.players.get_mut(actor) else {
            return;
        };
        if player.ammo == 0 {
            player.log("You have no ammo left in your pockets!");
        }
        let transferred = player.gun.reload_from(&mut player.ammo);
        player.log(format!("You reloaded {transferred} bullets!"));
    }

    /// `go [direction]`: move to an adjacent room, announcing footsteps to
    /// the rooms being left and entered.
    pub fn go(&mut self, actor: &str, direction: &str) {
        let Some(actor_room) = self.players.get(actor).map(|p| p.room.clone()) else {
            return;
        };
        let destination = match self.rooms.resolve_direction(direction, &actor_room) {
            DirectionLookup::UnknownDirection => {
                self.log_to(actor, format!("'{direction}' isn't a direction..."));
                return;
            }
            DirectionLookup::NoExit => {
                self.log_to(actor, "You can't go that way!");
                return;
            }
            DirectionLookup::Destination(destination) => destination.to_string(),
        };

        self.broadcast_in_room(&actor_room, "You hear footsteps leaving the room!", actor);
        if let Some(player) = self.players.get_mut(actor) {
            player.room = destination.clone();
        }
        self.log_to(actor, format!("You went {direction}!"));
        self.broadcast_in_room(&destination, "You hear footsteps entering the room!", actor);
    }

    /// `look`: the current room plus its exits in canonical order.
    pub fn look(&mut self, actor: &str) {
        let Some(room_key) = self.players.get(actor).map(|p| p.room.clone()) else {
            return;
        };
        self.describe_room(actor, &room_key);
        for direction in Direction::ALL {
            let label = self
                .rooms
                .neighbor(&room_key, direction)
                .and_then(|key| self.rooms.get(key))
                .map(|room| room.label().to_string());
            if let Some(label) = label {
                self.log_to(
                    actor,
                    format!("To the {} is {}.", direction.name(), label),
                );
            }
        }
    }

    /// `look [direction]`: describe the adjacent room without moving.
    pub fn look_direction(&mut self, actor: &str, direction: &str) {
        let Some(actor_room) = self.players.get(actor).map(|p| p.room.clone()) else {
            return;
        };
        match self.rooms.resolve_direction(direction, &actor_room) {
            DirectionLookup::UnknownDirection => {
                self.log_to(actor, format!("'{direction}' isn't a direction"));
            }
            DirectionLookup::NoExit => {
                self.log_to(actor, "There's nothing in that direction!");
            }
            DirectionLookup::Destination(destination) => {
                let destination = destination.to_string();
                self.describe_room(actor, &destination);
            }
        }
    }

    fn describe_room(&mut self, actor: &str, room_key: &str) {
        let lines = self
            .rooms
            .get(room_key)
            .map(|room| (capitalize(room.label()), room.description().to_string()));
        if let Some((label, description)) = lines {
            self.log_to(actor, label);
            self.log_to(actor, description);
        }
    }

    /// `info`: health and ammunition.
    pub fn info(&mut self, actor: &str) {
        let Some(player) = self.players.get_mut(actor) else {
            return;
        };
        let health = player.health;
        let loaded = player.gun.loaded();
        let reserve = player.ammo;
        player.log(format!("You have {health} health"));
        player.log(format!("{loaded} ammo in your gun"));
        player.log(format!("{reserve} ammo in your pocket"));
    }

    /// `stats`: kills and deaths.
    pub fn stats(&mut self, actor: &str) {
        let Some(player) = self.players.get_mut(actor) else {
            return;
        };
        let kills = player.kills;
        let deaths = player.deaths;
        player.log(format!("{kills} kills"));
        player.log(format!("{deaths} deaths"));
    }

    /// `say [message]`: broadcast to everyone else on the server.
    pub fn say(&mut self, actor: &str, message: &str) {
        self.broadcast(&format!("{actor} said \"{message}\""), Some(actor));
    }

    /// `tell [name] [message]`: a line for one player only.
    pub fn tell(&mut self, actor: &str, name: &str, message: &str) {
        if self.players.contains_key(name) {
            let line = format!("{actor} told you \"{message}\"");
            self.log_to(name, line);
        } else {
            self.log_to(actor, format!("Unknown person '{name}'"));
        }
    }

    /// `set name to [name]`: validated rename.
    ///
    /// The requested name must be free of punctuation and whitespace; it is
    /// then normalized to at most three characters, lowercased and
    /// zero-padded, and rejected if the normalized name is already taken
    /// (including by the actor themselves). Acceptance moves the registry
    /// key and rewrites every other player's aim target in the same step.
    /// Returns the new name so the session can rebind.
    pub fn set_name(&mut self, actor: &str, requested: &str) -> Option<String> {
        if requested
            .chars()
            .any(|c| DISALLOWED_NAME_CHARS.contains(c))
        {
            self.log_to(actor, "Names may not contain punctuation or whitespace!");
            return None;
        }
        let short: String = requested.chars().take(3).collect();
        let new_name = format!("{:0>3}", short.to_lowercase());
        if self.players.contains_key(&new_name) {
            self.log_to(actor, "Someone already has that name!");
            return None;
        }

        let mut player = self.players.remove(actor)?;
        player.name = new_name.clone();
        player.log(format!("Name changed to '{new_name}'!"));
        self.players.insert(new_name.clone(), player);

        for other in self.players.values_mut() {
            match &mut other.aim {
                Aim::Body { target } | Aim::Head { target, .. } if target.as_str() == actor => {
                    *target = new_name.clone();
                }
                _ => {}
            }
        }
        info!("Player {} renamed to {}", actor, new_name);
        Some(new_name)
    }

    /// `list`: every online player by name.
    pub fn list_players(&mut self, actor: &str) {
        self.log_to(actor, "Players:");
        for name in self.player_names() {
            self.log_to(actor, name);
        }
    }

    /// Zeroes every player's stats and respawns them all; used by rule
    /// policies when a match ends.
    pub fn reset_match(&mut self) {
        let factory = self.factory;
        for name in self.player_names() {
            let room = self.rooms.random_room().to_string();
            if let Some(player) = self.players.get_mut(&name) {
                player.kills = 0;
                player.deaths = 0;
                player.room = room;
                player.reset(factory);
                player.log("The game has been reset!");
            }
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{rifle_factory, Rifle, MAX_HEALTH, START_AMMO};
    use crate::rooms::Room;

    /// A west-to-east chain of four rooms: a - b - c - d.
    fn chain_registry() -> RoomRegistry {
        RoomRegistry::new(vec![
            Room::new("a", "room a", "The first room.").east("b"),
            Room::new("b", "room b", "The second room.").west("a").east("c"),
            Room::new("c", "room c", "The third room.").west("b").east("d"),
            Room::new("d", "room d", "The fourth room.").west("c"),
        ])
    }

    /// Two players, "000" and "001", placed in the given rooms.
    fn world_with_two(room0: &str, room1: &str) -> World {
        let mut world = World::new(chain_registry(), rifle_factory);
        let first = world.spawn_player();
        let second = world.spawn_player();
        assert_eq!(first, "000");
        assert_eq!(second, "001");
        world.player_mut("000").unwrap().room = room0.to_string();
        world.player_mut("001").unwrap().room = room1.to_string();
        world.player_mut("000").unwrap().drain_log();
        world.player_mut("001").unwrap().drain_log();
        world
    }

    fn drained(world: &mut World, name: &str) -> Vec<String> {
        world.player_mut(name).unwrap().drain_log()
    }

    #[test]
    fn test_spawn_names_are_sequential_and_rooms_registered() {
        let mut world = World::new(chain_registry(), rifle_factory);
        assert_eq!(world.spawn_player(), "000");
        assert_eq!(world.spawn_player(), "001");
        assert_eq!(world.spawn_player(), "002");
        for name in world.player_names() {
            let room = world.player(&name).unwrap().room.clone();
            assert!(world.rooms().contains(&room));
        }
    }

    #[test]
    fn test_spawn_skips_taken_numeric_names() {
        let mut world = World::new(chain_registry(), rifle_factory);
        world.spawn_player();
        world.spawn_player();
        world.remove_player("000");
        // The counter never reuses numbers already handed out.
        assert_eq!(world.spawn_player(), "002");
    }

    #[test]
    fn test_aim_at_unknown_person() {
        let mut world = world_with_two("a", "b");
        world.aim("000", "zzz");
        assert_eq!(drained(&mut world, "000"), vec!["There is nothing called zzz!"]);
        assert!(world.player("000").unwrap().aim.is_none());
    }

    #[test]
    fn test_aim_out_of_range() {
        let mut world = world_with_two("a", "c");
        world.aim("000", "001");
        assert_eq!(drained(&mut world, "000"), vec!["001 is out of range!"]);
        assert!(world.player("000").unwrap().aim.is_none());
    }

    #[test]
    fn test_aim_at_adjacent_target() {
        let mut world = world_with_two("a", "b");
        world.aim("000", "001");
        assert_eq!(drained(&mut world, "000"), vec!["You point your gun at 001!"]);
        assert_eq!(
            world.player("000").unwrap().aim,
            Aim::Body {
                target: "001".to_string()
            }
        );
    }

    #[test]
    fn test_aim_head_snapshots_room() {
        let mut world = world_with_two("a", "b");
        world.aim_head("000", "001");
        assert_eq!(
            drained(&mut world, "000"),
            vec!["You point your gun at 001's head!"]
        );
        assert_eq!(
            world.player("000").unwrap().aim,
            Aim::Head {
                target: "001".to_string(),
                room: "b".to_string()
            }
        );
    }

    #[test]
    fn test_body_aim_cleared_when_target_leaves_range() {
        let mut world = world_with_two("a", "b");
        world.aim("000", "001");
        drained(&mut world, "000");

        // Two rooms away is out of range.
        world.player_mut("001").unwrap().room = "c".to_string();
        world.update_all();

        assert!(world.player("000").unwrap().aim.is_none());
        assert_eq!(drained(&mut world, "000"), vec!["Your target has run away!"]);

        // Firing after the invalidation is a no-op with its own message.
        world.fire("000");
        assert_eq!(
            drained(&mut world, "000"),
            vec!["You aren't aiming at anything!"]
        );
        assert_eq!(world.player("001").unwrap().health, MAX_HEALTH);
    }

    #[test]
    fn test_body_aim_survives_in_range_movement() {
        let mut world = world_with_two("b", "b");
        world.aim("000", "001");
        drained(&mut world, "000");

        world.player_mut("001").unwrap().room = "c".to_string();
        world.update_all();

        assert!(!world.player("000").unwrap().aim.is_none());
        assert!(drained(&mut world, "000").is_empty());
    }

    #[test]
    fn test_head_aim_cleared_by_any_room_change() {
        let mut world = world_with_two("b", "b");
        world.aim_head("000", "001");
        drained(&mut world, "000");

        // Still adjacent, but no longer the snapshotted room.
        world.player_mut("001").unwrap().room = "c".to_string();
        world.update_all();

        assert!(world.player("000").unwrap().aim.is_none());
        assert_eq!(
            drained(&mut world, "000"),
            vec!["Your target has run out of your sights!"]
        );
    }

    #[test]
    fn test_aim_cleared_when_target_disconnects() {
        let mut world = world_with_two("b", "b");
        world.aim("000", "001");
        drained(&mut world, "000");

        world.remove_player("001");
        world.update_all();

        assert!(world.player("000").unwrap().aim.is_none());
        assert_eq!(drained(&mut world, "000"), vec!["Your target has run away!"]);
    }

    #[test]
    fn test_fire_without_aim() {
        let mut world = world_with_two("a", "b");
        world.fire("000");
        assert_eq!(
            drained(&mut world, "000"),
            vec!["You aren't aiming at anything!"]
        );
    }

    #[test]
    fn test_fire_deals_body_damage() {
        let mut world = world_with_two("b", "b");
        world.aim("000", "001");
        world.fire("000");

        assert_eq!(
            world.player("001").unwrap().health,
            MAX_HEALTH - Rifle::DAMAGE
        );
        assert_eq!(world.player("000").unwrap().gun.loaded(), Rifle::CAPACITY - 1);

        let log = drained(&mut world, "000");
        assert!(log.contains(&"You shot 001 for 20 damage!".to_string()));
        let victim_log = drained(&mut world, "001");
        assert!(victim_log.contains(&"You were shot for 20 damage!".to_string()));
        assert!(victim_log.contains(&"You hear a loud bang in the room you are in!".to_string()));
    }

    #[test]
    fn test_fire_headshot_damage() {
        let mut world = world_with_two("b", "b");
        world.aim_head("000", "001");
        world.fire("000");
        assert_eq!(
            world.player("001").unwrap().health,
            MAX_HEALTH - Rifle::HEADSHOT_DAMAGE
        );
    }

    #[test]
    fn test_gunfire_is_audible_next_door_with_direction() {
        let mut world = world_with_two("b", "c");
        world.player_mut("000").unwrap().health = 50;
        world.aim("001", "000");
        world.fire("001");

        let log = drained(&mut world, "000");
        // "000" is west of the shooter: the bang comes from the east.
        assert!(log.contains(&"You hear a loud bang to the east!".to_string()));
    }

    #[test]
    fn test_gunfire_not_audible_two_rooms_away() {
        let mut world = world_with_two("a", "b");
        let third = world.spawn_player();
        world.player_mut(&third).unwrap().room = "d".to_string();
        world.player_mut(&third).unwrap().drain_log();

        world.aim("000", "001");
        world.fire("000");
        assert!(drained(&mut world, &third).is_empty());
    }

    #[test]
    fn test_killing_shot_respawns_victim_and_scores() {
        let mut world = world_with_two("b", "b");
        world.player_mut("001").unwrap().health = Rifle::DAMAGE;
        world.aim("000", "001");
        world.fire("000");

        let shooter = world.player("000").unwrap();
        assert_eq!(shooter.kills, 1);
        assert!(shooter.aim.is_none());

        let victim = world.player("001").unwrap();
        assert_eq!(victim.health, MAX_HEALTH);
        assert_eq!(victim.deaths, 1);
        assert_eq!(victim.ammo, START_AMMO);
        assert_eq!(victim.gun.loaded(), Rifle::CAPACITY);
        assert!(world.rooms().contains(&victim.room));

        let shooter_log = drained(&mut world, "000");
        assert!(shooter_log.contains(&"You killed 001!".to_string()));
        let victim_log = drained(&mut world, "001");
        assert!(victim_log.contains(&"You were killed!".to_string()));
    }

    #[test]
    fn test_two_body_shots_kill_a_forty_health_target() {
        let mut world = world_with_two("b", "b");
        world.player_mut("001").unwrap().health = 2 * Rifle::DAMAGE;
        world.aim("000", "001");
        world.fire("000");
        assert_eq!(world.player("001").unwrap().health, Rifle::DAMAGE);
        world.fire("000");

        assert_eq!(world.player("000").unwrap().kills, 1);
        assert_eq!(world.player("001").unwrap().health, MAX_HEALTH);
        assert_eq!(world.player("001").unwrap().deaths, 1);
    }

    #[test]
    fn test_self_kill_counts_a_death_not_a_kill() {
        let mut world = world_with_two("b", "b");
        world.player_mut("000").unwrap().health = 10;
        world.aim("000", "000");
        world.fire("000");

        let player = world.player("000").unwrap();
        assert_eq!(player.kills, 0);
        assert_eq!(player.deaths, 1);
        assert_eq!(player.health, MAX_HEALTH);

        let log = drained(&mut world, "000");
        assert!(log.contains(&"You killed yourself!".to_string()));
        assert!(!log.iter().any(|line| line.starts_with("You killed 0")));
    }

    #[test]
    fn test_fire_with_empty_gun() {
        let mut world = world_with_two("b", "b");
        while world
            .player_mut("000")
            .unwrap()
            .gun
            .try_fire(AimMode::Body)
            .is_some()
        {}
        world.aim("000", "001");
        world.fire("000");

        let log = drained(&mut world, "000");
        assert!(log.contains(&"You don't have any ammo!".to_string()));
        assert_eq!(world.player("001").unwrap().health, MAX_HEALTH);
        assert_eq!(world.player("000").unwrap().kills, 0);
    }

    #[test]
    fn test_reload_reports_transferred_rounds() {
        let mut world = world_with_two("b", "b");
        world.aim("000", "001");
        world.fire("000");
        world.fire("000");
        world.fire("000");
        drained(&mut world, "000");

        world.reload("000");
        assert_eq!(drained(&mut world, "000"), vec!["You reloaded 3 bullets!"]);
        assert_eq!(world.player("000").unwrap().gun.loaded(), Rifle::CAPACITY);
        assert_eq!(world.player("000").unwrap().ammo, START_AMMO - 3);
    }

    #[test]
    fn test_reload_at_saturation_reports_zero_and_mutates_nothing() {
        let mut world = world_with_two("b", "b");
        world.player_mut("000").unwrap().ammo = 0;
        world.reload("000");
        world.reload("000");

        let log = drained(&mut world, "000");
        assert_eq!(
            log,
            vec![
                "You have no ammo left in your pockets!",
                "You reloaded 0 bullets!",
                "You have no ammo left in your pockets!",
                "You reloaded 0 bullets!"
            ]
        );
        assert_eq!(world.player("000").unwrap().gun.loaded(), Rifle::CAPACITY);
        assert_eq!(world.player("000").unwrap().ammo, 0);
    }

    #[test]
    fn test_go_moves_and_announces_footsteps() {
        let mut world = world_with_two("b", "b");
        let third = world.spawn_player();
        world.player_mut(&third).unwrap().room = "c".to_string();
        world.player_mut(&third).unwrap().drain_log();

        world.go("000", "east");

        assert_eq!(world.player("000").unwrap().room, "c");
        assert_eq!(drained(&mut world, "000"), vec!["You went east!"]);
        assert_eq!(
            drained(&mut world, "001"),
            vec!["You hear footsteps leaving the room!"]
        );
        assert_eq!(
            drained(&mut world, &third),
            vec!["You hear footsteps entering the room!"]
        );
    }

    #[test]
    fn test_go_bad_inputs() {
        let mut world = world_with_two("a", "b");
        world.go("000", "sideways");
        assert_eq!(
            drained(&mut world, "000"),
            vec!["'sideways' isn't a direction..."]
        );
        world.go("000", "west");
        assert_eq!(drained(&mut world, "000"), vec!["You can't go that way!"]);
        assert_eq!(world.player("000").unwrap().room, "a");
    }

    #[test]
    fn test_look_lists_room_and_exits() {
        let mut world = world_with_two("b", "b");
        world.look("000");
        assert_eq!(
            drained(&mut world, "000"),
            vec![
                "Room b",
                "The second room.",
                "To the east is room c.",
                "To the west is room a."
            ]
        );
    }

    #[test]
    fn test_look_direction() {
        let mut world = world_with_two("b", "b");
        world.look_direction("000", "east");
        assert_eq!(
            drained(&mut world, "000"),
            vec!["Room c", "The third room."]
        );

        world.look_direction("000", "north");
        assert_eq!(
            drained(&mut world, "000"),
            vec!["There's nothing in that direction!"]
        );

        world.look_direction("000", "upwards");
        assert_eq!(
            drained(&mut world, "000"),
            vec!["'upwards' isn't a direction"]
        );
    }

    #[test]
    fn test_info_and_stats() {
        let mut world = world_with_two("b", "b");
        world.info("000");
        assert_eq!(
            drained(&mut world, "000"),
            vec![
                "You have 100 health",
                "10 ammo in your gun",
                "10 ammo in your pocket"
            ]
        );
        world.stats("000");
        assert_eq!(drained(&mut world, "000"), vec!["0 kills", "0 deaths"]);
    }

    #[test]
    fn test_say_reaches_everyone_else() {
        let mut world = world_with_two("a", "d");
        world.say("000", "anyone there?");
        assert!(drained(&mut world, "000").is_empty());
        assert_eq!(
            drained(&mut world, "001"),
            vec!["000 said \"anyone there?\""]
        );
    }

    #[test]
    fn test_tell_targets_one_player() {
        let mut world = world_with_two("a", "d");
        world.tell("000", "001", "run");
        assert_eq!(drained(&mut world, "001"), vec!["000 told you \"run\""]);

        world.tell("000", "zzz", "hello?");
        assert_eq!(drained(&mut world, "000"), vec!["Unknown person 'zzz'"]);
    }

    #[test]
    fn test_rename_rejects_punctuation_and_whitespace() {
        let mut world = world_with_two("a", "b");
        assert_eq!(world.set_name("000", "a b"), None);
        assert_eq!(
            drained(&mut world, "000"),
            vec!["Names may not contain punctuation or whitespace!"]
        );
        assert!(world.player("000").is_some());

        assert_eq!(world.set_name("000", "ab!"), None);
        assert_eq!(
            drained(&mut world, "000"),
            vec!["Names may not contain punctuation or whitespace!"]
        );
    }

    #[test]
    fn test_rename_rejects_collisions() {
        let mut world = world_with_two("a", "b");
        assert_eq!(world.set_name("000", "001"), None);
        assert_eq!(
            drained(&mut world, "000"),
            vec!["Someone already has that name!"]
        );
        assert!(world.player("000").is_some());
        assert!(world.player("001").is_some());
    }

    #[test]
    fn test_rename_normalizes_and_moves_registry_key() {
        let mut world = world_with_two("a", "b");
        let new_name = world.set_name("000", "Quorky").unwrap();
        assert_eq!(new_name, "quo");
        assert!(world.player("000").is_none());
        assert_eq!(world.player("quo").unwrap().name, "quo");
        assert_eq!(
            drained(&mut world, "quo"),
            vec!["Name changed to 'quo'!"]
        );

        let padded = world.set_name("001", "ab").unwrap();
        assert_eq!(padded, "0ab");
    }

    #[test]
    fn test_rename_rewrites_aim_targets() {
        let mut world = world_with_two("b", "b");
        world.aim("001", "000");
        let new_name = world.set_name("000", "xyz").unwrap();

        assert_eq!(
            world.player("001").unwrap().aim,
            Aim::Body {
                target: new_name.clone()
            }
        );

        // The rewritten aim still resolves after the next update.
        world.update_all();
        assert!(!world.player("001").unwrap().aim.is_none());
    }

    #[test]
    fn test_reset_match_zeroes_stats_and_respawns() {
        let mut world = world_with_two("a", "b");
        world.player_mut("000").unwrap().kills = 25;
        world.player_mut("000").unwrap().deaths = 3;
        world.player_mut("001").unwrap().health = 40;

        world.reset_match();

        for name in ["000", "001"] {
            let player = world.player(name).unwrap();
            assert_eq!(player.kills, 0);
            assert_eq!(player.deaths, 0);
            assert_eq!(player.health, MAX_HEALTH);
            assert!(world.rooms().contains(&player.room));
        }
        assert!(drained(&mut world, "000").contains(&"The game has been reset!".to_string()));
    }
}
