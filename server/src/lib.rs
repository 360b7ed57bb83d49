//! # Text Shooter Server Library
//!
//! The authoritative server for a multiplayer, text-driven combat game:
//! players connect over TCP, move between named rooms, aim at and shoot
//! each other, and compete under a scored win condition.
//!
//! ## Architecture
//!
//! The server is a single-threaded cooperative loop. One task serially
//! multiplexes every session using short, bounded readiness waits, so all
//! player and room mutation happens on one thread with no locking. Each
//! tick: pending connections are accepted, the rules policy runs, every
//! player's aim is revalidated, and each session is polled once: at most
//! one inbound command frame decoded and dispatched, and the player's
//! queued log lines flushed out.
//!
//! The ordering contract inside a tick matters: aim invalidation runs for
//! every player before any command is dispatched, so a `fire` never
//! resolves against a target that walked out of range on a previous tick.
//!
//! ## Module Organization
//!
//! - [`parser`]: the command grammar, with literal/variable/remainder
//!   patterns, verbs with aliases, and first-match-wins parsing in
//!   declaration order.
//! - [`command`]: the concrete verb table and the typed
//!   [`command::Command`] union dispatch works from.
//! - [`rooms`]: the room graph, with lazily resolved directional links,
//!   adjacency queries and uniform random selection.
//! - [`maps`]: bundled map data.
//! - [`player`]: per-player state, aim modes and the [`player::Weapon`]
//!   capability with its standard rifle implementation.
//! - [`world`]: the combat state machine; every cross-player operation
//!   goes through the registries owned here.
//! - [`game`]: game composition, the [`game::GameRules`] policy and
//!   command dispatch.
//! - [`net`]: sessions, the fixed-size frame transport and the tick loop.

pub mod command;
pub mod game;
pub mod maps;
pub mod net;
pub mod parser;
pub mod player;
pub mod rooms;
pub mod world;
