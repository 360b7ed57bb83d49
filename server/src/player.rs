//! Per-player state: health, ammo, aim, the owned weapon and the outbound
//! log queue drained by the transport layer each tick.

use std::fmt;

/// Health every player spawns and respawns with.
pub const MAX_HEALTH: i32 = 100;

/// Rounds in a player's pockets at spawn and after every reset.
pub const START_AMMO: u32 = 10;

/// Which part of the target a shot is lined up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AimMode {
    Body,
    Head,
}

/// A player's aim state. The room snapshot exists exactly when head-aiming:
/// headshot aim breaks as soon as the target leaves the room they were in
/// when the aim was taken, while body aim only breaks when the target
/// leaves range entirely.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Aim {
    #[default]
    None,
    Body {
        target: String,
    },
    Head {
        target: String,
        room: String,
    },
}

impl Aim {
    pub fn target(&self) -> Option<&str> {
        match self {
            Aim::None => None,
            Aim::Body { target } | Aim::Head { target, .. } => Some(target),
        }
    }

    pub fn mode(&self) -> Option<AimMode> {
        match self {
            Aim::None => None,
            Aim::Body { .. } => Some(AimMode::Body),
            Aim::Head { .. } => Some(AimMode::Head),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Aim::None)
    }
}

/// What a shot did to its victim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjuryResult {
    Kill,
    NoKill,
}

/// Why a player died; carried through for rule policies that may want to
/// distinguish gunfire from rule-driven resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjuryCause {
    Shot,
    GameRule,
}

/// Capability of a gun: hold rounds, consume one per shot, compute damage.
///
/// Concrete weapon types are selected once at game construction through a
/// [`WeaponFactory`]; a player's reset re-instantiates their weapon at full
/// capacity through the same factory.
pub trait Weapon: fmt::Debug + Send {
    /// Rounds the weapon holds when full.
    fn capacity(&self) -> u32;

    /// Rounds currently loaded.
    fn loaded(&self) -> u32;

    /// Consumes one round and returns the damage dealt for a shot in the
    /// given mode, or `None` when the weapon is empty.
    fn try_fire(&mut self, mode: AimMode) -> Option<i32>;

    /// Moves rounds from `reserve` into the weapon, up to its remaining
    /// capacity. Returns how many rounds were actually transferred.
    fn reload_from(&mut self, reserve: &mut u32) -> u32 {
        let transferred = (self.capacity() - self.loaded()).min(*reserve);
        *reserve -= transferred;
        self.load(transferred);
        transferred
    }

    /// Adds rounds to the weapon; callers never exceed capacity.
    fn load(&mut self, rounds: u32);
}

/// Builds a fresh, fully loaded weapon.
pub type WeaponFactory = fn() -> Box<dyn Weapon>;

/// The standard service weapon: ten rounds, double damage on headshots.
#[derive(Debug, Clone)]
pub struct Rifle {
    loaded: u32,
}

impl Rifle {
    pub const CAPACITY: u32 = 10;
    pub const DAMAGE: i32 = 20;
    pub const HEADSHOT_DAMAGE: i32 = 40;

    pub fn new() -> Self {
        Self {
            loaded: Self::CAPACITY,
        }
    }
}

impl Default for Rifle {
    fn default() -> Self {
        Self::new()
    }
}

impl Weapon for Rifle {
    fn capacity(&self) -> u32 {
        Self::CAPACITY
    }

    fn loaded(&self) -> u32 {
        self.loaded
    }

    fn try_fire(&mut self, mode: AimMode) -> Option<i32> {
        if self.loaded == 0 {
            return None;
        }
        self.loaded -= 1;
        Some(match mode {
            AimMode::Body => Self::DAMAGE,
            AimMode::Head => Self::HEADSHOT_DAMAGE,
        })
    }

    fn load(&mut self, rounds: u32) {
        self.loaded += rounds;
    }
}

/// The standard [`WeaponFactory`].
pub fn rifle_factory() -> Box<dyn Weapon> {
    Box::new(Rifle::new())
}

/// One connected player.
#[derive(Debug)]
pub struct Player {
    pub name: String,
    /// Registry key of the room the player currently stands in.
    pub room: String,
    pub health: i32,
    pub kills: u32,
    pub deaths: u32,
    /// Rounds in the player's pockets, outside the weapon.
    pub ammo: u32,
    pub gun: Box<dyn Weapon>,
    pub aim: Aim,
    outbox: Vec<String>,
}

impl Player {
    pub fn new(name: &str, room: &str, factory: WeaponFactory) -> Self {
        Self {
            name: name.to_string(),
            room: room.to_string(),
            health: MAX_HEALTH,
            kills: 0,
            deaths: 0,
            ammo: START_AMMO,
            gun: factory(),
            aim: Aim::None,
            outbox: Vec::new(),
        }
    }

    /// Queues a log line for the next flush to this player's connection.
    pub fn log(&mut self, message: impl Into<String>) {
        self.outbox.push(message.into());
    }

    /// Takes all queued log lines, leaving the queue empty.
    pub fn drain_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outbox)
    }

    /// Restores full health, a fresh weapon, full pockets and no aim.
    /// Kill and death counts survive a reset; only the match reset in the
    /// rules policy touches those.
    pub fn reset(&mut self, factory: WeaponFactory) {
        self.health = MAX_HEALTH;
        self.ammo = START_AMMO;
        self.gun = factory();
        self.aim = Aim::None;
    }
}
