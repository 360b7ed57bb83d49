//! Room graph: named rooms joined by four directional links.
//!
//! Rooms reference their neighbors by registry key rather than owning them,
//! so a map can be declared in any order and a link is only live while its
//! key resolves. The registry is built once at game start and never mutated
//! afterwards.

use rand::Rng;

/// The four cardinal directions, in the canonical order used everywhere a
/// room's neighbors are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Parses a free-text direction token.
    pub fn parse(token: &str) -> Option<Direction> {
        match token {
            "north" => Some(Direction::North),
            "south" => Some(Direction::South),
            "east" => Some(Direction::East),
            "west" => Some(Direction::West),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }
}

/// One room: registry key, display label, description, contained objects
/// and up to four outgoing links stored as registry keys.
#[derive(Debug, Clone)]
pub struct Room {
    key: String,
    label: String,
    description: String,
    objects: Vec<String>,
    exits: [Option<String>; 4],
}

impl Room {
    pub fn new(key: &str, label: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            objects: Vec::new(),
            exits: [None, None, None, None],
        }
    }

    pub fn north(self, key: &str) -> Self {
        self.link(Direction::North, key)
    }

    pub fn south(self, key: &str) -> Self {
        self.link(Direction::South, key)
    }

    pub fn east(self, key: &str) -> Self {
        self.link(Direction::East, key)
    }

    pub fn west(self, key: &str) -> Self {
        self.link(Direction::West, key)
    }

    fn link(mut self, direction: Direction, key: &str) -> Self {
        self.exits[direction.index()] = Some(key.to_string());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    /// The raw link key in a direction, unresolved.
    pub fn exit(&self, direction: Direction) -> Option<&str> {
        self.exits[direction.index()].as_deref()
    }
}

/// Outcome of resolving a free-text direction from a given room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectionLookup<'a> {
    /// The token is not one of the four directions.
    UnknownDirection,
    /// A real direction, but no room lies that way from here.
    NoExit,
    /// The registry key of the destination room.
    Destination(&'a str),
}

/// All rooms of one map, indexed by key.
#[derive(Debug, Clone)]
pub struct RoomRegistry {
    rooms: std::collections::HashMap<String, Room>,
    // Sorted key list: deterministic iteration and unbiased random choice.
    keys: Vec<String>,
}

impl RoomRegistry {
    /// Builds the registry. A map must contain at least one room; players
    /// could not spawn anywhere otherwise.
    pub fn new(rooms: Vec<Room>) -> Self {
        assert!(!rooms.is_empty(), "a map needs at least one room");
        let mut keys: Vec<String> = rooms.iter().map(|room| room.key().to_string()).collect();
        keys.sort();
        let rooms = rooms
            .into_iter()
            .map(|room| (room.key().to_string(), room))
            .collect();
        Self { rooms, keys }
    }

    pub fn get(&self, key: &str) -> Option<&Room> {
        self.rooms.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.rooms.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Resolves the neighbor of a room in one direction. A link whose key
    /// is missing from the registry behaves like no link at all.
    pub fn neighbor(&self, key: &str, direction: Direction) -> Option<&str> {
        let exit = self.rooms.get(key)?.exit(direction)?;
        self.rooms.get(exit).map(Room::key)
    }

    /// The four neighbors of a room in canonical direction order, absent
    /// entries preserved.
    pub fn adjacent_rooms(&self, key: &str) -> [Option<&str>; 4] {
        Direction::ALL.map(|direction| self.neighbor(key, direction))
    }

    /// True when `candidate` is `key` itself or one of its four neighbors,
    /// the range within which aiming and gunfire are audible.
    pub fn in_range(&self, key: &str, candidate: &str) -> bool {
        key == candidate
            || self
                .adjacent_rooms(key)
                .iter()
                .any(|neighbor| *neighbor == Some(candidate))
    }

    /// A uniformly random room key; spawn and respawn both use this.
    pub fn random_room(&self) -> &str {
        let index = rand::thread_rng().gen_range(0..self.keys.len());
        &self.keys[index]
    }

    /// Three-way direction resolution; each outcome maps to a distinct
    /// player-facing message at the call site.
    pub fn resolve_direction<'a>(&'a self, token: &str, from: &str) -> DirectionLookup<'a> {
        let Some(direction) = Direction::parse(token) else {
            return DirectionLookup::UnknownDirection;
        };
        match self.neighbor(from, direction) {
            Some(destination) => DirectionLookup::Destination(destination),
            None => DirectionLookup::NoExit,
        }
    }
}
