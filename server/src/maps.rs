//! Map authoring: bundled maps and the [`GameMap`] they produce.
//!
//! A map supplies the room registry plus the ASCII overview the `map`
//! command prints. The core only requires that every directional link
//! resolve to a registered key or be absent.

use crate::rooms::{Room, RoomRegistry};

/// A named, fully authored map ready to hand to a game.
#[derive(Debug)]
pub struct GameMap {
    pub name: String,
    pub description: String,
    pub display: String,
    pub rooms: RoomRegistry,
}

const BEIGE_DISPLAY: &str = "                      Store room
                            |
Mirror corridor----------Laboratory---Green wallpaper corridor
     |                                      |
Boat painting corridor---Office-------Bin corridor
     |                      |               |
Cactus corridor----------Fountain-----Orange wallpaper corricor
     |                      |               |
Featureless corridor-----Library------Window corridor
     |                                      |
Fish corridor------------Kitchen------Carpetless corridor
                            |
                         Toilet";

/// The bundled seventeen-room map: a grid of corridors around a central
/// column of landmark rooms.
pub fn beige() -> GameMap {
    let rooms = vec![
        Room::new(
            "laboratory",
            "the laboratory",
            "A disused laboratory. It's all sciencey.",
        )
        .north("store room")
        .west("corridor1")
        .east("corridor2"),
        Room::new(
            "store room",
            "the store room",
            "An empty store room. Out of a window, you can see a distant hill.",
        )
        .south("laboratory"),
        Room::new("corridor1", "a corridor", "On the wall is a large mirror.")
            .east("laboratory")
            .south("corridor3"),
        Room::new(
            "corridor2",
            "a corridor",
            "The wallpaper is green and tasteless.",
        )
        .west("laboratory")
        .south("corridor4"),
        Room::new(
            "corridor3",
            "a corridor",
            "A painting of a boat is on the wall.",
        )
        .north("corridor1")
        .east("office")
        .south("corridor5"),
        Room::new(
            "corridor5",
            "a corridor",
            "A cactus is mounted on the wall.",
        )
        .north("corridor3")
        .east("fountain")
        .south("corridor7"),
        Room::new("corridor7", "a corridor", "It has no features.")
            .north("corridor5")
            .east("library")
            .south("corridor9"),
        Room::new(
            "corridor9",
            "a corridor",
            "A fish is stuck to the wall with a spike.",
        )
        .north("corridor7")
        .east("kitchen"),
        Room::new("corridor4", "a corridor", "A bin is here.")
            .north("corridor2")
            .west("office")
            .south("corridor6"),
        Room::new(
            "corridor6",
            "a corridor",
            "A corridor. The wallpaper is orange and smells.",
        )
        .north("corridor4")
        .west("fountain")
        .south("corridor8"),
        Room::new(
            "corridor8",
            "a corridor",
            "Out of a window, you can see a distant valley.",
        )
        .north("corridor6")
        .west("library")
        .south("corridor10"),
        Room::new("corridor10", "a corridor", "It has no carpet.")
            .north("corridor8")
            .west("kitchen"),
        Room::new(
            "office",
            "the office",
            "An office. A desk with papers all over it is in the corner. It feels Kafkaesque.",
        )
        .west("corridor3")
        .east("corridor4")
        .south("fountain"),
        Room::new(
            "fountain",
            "the room with a fountain",
            "A room with an ornate, but broken fountain in it. It feels somewhat central.",
        )
        .north("office")
        .west("corridor5")
        .east("corridor6")
        .south("library"),
        Room::new(
            "library",
            "the library",
            "A library, with bookshelves lining the walls. On close inspection, all the books are biographies of Morrissey.",
        )
        .north("fountain")
        .west("corridor7")
        .east("corridor8"),
        Room::new(
            "kitchen",
            "the kitchen",
            "An old kitchen, with what looks like old cooking equipment in it (surprising!)",
        )
        .south("toilet")
        .west("corridor9")
        .east("corridor10"),
        Room::new(
            "toilet",
            "a toilet",
            "A toilet, with a broken sink. There is some inane graffiti on the wall.",
        )
        .north("kitchen"),
    ];

    GameMap {
        name: "Beige".to_string(),
        description: "A small, bland map.".to_string(),
        display: BEIGE_DISPLAY.to_string(),
        rooms: RoomRegistry::new(rooms),
    }
}
