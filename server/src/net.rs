//! Session management and the multiplexed tick loop.
//!
//! One control loop drives everything: accept pending connections, run the
//! rules tick, update every player, then poll each session once for I/O.
//! Readiness checks are bounded waits, so a stalled or idle session never
//! blocks the loop for the others, and all world mutation stays on this
//! one task. Within a tick, every player's `update` runs before any
//! command is dispatched, and commands are dispatched in session list
//! order.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use log::{info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use shared::{decode_frame, frames_for_block, FRAME_LEN};

use crate::game::Game;
use crate::player::Player;

/// Greeting queued for every player the moment their session is created.
pub const MOTD: &str =
    "Welcome to Text Shooter! Enter 'help' for a list of commands.";

/// How long one tick waits for a pending connection.
const ACCEPT_WAIT: Duration = Duration::from_millis(5);

/// One accepted connection and the player it owns.
#[derive(Debug)]
struct Session {
    stream: TcpStream,
    addr: SocketAddr,
    /// Registry name of this session's player; rebound on rename.
    player: String,
    /// Inbound bytes accumulated until they form one whole frame.
    read_buf: Vec<u8>,
    /// Encoded frames awaiting a writable socket.
    write_buf: Vec<u8>,
}

/// The listening socket, the session list and the game they drive.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    sessions: Vec<Session>,
    game: Game,
    poll_wait: Duration,
}

impl Server {
    /// Binds the listening socket. A bind failure is the one startup error
    /// that aborts the process, propagated from here to `main`.
    pub async fn bind(addr: &str, game: Game, poll_wait: Duration) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            sessions: Vec::new(),
            game,
            poll_wait,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Runs the tick loop forever.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!(
            "Server listening on {}, map {}",
            self.listener.local_addr()?,
            self.game.map_name()
        );
        loop {
            self.tick().await;
        }
    }

    /// One full tick: accept, rules, updates, then per-session I/O.
    pub async fn tick(&mut self) {
        self.accept_pending().await;
        self.game.tick_rules();
        self.game.world_mut().update_all();
        self.poll_sessions().await;
    }

    /// Accepts at most one pending connection, without blocking the tick.
    async fn accept_pending(&mut self) {
        let Ok(accepted) = timeout(ACCEPT_WAIT, self.listener.accept()).await else {
            return;
        };
        match accepted {
            Ok((stream, addr)) => {
                let player = self.game.world_mut().spawn_player();
                info!("Player {} connected from {}", player, addr);
                self.game.world_mut().log_to(&player, MOTD);
                self.game
                    .world_mut()
                    .broadcast("A new player joined!", Some(&player));
                self.sessions.push(Session {
                    stream,
                    addr,
                    player,
                    read_buf: Vec::new(),
                    write_buf: Vec::new(),
                });
            }
            Err(e) => warn!("Failed to accept connection: {}", e),
        }
    }

    /// Polls every session once, in list order, tearing down any whose
    /// connection has gone away. A dead session never takes the loop down
    /// with it.
    async fn poll_sessions(&mut self) {
        let mut dropped = Vec::new();
        for index in 0..self.sessions.len() {
            if !self.read_session(index).await {
                dropped.push(index);
                continue;
            }
            if !self.write_session(index).await {
                dropped.push(index);
            }
        }
        for index in dropped.into_iter().rev() {
            let session = self.sessions.remove(index);
            info!(
                "Player {} ({}) disconnected",
                session.player, session.addr
            );
            self.game.world_mut().remove_player(&session.player);
        }
    }

    /// Reads toward one frame and dispatches it once complete. Returns
    /// false when the connection is gone.
    async fn read_session(&mut self, index: usize) -> bool {
        let session = &mut self.sessions[index];
        match timeout(self.poll_wait, session.stream.readable()).await {
            Err(_) => return true,
            Ok(Err(_)) => return false,
            Ok(Ok(())) => {}
        }

        let mut chunk = [0u8; FRAME_LEN];
        let wanted = FRAME_LEN - session.read_buf.len();
        match session.stream.try_read(&mut chunk[..wanted]) {
            Ok(0) => return false,
            Ok(read) => session.read_buf.extend_from_slice(&chunk[..read]),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return true,
            Err(_) => return false,
        }
        if session.read_buf.len() < FRAME_LEN {
            return true;
        }

        let frame = std::mem::take(&mut session.read_buf);
        let player = session.player.clone();
        match decode_frame(&frame) {
            Ok(line) => {
                if let Some(new_name) = self.game.handle_line(&player, &line) {
                    self.sessions[index].player = new_name;
                }
            }
            Err(e) => warn!("Dropping malformed frame from {}: {}", player, e),
        }
        true
    }

    /// Flushes the player's queued log block. Returns false when the
    /// connection is gone.
    async fn write_session(&mut self, index: usize) -> bool {
        // Only queue this tick's block once the previous backlog has
        // drained; a stalled client must not grow the buffer without
        // bound. Lines stay on the player queue until then.
        if self.sessions[index].write_buf.is_empty() {
            let player = self.sessions[index].player.clone();
            let lines = self
                .game
                .world_mut()
                .player_mut(&player)
                .map(Player::drain_log)
                .unwrap_or_default();
            for frame in frames_for_block(&lines) {
                self.sessions[index].write_buf.extend_from_slice(&frame);
            }
        }

        let session = &mut self.sessions[index];
        match timeout(self.poll_wait, session.stream.writable()).await {
            Err(_) => return true,
            Ok(Err(_)) => return false,
            Ok(Ok(())) => {}
        }
        match session.stream.try_write(&session.write_buf) {
            Ok(written) => {
                session.write_buf.drain(..written);
                true
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => true,
            Err(_) => false,
        }
    }
}
