//! # Text Shooter Client Library
//!
//! A thin connection wrapper over the shared frame protocol. The client
//! holds no game logic at all: it sends one command frame per submitted
//! line and prints every non-empty block the server flushes back.

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use shared::{decode_frame, encode_frame, FrameError, FRAME_LEN};

/// Errors a client connection can produce.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// One connection to the server, usable for sequential request/response
/// exchanges. Split it when sending and receiving need to run
/// concurrently.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
}

impl Connection {
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        Ok(Self {
            stream: TcpStream::connect(addr).await?,
        })
    }

    /// Sends one raw command line as a single frame.
    pub async fn send_command(&mut self, line: &str) -> Result<(), ClientError> {
        let frame = encode_frame(line)?;
        self.stream.write_all(&frame).await?;
        Ok(())
    }

    /// Receives the next log block; empty when the server had nothing
    /// queued for us this tick.
    pub async fn recv_block(&mut self) -> Result<String, ClientError> {
        let mut frame = vec![0u8; FRAME_LEN];
        self.stream.read_exact(&mut frame).await?;
        Ok(decode_frame(&frame)?)
    }

    /// Splits into independently owned read and write halves.
    pub fn into_split(self) -> (BlockReader, CommandWriter) {
        let (read, write) = self.stream.into_split();
        (BlockReader { half: read }, CommandWriter { half: write })
    }
}

/// The receiving half of a split connection.
#[derive(Debug)]
pub struct BlockReader {
    half: OwnedReadHalf,
}

impl BlockReader {
    pub async fn recv_block(&mut self) -> Result<String, ClientError> {
        let mut frame = vec![0u8; FRAME_LEN];
        self.half.read_exact(&mut frame).await?;
        Ok(decode_frame(&frame)?)
    }
}

/// The sending half of a split connection.
#[derive(Debug)]
pub struct CommandWriter {
    half: OwnedWriteHalf,
}

impl CommandWriter {
    pub async fn send_command(&mut self, line: &str) -> Result<(), ClientError> {
        let frame = encode_frame(line)?;
        self.half.write_all(&frame).await?;
        Ok(())
    }
}
