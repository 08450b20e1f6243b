use crate::conn::Connection;
use crate::validate::{self, DEFAULT_CHUNK_LENGTH};

use super::{Monitor, MonitorError};

/// Helper to construct and customize a [`Monitor`].
#[derive(Debug)]
pub struct MonitorBuilder<C: Connection> {
    conn: C,
    max_chunk_length: Option<usize>,
}

impl<C: Connection> MonitorBuilder<C> {
    /// Create a new `MonitorBuilder` using the provided Connection.
    pub fn new(conn: C) -> MonitorBuilder<C> {
        MonitorBuilder {
            conn,
            max_chunk_length: None,
        }
    }

    /// Maximum number of bytes per read/write command. Must be within
    /// `1..=255`. Defaults to 128.
    pub fn max_chunk_length(mut self, len: usize) -> Self {
        self.max_chunk_length = Some(len);
        self
    }

    /// Build the Monitor, running the connection's
    /// [`on_session_start`](Connection::on_session_start) hook.
    pub fn build(mut self) -> Result<Monitor<C>, MonitorError<C::Error>> {
        let max_chunk_length = match self.max_chunk_length {
            Some(len) => validate::chunk_length(len)?,
            None => DEFAULT_CHUNK_LENGTH,
        };

        self.conn
            .on_session_start()
            .map_err(MonitorError::ConnectionInit)?;

        Ok(Monitor {
            conn: self.conn,
            max_chunk_length,
        })
    }
}
