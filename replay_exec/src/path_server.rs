//! # Path Server
//!
//! Publishes the replayed path to the vehicle controller and the visualiser.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    msg::{Header, ReplayOutput},
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

use crate::{planner::ReplayedPath, publish};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Path server
pub struct PathServer {
    socket: MonitoredSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PathServerError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not send the path: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the path: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PathServer {
    /// Create a new instance of the Path Server.
    ///
    /// This function will not block until a subscriber connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, PathServerError> {
        // Create the socket options
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            bind: true,
            connect_timeout: 1000,
            heartbeat_ivl: 500,
            heartbeat_ttl: 1000,
            heartbeat_timeout: 1000,
            linger: 1,
            send_timeout: 10,
            ..Default::default()
        };

        // Bind the socket
        let socket = MonitoredSocket::new(ctx, zmq::PUB, socket_options, &params.path_endpoint)
            .map_err(PathServerError::SocketError)?;

        Ok(Self { socket })
    }

    /// Publish all messages describing the given path.
    pub fn publish(
        &mut self,
        path: &ReplayedPath,
        cruise_speed_ms: f64,
        frame_id: &str,
    ) -> Result<(), PathServerError> {
        let header = Header::now(frame_id);

        for output in publish::render(path, cruise_speed_ms, &header) {
            self.send(&output)?;
        }

        Ok(())
    }

    /// Send a single output message.
    pub fn send(&mut self, output: &ReplayOutput) -> Result<(), PathServerError> {
        // Serialize the message
        let msg_string = output
            .to_json()
            .map_err(PathServerError::SerializationError)?;

        // Send the message
        self.socket
            .send(msg_string.as_str(), 0)
            .map_err(PathServerError::SendError)
    }

    /// Returns true if at least one subscriber is connected.
    pub fn connected(&self) -> bool {
        self.socket.connected()
    }
}
