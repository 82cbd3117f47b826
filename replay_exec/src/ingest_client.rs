//! # Ingest Client
//!
//! The IngestClient receives the planner's inputs from the network:
//!
//! - Odometry of the vehicle.
//! - The recorded global route.
//! - The cruise speed.
//!
//! Inputs are published by other parts of the vehicle software as JSON encoded [`ReplayInput`]
//! messages, as often as they are produced. A background thread receives and decodes them and
//! passes them to the main loop over a channel. The main loop then applies them to the
//! `DataStore` at the start of each cycle, so no input is ever applied while a plan is running.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{error, info, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{channel, Receiver, Sender, TryRecvError},
        Arc,
    },
    thread::{self, JoinHandle},
};

use comms_if::{
    msg::ReplayInput,
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct IngestClient {
    bg_jh: Option<JoinHandle<()>>,
    bg_run: Arc<AtomicBool>,
    bg_alive: Arc<AtomicBool>,
    receiver: Receiver<ReplayInput>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl IngestClient {
    /// Create a new instance of the IngestClient.
    ///
    /// This function will not block until a publisher connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, IngestClientError> {
        // Create the socket options
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            connect_timeout: 1000,
            heartbeat_ivl: 500,
            heartbeat_ttl: 1000,
            heartbeat_timeout: 1000,
            linger: 1,
            recv_timeout: 10,
            ..Default::default()
        };

        // Connect the socket
        let socket = MonitoredSocket::new(ctx, zmq::SUB, socket_options, &params.ingest_endpoint)
            .map_err(IngestClientError::SocketError)?;

        info!("Ingest client connecting to {}", params.ingest_endpoint);

        let (sender, receiver) = channel();
        let bg_run = Arc::new(AtomicBool::new(true));
        let bg_alive = Arc::new(AtomicBool::new(true));

        // Create clones of these to pass to the bg thread
        let bg_run_clone = bg_run.clone();
        let bg_alive_clone = bg_alive.clone();

        // Start BG thread
        let bg_jh = Some(thread::spawn(move || {
            bg_thread(socket, bg_run_clone, sender);
            bg_alive_clone.store(false, Ordering::Relaxed);
        }));

        Ok(Self {
            bg_jh,
            bg_run,
            bg_alive,
            receiver,
        })
    }

    /// Take all inputs received since the last call, oldest first.
    pub fn drain(&self) -> Vec<ReplayInput> {
        let mut inputs = Vec::new();

        loop {
            match self.receiver.try_recv() {
                Ok(i) => inputs.push(i),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        inputs
    }

    /// Returns `false` if the background thread has stopped receiving.
    pub fn is_alive(&self) -> bool {
        self.bg_alive.load(Ordering::Relaxed)
    }
}

impl Drop for IngestClient {
    fn drop(&mut self) {
        self.bg_run.store(false, Ordering::Relaxed);

        if let Some(jh) = self.bg_jh.take() {
            if jh.join().is_err() {
                warn!("IngestClient background thread panicked");
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Background thread, forwards every valid message from the socket to the main loop.
fn bg_thread(socket: MonitoredSocket, run: Arc<AtomicBool>, sender: Sender<ReplayInput>) {
    // While instructed to run
    while run.load(Ordering::Relaxed) {
        // Read string from the socket
        let msg = match socket.recv_string(0) {
            Ok(Ok(s)) => s,
            Ok(Err(_)) => {
                warn!("Non UTF-8 message received by the IngestClient");
                continue;
            }
            Err(zmq::Error::EAGAIN) => continue,
            Err(e) => {
                error!("Error receiving message in the IngestClient: {:?}", e);
                break;
            }
        };

        // Deserialize the message
        let input = match ReplayInput::from_json(&msg) {
            Ok(i) => i,
            Err(e) => {
                warn!("Error deserialising message in the IngestClient: {}", e);
                continue;
            }
        };

        // Receiver gone means the client was dropped
        if sender.send(input).is_err() {
            break;
        }
    }
}
