use {
    super::*,
    state::ClientState,
    std::{
        net::SocketAddr,
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
    },
    tokio::{
        io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter},
        net::TcpStream,
        sync::mpsc,
    },
    tokio_util::sync::CancellationToken,
    tracing::info,
};

pub use handles::{Handles, RateLimitClass, StoreError};

mod handles;
mod hash_monitor;
mod processor;
mod reader;
mod sender;
mod state;

/// Opaque token handed back to [`Handles::remove_client`] on shutdown. Breaks the
/// pool<->client back-reference cycle: the engine never holds a reference into the registry
/// that owns it, it only carries the key the registry gave it at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientToken(pub String);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub read_timeout: std::time::Duration,
    pub hash_calc_threshold: u64,
    pub nonce_iterations: u64,
    pub blake256_pad: Vec<u8>,
    pub pow_limit: BigRational,
    pub solo_pool: bool,
    pub active_net: ActiveNet,
}

/// A lightweight, cloneable handle to a running client, usable from outside the four tasks
/// (e.g. to read its hash rate for a status page).
#[derive(Clone)]
pub struct ClientHandle {
    state: Arc<ClientState>,
    pub token: ClientToken,
}

impl ClientHandle {
    pub fn hash_rate(&self) -> BigRational {
        self.state.hash_rate()
    }

    pub fn is_authorized(&self) -> bool {
        self.state.is_authorized()
    }

    pub fn is_subscribed(&self) -> bool {
        self.state.is_subscribed()
    }

    pub fn extranonce1(&self) -> String {
        self.state.extranonce1().to_hex()
    }
}

/// Spawns the reader, processor, sender and hash-rate monitor tasks for one connection, waits
/// for any of them to finish (via cancellation), joins the rest, and invokes
/// `Handles::remove_client` exactly once.
pub async fn run(
    socket: TcpStream,
    addr: SocketAddr,
    token: ClientToken,
    config: ClientConfig,
    handles: Arc<dyn Handles>,
) -> ClientHandle {
    let _ = socket.set_nodelay(true);
    let (read_half, write_half) = socket.into_split();

    let reader_half = BufReader::new(read_half);
    let writer_half = BufWriter::new(write_half);

    let extranonce1 = Extranonce::generate(4);
    let state = Arc::new(ClientState::new(extranonce1.clone()));
    let cancel = CancellationToken::new();
    let submissions = Arc::new(AtomicU64::new(0));

    let (inbound_tx, inbound_rx) = mpsc::channel::<Message>(64);
    let (outbound_tx, outbound_rx) = mpsc::channel::<Message>(64);

    let reader_task = tokio::spawn(reader::run(
        reader_half,
        inbound_tx,
        cancel.clone(),
        config.read_timeout,
    ));

    let sender_task = tokio::spawn(sender::run(
        writer_half,
        outbound_rx,
        state.clone(),
        cancel.clone(),
    ));

    let monitor_task = tokio::spawn(hash_monitor::run(
        state.clone(),
        submissions.clone(),
        config.hash_calc_threshold,
        config.nonce_iterations,
        cancel.clone(),
    ));

    let processor_task = tokio::spawn(processor::run(processor::ProcessorContext {
        addr,
        token: token.clone(),
        config,
        handles: handles.clone(),
        state: state.clone(),
        extranonce1,
        inbound_rx,
        outbound_tx,
        submissions,
        cancel: cancel.clone(),
    }));

    let _ = tokio::join!(reader_task, sender_task, monitor_task, processor_task);

    handles.remove_client(token.clone()).await;
    info!(%addr, "client {} removed", token.0);

    ClientHandle { state, token }
}
