use {
    anyhow::{Context, Error, ensure},
    clap::Parser,
    dashmap::DashMap,
    hex::FromHex,
    memory_store::MemoryStore,
    num_bigint::BigUint,
    num_rational::BigRational,
    std::{
        process,
        sync::Arc,
        time::{Duration, Instant, SystemTime, UNIX_EPOCH},
    },
    stratum::{
        Account, AcceptedWork, AccountId, ActiveNet, BlockHash, CURRENT_WORK_HEIGHT_OFFSET,
        CURRENT_WORK_NBITS_OFFSET, CURRENT_WORK_NTIME_OFFSET, CURRENT_WORK_VERSION_OFFSET,
        ClientConfig, ClientToken, DifficultyInfo, Handles, MinerVariant, RateLimitClass, Share,
        StoreError,
    },
    tokio::{net::TcpListener, task::JoinSet},
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info},
    tracing_subscriber::EnvFilter,
};

pub use {options::Options, settings::Settings};

mod memory_store;
mod options;
mod settings;

type Result<T = (), E = Error> = std::result::Result<T, E>;

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = Options::parse();
    let cancel = CancellationToken::new();

    let shutdown = cancel.clone();
    ctrlc_guard(shutdown);

    match run(options, cancel) {
        Err(err) => {
            error!("error: {err:#}");
            process::exit(1);
        }
        Ok(()) => process::exit(0),
    }
}

fn ctrlc_guard(cancel: CancellationToken) {
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received shutdown signal");
        cancel.cancel();
    });
}

fn run(options: Options, cancel: CancellationToken) -> Result {
    tokio::runtime::Runtime::new()
        .context("failed to start async runtime")?
        .block_on(async move {
            let (listener, settings) = bind(options).await?;
            serve(listener, settings, cancel).await
        })
}

/// Resolves [`Settings`] and binds the listening socket, returning both so callers (tests, or
/// anything that needs the actual bound port when `--port 0` was requested) can observe the
/// real address before the accept loop starts.
pub async fn bind(options: Options) -> Result<(TcpListener, Settings)> {
    let settings = Settings::from_options(options).context("invalid configuration")?;

    let address = settings.address().to_string();
    let port = settings.port();

    let listener = TcpListener::bind((address.as_str(), port))
        .await
        .with_context(|| format!("failed to bind to {address}:{port}"))?;

    Ok((listener, settings))
}

/// Spawns a per-connection engine task for each accepted connection, and drains outstanding
/// tasks on shutdown. Mirrors the teacher's own pool accept loop (`subcommand/pool.rs`): a
/// `JoinSet` of connection tasks, fanned out from a single `tokio::select!` between
/// `listener.accept()` and the shared cancellation signal.
pub async fn serve(listener: TcpListener, settings: Settings, cancel: CancellationToken) -> Result {
    let store = Arc::new(MemoryStore::new(
        settings.rate_limit().0,
        settings.rate_limit().1,
        settings.default_variant(),
    ));
    let generator = store.spawn_work_generator(Duration::from_secs(30), cancel.clone());

    info!(
        address = settings.address(),
        port = settings.port(),
        solo = settings.solo(),
        "stratum engine listening"
    );

    let mut tasks = JoinSet::new();
    let mut next_id = 0u64;

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, addr) = accepted.context("accept failed")?;

                next_id += 1;
                let token = ClientToken(format!("client-{next_id}"));
                let config = settings.client_config();
                let store = store.clone();

                info!(%addr, token = %token.0, "accepted connection");

                tasks.spawn(async move {
                    let handle = stratum::run(socket, addr, token, config, store).await;
                    debug!(hash_rate = %handle.hash_rate(), "client task finished");
                });
            }
            _ = cancel.cancelled() => {
                info!("shutting down stratum engine");
                break;
            }
        }
    }

    generator.abort();
    while tasks.join_next().await.is_some() {}

    Ok(())
}
