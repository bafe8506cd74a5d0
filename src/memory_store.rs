use super::*;

/// Simplest possible current-work synthesizer standing in for the pool's real block-template
/// source (out of scope per the engine's own spec: "current-work source" is an injected
/// collaborator). Produces a 180-byte header, hex-encoded to the fixed field layout
/// `stratum::hexutil` documents, with an incrementing height and a fixed, trivially low `nbits`
/// so a demo miner can actually solve blocks against it.
fn synthesize_work(height: u32) -> String {
    let mut raw = vec![b'0' as char; 360];

    let mut splice = |offset: (usize, usize), hex: &str| {
        raw.splice(offset.0..offset.1, hex.chars());
    };

    splice(CURRENT_WORK_VERSION_OFFSET, "00000001");
    splice(CURRENT_WORK_NBITS_OFFSET, "1e7fffff");
    splice(
        CURRENT_WORK_HEIGHT_OFFSET,
        &hex::encode(height.to_le_bytes()),
    );
    splice(
        CURRENT_WORK_NTIME_OFFSET,
        &hex::encode(
            (SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs() as u32)
                .to_le_bytes(),
        ),
    );

    raw.into_iter().collect()
}

#[derive(Debug, Clone, Copy)]
struct RateWindow {
    started: Instant,
    count: u32,
}

/// In-memory [`Handles`] implementation backing the demo binary. Not a production persistence
/// layer: the spec models the store, upstream daemon and rate limiter as opaque injected
/// collaborators out of this engine's scope, so this is the simplest double that lets the
/// accept loop actually run end to end.
pub struct MemoryStore {
    accounts: DashMap<AccountId, Account>,
    shares: DashMap<AccountId, Vec<Share>>,
    accepted: DashMap<BlockHash, AcceptedWork>,
    current_work: parking_lot::RwLock<String>,
    rate_limits: DashMap<std::net::IpAddr, RateWindow>,
    rate_limit_count: u32,
    rate_limit_window: Duration,
    removed: DashMap<ClientToken, ()>,
    default_variant: MinerVariant,
}

impl MemoryStore {
    pub fn new(
        rate_limit_count: u32,
        rate_limit_window: Duration,
        default_variant: MinerVariant,
    ) -> Self {
        Self {
            accounts: DashMap::new(),
            shares: DashMap::new(),
            accepted: DashMap::new(),
            current_work: parking_lot::RwLock::new(synthesize_work(1)),
            rate_limits: DashMap::new(),
            rate_limit_count,
            rate_limit_window,
            removed: DashMap::new(),
            default_variant,
        }
    }

    /// Spawns a task that advances the synthetic work template on a fixed period, standing in
    /// for a real chain-tip/ZMQ-driven block template source.
    pub fn spawn_work_generator(
        self: &Arc<Self>,
        period: Duration,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut height = 1u32;
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                height = height.wrapping_add(1);
                *store.current_work.write() = synthesize_work(height);
                debug!(height, "advanced synthetic work template");
            }
        })
    }

    pub fn share_count(&self, account: &AccountId) -> usize {
        self.shares.get(account).map(|shares| shares.len()).unwrap_or(0)
    }

    pub fn is_removed(&self, token: &ClientToken) -> bool {
        self.removed.contains_key(token)
    }
}

#[async_trait::async_trait]
impl Handles for MemoryStore {
    async fn fetch_miner(&self, _extranonce1: &str) -> std::result::Result<MinerVariant, StoreError> {
        Ok(self.default_variant)
    }

    async fn fetch_account(&self, id: &AccountId) -> std::result::Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(id).map(|entry| entry.clone()))
    }

    async fn create_account(&self, account: Account) -> std::result::Result<(), StoreError> {
        self.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn record_share(&self, share: Share) -> std::result::Result<(), StoreError> {
        self.shares.entry(share.account.clone()).or_default().push(share);
        Ok(())
    }

    async fn record_accepted_work(&self, work: AcceptedWork) -> std::result::Result<(), StoreError> {
        match self.accepted.entry(work.block_hash.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::Conflict),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(work);
                Ok(())
            }
        }
    }

    async fn submit_work(&self, header_hex: &str) -> std::result::Result<bool, StoreError> {
        info!(len = header_hex.len(), "submitted header to upstream daemon (stub)");
        Ok(true)
    }

    async fn fetch_current_work(&self) -> std::result::Result<String, StoreError> {
        Ok(self.current_work.read().clone())
    }

    async fn within_limit(&self, addr: std::net::SocketAddr, _class: RateLimitClass) -> bool {
        let mut window = self
            .rate_limits
            .entry(addr.ip())
            .or_insert_with(|| RateWindow {
                started: Instant::now(),
                count: 0,
            });

        if window.started.elapsed() >= self.rate_limit_window {
            window.started = Instant::now();
            window.count = 0;
        }

        window.count += 1;
        window.count <= self.rate_limit_count
    }

    async fn remove_client(&self, token: ClientToken) {
        self.removed.insert(token, ());
    }
}

#[cfg(test)]
mod tests {
    use {super::*, stratum::Username};

    const ADDRESS: &str = "SsWKp7wtdTZYabYFYSc9cnxhwFEjA5g4pFc";

    #[tokio::test]
    async fn account_round_trips() {
        let store = MemoryStore::new(10, Duration::from_secs(1), MinerVariant::Cpu);
        let parsed = Username::new(format!("{ADDRESS}.rig1"))
            .parse_pool(ActiveNet::Mainnet)
            .unwrap();

        assert!(store.fetch_account(&parsed.account).await.unwrap().is_none());
        store
            .create_account(Account {
                id: parsed.account.clone(),
            })
            .await
            .unwrap();
        assert!(store.fetch_account(&parsed.account).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_accepted_work_conflicts() {
        let store = MemoryStore::new(10, Duration::from_secs(1), MinerVariant::Cpu);
        let hash = BlockHash::compute(b"test header bytes");
        let work = AcceptedWork {
            block_hash: hash,
            height: 1,
            account: None,
        };
        store.record_accepted_work(work.clone()).await.unwrap();
        assert_eq!(
            store.record_accepted_work(work).await.unwrap_err(),
            StoreError::Conflict
        );
    }

    #[tokio::test]
    async fn rate_limit_resets_after_window() {
        let store = MemoryStore::new(1, Duration::from_millis(20), MinerVariant::Cpu);
        let addr: std::net::SocketAddr = "127.0.0.1:1".parse().unwrap();

        assert!(store.within_limit(addr, RateLimitClass::PoolClient).await);
        assert!(!store.within_limit(addr, RateLimitClass::PoolClient).await);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(store.within_limit(addr, RateLimitClass::PoolClient).await);
    }

    #[tokio::test]
    async fn share_count_and_removal_tracking() {
        let store = MemoryStore::new(10, Duration::from_secs(1), MinerVariant::Cpu);
        let parsed = Username::new(format!("{ADDRESS}.rig1"))
            .parse_pool(ActiveNet::Mainnet)
            .unwrap();

        assert_eq!(store.share_count(&parsed.account), 0);
        store
            .record_share(Share {
                account: parsed.account.clone(),
                workername: parsed.workername,
                weight: BigRational::from_integer(1u32.into()),
                difficulty: BigRational::from_integer(1u32.into()),
            })
            .await
            .unwrap();
        assert_eq!(store.share_count(&parsed.account), 1);

        let token = ClientToken("test".into());
        assert!(!store.is_removed(&token));
        store.remove_client(token.clone()).await;
        assert!(store.is_removed(&token));
    }
}
