use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitClass {
    PoolClient,
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum StoreError {
    #[snafu(display("record already exists"))]
    Conflict,
    #[snafu(display("storage error: {message}"))]
    Other { message: String },
}

/// The capability bundle injected into the engine: everything outside the scope of this crate
/// that the protocol state machine nonetheless needs to call through. Modeled as a single
/// object-safe trait (an `Arc<dyn Handles>`) rather than separate function-valued fields, so the
/// whole bundle can be swapped for a test double in one place.
#[async_trait::async_trait]
pub trait Handles: Send + Sync {
    /// Looks up the hardware variant driving this connection's subscribe shaping (§4.3) and
    /// notify rewriting (§4.4), keyed by its extranonce1.
    async fn fetch_miner(&self, extranonce1: &str) -> Result<MinerVariant, StoreError>;

    /// Looks up an existing account by id, `None` if it does not exist yet.
    async fn fetch_account(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;

    /// Persists a newly seen account.
    async fn create_account(&self, account: Account) -> Result<(), StoreError>;

    /// Appends a weighted share credit.
    async fn record_share(&self, share: Share) -> Result<(), StoreError>;

    /// Persists an accepted-work record; returns `Conflict` if this block hash was already
    /// recorded.
    async fn record_accepted_work(&self, work: AcceptedWork) -> Result<(), StoreError>;

    /// Submits a solved header to the upstream consensus daemon; returns whether it was
    /// accepted.
    async fn submit_work(&self, header_hex: &str) -> Result<bool, StoreError>;

    /// Fetches the current work-template hex, or an empty string if none is available yet.
    async fn fetch_current_work(&self) -> Result<String, StoreError>;

    /// Rate limiter check; `true` means the request may proceed.
    async fn within_limit(&self, addr: std::net::SocketAddr, class: RateLimitClass) -> bool;

    /// Invoked exactly once by the supervisor after all four tasks have exited.
    async fn remove_client(&self, token: ClientToken);
}
