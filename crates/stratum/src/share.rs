use super::*;

/// A persisted account, created lazily on first pool-mode authorize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
}

/// A weighted credit recorded for a submission that met pool difficulty.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub account: AccountId,
    pub workername: String,
    pub weight: BigRational,
    pub difficulty: BigRational,
}

/// A submission that solved a network block and was accepted upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AcceptedWork {
    pub block_hash: BlockHash,
    pub height: u32,
    pub account: Option<AccountId>,
}
