use super::*;

/// The single mutable state envelope shared by the four tasks, per the design note preferring
/// one guarded envelope over a mutex per field. `submissions` lives outside this envelope as its
/// own atomic (see `ClientConfig`/`run`) since it is incremented from the hot submit path and
/// read by the hash monitor without needing the rest of the state.
struct Inner {
    authorized: bool,
    subscribed: bool,
    account: Option<AccountId>,
    workername: Option<String>,
    variant: MinerVariant,
    hash_rate: BigRational,
    difficulty: Option<DifficultyInfo>,
}

pub struct ClientState {
    extranonce1: Extranonce,
    inner: parking_lot::Mutex<Inner>,
}

impl ClientState {
    pub fn new(extranonce1: Extranonce) -> Self {
        Self {
            extranonce1,
            inner: parking_lot::Mutex::new(Inner {
                authorized: false,
                subscribed: false,
                account: None,
                workername: None,
                variant: MinerVariant::Cpu,
                hash_rate: BigRational::from_integer(0u32.into()),
                difficulty: None,
            }),
        }
    }

    pub fn extranonce1(&self) -> &Extranonce {
        &self.extranonce1
    }

    pub fn is_authorized(&self) -> bool {
        self.inner.lock().authorized
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.lock().subscribed
    }

    pub fn is_ready(&self) -> bool {
        let inner = self.inner.lock();
        inner.authorized && inner.subscribed
    }

    pub fn mark_authorized(&self, account: Option<AccountId>, workername: Option<String>) {
        let mut inner = self.inner.lock();
        inner.authorized = true;
        inner.account = account;
        inner.workername = workername;
    }

    pub fn mark_subscribed(&self, variant: MinerVariant) {
        let mut inner = self.inner.lock();
        inner.subscribed = true;
        inner.variant = variant;
    }

    pub fn account(&self) -> Option<AccountId> {
        self.inner.lock().account.clone()
    }

    pub fn workername(&self) -> Option<String> {
        self.inner.lock().workername.clone()
    }

    pub fn variant(&self) -> MinerVariant {
        self.inner.lock().variant
    }

    pub fn set_difficulty(&self, difficulty: DifficultyInfo) {
        self.inner.lock().difficulty = Some(difficulty);
    }

    pub fn difficulty(&self) -> Option<DifficultyInfo> {
        self.inner.lock().difficulty.clone()
    }

    pub fn hash_rate(&self) -> BigRational {
        self.inner.lock().hash_rate.clone()
    }

    /// Applies the hash-rate monitor's exponential smoothing update.
    pub fn update_hash_rate(&self, sample: BigRational) {
        let mut inner = self.inner.lock();
        let two = BigRational::from_integer(2u32.into());
        inner.hash_rate = (&inner.hash_rate + sample) / two;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unauthorized_and_unsubscribed() {
        let state = ClientState::new(Extranonce::generate(4));
        assert!(!state.is_authorized());
        assert!(!state.is_subscribed());
        assert!(!state.is_ready());
    }

    #[test]
    fn ready_only_once_both_flags_set() {
        let state = ClientState::new(Extranonce::generate(4));
        state.mark_authorized(None, Some("rig1".into()));
        assert!(!state.is_ready());
        state.mark_subscribed(MinerVariant::Cpu);
        assert!(state.is_ready());
    }

    #[test]
    fn hash_rate_smooths_toward_sample() {
        let state = ClientState::new(Extranonce::generate(4));
        state.update_hash_rate(BigRational::from_integer(10u32.into()));
        assert_eq!(state.hash_rate(), BigRational::new(5u32.into(), 1u32.into()));
    }
}
