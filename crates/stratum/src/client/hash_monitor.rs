use super::*;

/// Ticks every `hash_calc_threshold` seconds, converting the submission count since the last
/// tick into a hash-rate sample and folding it into the client's exponentially smoothed
/// estimate, per §4.5. The divisor used in the formula is deliberately the same
/// `hash_calc_threshold` constant as the ticker period; this mirrors source behavior and is
/// preserved even though the two could in principle differ (see DESIGN.md Open Question O1).
pub(super) async fn run(
    state: Arc<ClientState>,
    submissions: Arc<AtomicU64>,
    hash_calc_threshold: u64,
    nonce_iterations: u64,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(hash_calc_threshold));
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let count = submissions.swap(0, Ordering::Relaxed);
        if count == 0 {
            continue;
        }

        let Some(difficulty) = state.difficulty() else {
            continue;
        };

        let average = BigRational::new(hash_calc_threshold.into(), count.into());
        let hash = &difficulty.difficulty * BigRational::from_integer(nonce_iterations.into())
            / average;

        state.update_hash_rate(hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tick_with_no_submissions_leaves_hash_rate_unchanged() {
        let state = Arc::new(ClientState::new(Extranonce::generate(4)));
        let submissions = Arc::new(AtomicU64::new(0));
        let cancel = CancellationToken::new();

        cancel.cancel();
        run(state.clone(), submissions, 1, 1 << 32, cancel).await;

        assert_eq!(state.hash_rate(), BigRational::from_integer(0u32.into()));
    }
}
