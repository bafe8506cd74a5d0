use {
    super::*,
    num_traits::Zero,
    std::{collections::HashMap, time::Duration},
    tracing::{debug, warn},
};

pub(super) struct ProcessorContext {
    pub addr: SocketAddr,
    pub token: ClientToken,
    pub config: ClientConfig,
    pub handles: Arc<dyn Handles>,
    pub state: Arc<ClientState>,
    pub extranonce1: Extranonce,
    pub inbound_rx: mpsc::Receiver<Message>,
    pub outbound_tx: mpsc::Sender<Message>,
    pub submissions: Arc<AtomicU64>,
    pub cancel: CancellationToken,
}

/// Single-task protocol state machine: consumes decoded inbound messages in order, drives
/// authorize/subscribe/submit, and enqueues outgoing responses and notifications, per §4.3.
pub(super) async fn run(mut ctx: ProcessorContext) {
    ctx.state.set_difficulty(DifficultyInfo::from_difficulty(
        BigRational::from_integer(1u32.into()),
        ctx.config.pow_limit.clone(),
    ));

    let mut jobs: HashMap<JobId, Arc<Job>> = HashMap::new();

    loop {
        let message = tokio::select! {
            _ = ctx.cancel.cancelled() => break,
            message = ctx.inbound_rx.recv() => match message {
                Some(message) => message,
                None => break,
            },
        };

        match message {
            Message::Request { id, method, params } => {
                let allowed = ctx
                    .handles
                    .within_limit(ctx.addr, RateLimitClass::PoolClient)
                    .await;

                let outcome = match method.as_str() {
                    "mining.authorize" => handle_authorize(&ctx, params, allowed).await,
                    "mining.subscribe" => handle_subscribe(&ctx, params).await,
                    "mining.submit" => handle_submit(&ctx, params, &jobs, allowed).await,
                    other => {
                        warn!(
                            token = %ctx.token.0,
                            method = other,
                            "unknown method, dropping connection"
                        );
                        break;
                    }
                };

                let became_ready = matches!(method.as_str(), "mining.authorize" | "mining.subscribe")
                    && outcome.is_ok()
                    && ctx.state.is_ready();
                let result = match &outcome {
                    Ok(value) => Some(value.clone()),
                    Err(_) => Some(Value::Bool(false)),
                };

                let response = Message::Response {
                    id,
                    result,
                    error: outcome.err(),
                };

                if ctx.outbound_tx.send(response).await.is_err() {
                    break;
                }

                if became_ready {
                    send_set_difficulty(&ctx).await;
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    update_work(&ctx, &mut jobs, allowed).await;
                } else if method == "mining.submit" {
                    update_work(&ctx, &mut jobs, allowed).await;
                }
            }
            Message::Response { .. } => {
                debug!("unsolicited response from client, dropping connection");
                break;
            }
            Message::Notification { method, .. } => {
                debug!(%method, "unexpected notification from client, dropping connection");
                break;
            }
        }
    }

    ctx.cancel.cancel();
}

async fn handle_authorize(
    ctx: &ProcessorContext,
    params: Value,
    allowed: bool,
) -> std::result::Result<Value, StratumError> {
    if !allowed {
        return Err(StratumError::unknown());
    }

    let authorize: Authorize =
        serde_json::from_value(params).map_err(|_| StratumError::unknown())?;

    let username = Username::new(authorize.username);

    if ctx.config.solo_pool {
        let workername = username.parse_solo().map_err(|_| StratumError::unknown())?;
        ctx.state.mark_authorized(None, Some(workername));
    } else {
        let parsed = username
            .parse_pool(ctx.config.active_net)
            .map_err(|_| StratumError::unknown())?;

        match ctx.handles.fetch_account(&parsed.account).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                ctx.handles
                    .create_account(Account {
                        id: parsed.account.clone(),
                    })
                    .await
                    .map_err(|_| StratumError::unknown())?;
            }
            Err(_) => return Err(StratumError::unknown()),
        }

        ctx.state
            .mark_authorized(Some(parsed.account), Some(parsed.workername));
    }

    Ok(Value::Bool(true))
}

async fn handle_subscribe(
    ctx: &ProcessorContext,
    params: Value,
) -> std::result::Result<Value, StratumError> {
    let subscribe: Subscribe = serde_json::from_value(params).map_err(|_| StratumError::unknown())?;

    let extranonce1_hex = ctx.extranonce1.to_hex();
    let variant = ctx
        .handles
        .fetch_miner(&extranonce1_hex)
        .await
        .map_err(|_| StratumError::unknown())?;

    let notify_id = subscribe
        .notify_id
        .unwrap_or_else(|| format!("mn{extranonce1_hex}"));

    let (extranonce1, extranonce2_size) = variant.subscribe_shape(&extranonce1_hex, 4);

    ctx.state.mark_subscribed(variant);

    Ok(serde_json::to_value(SubscribeResult {
        notify_id,
        extranonce1,
        extranonce2_size,
    })
    .unwrap())
}

async fn handle_submit(
    ctx: &ProcessorContext,
    params: Value,
    jobs: &HashMap<JobId, Arc<Job>>,
    allowed: bool,
) -> std::result::Result<Value, StratumError> {
    if !allowed {
        return Err(StratumError::unknown());
    }

    let submit: Submit = serde_json::from_value(params).map_err(|_| StratumError::unknown())?;

    let job = jobs.get(&submit.job_id).ok_or_else(StratumError::job_not_found)?;

    let header_hex = splice_solution(job, &ctx.extranonce1, &submit)
        .map_err(|_| StratumError::unknown())?;

    let header_bytes = Vec::from_hex(&header_hex).map_err(|_| StratumError::unknown())?;

    let nbits_hex = job.work.nbits();
    let nbits = u32::from_str_radix(nbits_hex, 16).map_err(|_| StratumError::unknown())?;
    let target_net_int = compact_to_target(nbits);

    if target_net_int.is_zero() {
        return Err(StratumError::unknown());
    }

    let Some(difficulty) = ctx.state.difficulty() else {
        return Err(StratumError::unknown());
    };

    let hash = BlockHash::compute(&header_bytes);
    let hash_target = BigRational::from_integer(hash.to_biguint().into());
    let target_net = BigRational::from_integer(target_net_int.into());

    if hash_target > difficulty.target {
        return Err(StratumError::low_difficulty_share());
    }

    ctx.submissions.fetch_add(1, Ordering::Relaxed);

    if !ctx.config.solo_pool
        && let Some(account) = ctx.state.account()
    {
        let share = Share {
            account,
            workername: ctx.state.workername().unwrap_or_default(),
            weight: ctx.state.variant().share_weight(),
            difficulty: difficulty.difficulty.clone(),
        };

        if ctx.handles.record_share(share).await.is_err() {
            return Err(StratumError::unknown());
        }
    }

    if hash_target > target_net {
        return Ok(Value::Bool(true));
    }

    let mut submission = header_bytes;
    submission.extend_from_slice(&ctx.config.blake256_pad);
    let submission_hex = hex::encode(submission);

    let accepted = match ctx.handles.submit_work(&submission_hex).await {
        Ok(accepted) => accepted,
        Err(_) => return Err(StratumError::unknown()),
    };

    if accepted {
        let record = AcceptedWork {
            block_hash: hash,
            height: job.height,
            account: ctx.state.account(),
        };

        match ctx.handles.record_accepted_work(record).await {
            Ok(()) => Ok(Value::Bool(true)),
            Err(StoreError::Conflict) => Err(StratumError::duplicate_share()),
            Err(_) => Err(StratumError::unknown()),
        }
    } else {
        Ok(Value::Bool(false))
    }
}

fn splice_solution(
    job: &Job,
    extranonce1: &Extranonce,
    submit: &Submit,
) -> std::result::Result<String, HexUtilError> {
    let mut raw = job.work.raw.clone();

    let ntime = if submit.ntime.len() == 8 {
        submit.ntime.clone()
    } else {
        job.work.ntime().to_string()
    };
    raw.replace_range(CURRENT_WORK_NTIME_OFFSET.0..CURRENT_WORK_NTIME_OFFSET.1, &ntime);

    let extranonce1_hex = extranonce1.to_hex();
    let extranonce1_hex = pad_or_truncate(&extranonce1_hex, 8);
    raw.replace_range(
        SPLICE_EXTRANONCE1_OFFSET.0..SPLICE_EXTRANONCE1_OFFSET.1,
        &extranonce1_hex,
    );

    let extranonce2_hex = pad_or_truncate(&submit.extranonce2.to_hex(), 8);
    raw.replace_range(
        SPLICE_EXTRANONCE2_OFFSET.0..SPLICE_EXTRANONCE2_OFFSET.1,
        &extranonce2_hex,
    );

    let nonce_hex = pad_or_truncate(&submit.nonce, 8);
    raw.replace_range(SPLICE_NONCE_OFFSET.0..SPLICE_NONCE_OFFSET.1, &nonce_hex);

    Ok(raw)
}

fn pad_or_truncate(hex: &str, len: usize) -> String {
    if hex.len() >= len {
        hex[..len].to_string()
    } else {
        format!("{:0<width$}", hex, width = len)
    }
}

async fn send_set_difficulty(ctx: &ProcessorContext) {
    let Some(difficulty) = ctx.state.difficulty() else {
        return;
    };

    let message = Message::Notification {
        method: "mining.set_difficulty".into(),
        params: serde_json::to_value(SetDifficulty(difficulty.difficulty)).unwrap(),
    };

    let _ = ctx.outbound_tx.send(message).await;
}

/// Fetches fresh work and enqueues a `mining.notify`, unless the client is not yet ready, the
/// rate limiter denied the triggering request, or no work is available. The enqueue is
/// non-blocking: a stale update is worse than a dropped one, per §4.3.
async fn update_work(ctx: &ProcessorContext, jobs: &mut HashMap<JobId, Arc<Job>>, allowed: bool) {
    if !ctx.state.is_ready() || !allowed {
        return;
    }

    let Ok(work_hex) = ctx.handles.fetch_current_work().await else {
        return;
    };

    if work_hex.is_empty() {
        return;
    }

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0);

    let work = CurrentWork::new(work_hex).with_ntime(now);
    let job = Arc::new(Job::new(work));
    jobs.insert(job.id, job.clone());

    let notify = Notify::from_job(&job, true);
    let message = Message::Notification {
        method: "mining.notify".into(),
        params: serde_json::to_value(notify).unwrap(),
    };

    let _ = ctx.outbound_tx.try_send(message);
}
