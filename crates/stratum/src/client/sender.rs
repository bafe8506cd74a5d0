use {
    super::*,
    tokio::net::tcp::OwnedWriteHalf,
    tracing::warn,
};

/// Drains the outgoing channel and writes one JSON line per message. `mining.notify` requests
/// are rewritten for the client's miner variant and dropped unless the client is both authorized
/// and subscribed, per §4.4.
pub(super) async fn run(
    mut writer: BufWriter<OwnedWriteHalf>,
    mut outbound_rx: mpsc::Receiver<Message>,
    state: Arc<ClientState>,
    cancel: CancellationToken,
) {
    loop {
        let message = tokio::select! {
            _ = cancel.cancelled() => break,
            message = outbound_rx.recv() => match message {
                Some(message) => message,
                None => break,
            },
        };

        let message = match prepare(message, &state) {
            Some(message) => message,
            None => continue,
        };

        let mut line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "failed to encode outgoing message");
                cancel.cancel();
                break;
            }
        };
        line.push('\n');

        if let Err(err) = writer.write_all(line.as_bytes()).await {
            warn!(%err, "write error");
            break;
        }
        if let Err(err) = writer.flush().await {
            warn!(%err, "flush error");
            break;
        }
    }

    cancel.cancel();
}

/// Returns `None` when a `mining.notify` should be dropped (client not ready yet), `Some` with
/// the vendor-rewritten payload otherwise.
fn prepare(message: Message, state: &ClientState) -> Option<Message> {
    let Message::Notification { method, params } = &message else {
        return Some(message);
    };

    if method != "mining.notify" {
        return Some(message);
    }

    if !state.is_ready() {
        return None;
    }

    let mut notify: Notify = match serde_json::from_value(params.clone()) {
        Ok(notify) => notify,
        Err(err) => {
            warn!(%err, "failed to decode outgoing notify for rewrite");
            return None;
        }
    };

    if let Err(err) = state.variant().rewrite_notify(&mut notify) {
        warn!(%err, "failed to rewrite notify for miner variant");
        return None;
    }

    Some(Message::Notification {
        method: method.clone(),
        params: serde_json::to_value(notify).ok()?,
    })
}
