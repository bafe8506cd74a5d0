use {
    super::*,
    tokio::net::tcp::OwnedReadHalf,
    tracing::{debug, warn},
};

/// Reads newline-delimited JSON lines off the socket, decodes them, and forwards the result to
/// the processor. Any read error, EOF, decode failure, oversize line, or stall past
/// `read_timeout` cancels the client (per spec §4.2, the 4-minute read deadline is this engine's
/// liveness check).
pub(super) async fn run(
    mut reader: BufReader<OwnedReadHalf>,
    inbound_tx: mpsc::Sender<Message>,
    cancel: CancellationToken,
    read_timeout: std::time::Duration,
) {
    let mut line = String::new();

    loop {
        line.clear();

        let read = tokio::select! {
            _ = cancel.cancelled() => break,
            result = tokio::time::timeout(read_timeout, reader.read_line(&mut line)) => result,
        };

        let bytes_read = match read {
            Ok(Ok(0)) => {
                debug!("connection closed by peer");
                break;
            }
            Ok(Ok(n)) => n,
            Ok(Err(err)) => {
                warn!(%err, "read error");
                break;
            }
            Err(_) => {
                debug!("read timed out");
                break;
            }
        };

        if bytes_read > MAX_LINE_LEN {
            warn!(bytes_read, "oversize line, dropping connection");
            break;
        }

        let value: serde_json::Value = match serde_json::from_str(line.trim_end()) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, %line, "invalid json");
                break;
            }
        };

        let message: Message = match serde_json::from_value(value) {
            Ok(message) => message,
            Err(err) => {
                warn!(%err, %line, "unidentifiable message");
                break;
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => break,
            result = inbound_tx.send(message) => {
                if result.is_err() {
                    break;
                }
            }
        }
    }

    cancel.cancel();
}
