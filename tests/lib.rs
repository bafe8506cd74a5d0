use {
    clap::Parser,
    serde_json::{Value, json},
    std::time::Duration,
    stratum_pool::Options,
    tokio::{
        io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
        net::TcpStream,
    },
    tokio_util::sync::CancellationToken,
};

async fn spawn_server(extra_args: &[&str]) -> (std::net::SocketAddr, CancellationToken) {
    let mut args = vec!["stratum-pool", "--port", "0"];
    args.extend_from_slice(extra_args);

    let options = Options::try_parse_from(args).unwrap();
    let (listener, settings) = stratum_pool::bind(options).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let cancel = CancellationToken::new();
    let server_cancel = cancel.clone();
    tokio::spawn(async move {
        stratum_pool::serve(listener, settings, server_cancel)
            .await
            .unwrap();
    });

    (addr, cancel)
}

async fn read_line(reader: &mut BufReader<tokio::net::tcp::OwnedReadHalf>) -> Value {
    let mut line = String::new();
    tokio::time::timeout(Duration::from_secs(5), reader.read_line(&mut line))
        .await
        .expect("timed out waiting for a response")
        .unwrap();
    serde_json::from_str(&line).unwrap()
}

#[tokio::test]
async fn authorize_subscribe_and_submit_round_trip() {
    let (addr, cancel) = spawn_server(&["--pow-limit", &"f".repeat(64)]).await;

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    write_half
        .write_all(
            json!({"id": 1, "method": "mining.authorize", "params": ["SsWKp7wtdTZYabYFYSc9cnxhwFEjA5g4pFc.rig1", "x"]})
                .to_string()
                .as_bytes(),
        )
        .await
        .unwrap();
    write_half.write_all(b"\n").await.unwrap();

    let response = read_line(&mut reader).await;
    assert_eq!(response["result"], json!(true));
    assert_eq!(response["error"], Value::Null);

    write_half
        .write_all(
            json!({"id": 2, "method": "mining.subscribe", "params": ["cpuminer/1.0"]})
                .to_string()
                .as_bytes(),
        )
        .await
        .unwrap();
    write_half.write_all(b"\n").await.unwrap();

    let response = read_line(&mut reader).await;
    assert!(response["result"].is_array());

    let set_difficulty = read_line(&mut reader).await;
    assert_eq!(set_difficulty["method"], "mining.set_difficulty");

    let notify = read_line(&mut reader).await;
    assert_eq!(notify["method"], "mining.notify");
    let job_id = notify["params"][0].as_str().unwrap().to_string();

    write_half
        .write_all(
            json!({
                "id": 3,
                "method": "mining.submit",
                "params": ["SsWKp7wtdTZYabYFYSc9cnxhwFEjA5g4pFc.rig1", job_id, "00000000", "00000000", "00000000"],
            })
            .to_string()
            .as_bytes(),
        )
        .await
        .unwrap();
    write_half.write_all(b"\n").await.unwrap();

    let response = read_line(&mut reader).await;
    assert_eq!(response["id"], json!(3));
    assert!(response["result"].is_boolean());

    cancel.cancel();
}

#[tokio::test]
async fn unknown_method_terminates_the_connection() {
    let (addr, cancel) = spawn_server(&[]).await;

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    write_half
        .write_all(
            json!({"id": 1, "method": "mining.unknown", "params": []})
                .to_string()
                .as_bytes(),
        )
        .await
        .unwrap();
    write_half.write_all(b"\n").await.unwrap();

    let mut line = String::new();
    let read = tokio::time::timeout(Duration::from_secs(5), reader.read_line(&mut line))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read, 0, "connection should be closed without a response");

    cancel.cancel();
}

#[tokio::test]
async fn malformed_pool_mode_username_is_rejected() {
    let (addr, cancel) = spawn_server(&[]).await;

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    write_half
        .write_all(
            json!({"id": 1, "method": "mining.authorize", "params": ["onlyaddress", "x"]})
                .to_string()
                .as_bytes(),
        )
        .await
        .unwrap();
    write_half.write_all(b"\n").await.unwrap();

    let response = read_line(&mut reader).await;
    assert_eq!(response["result"], json!(false));
    assert_eq!(response["error"][0], json!(20));

    cancel.cancel();
}
