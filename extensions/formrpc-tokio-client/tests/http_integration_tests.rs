use formrpc::{DEFAULT_RPC_PATH, ResponseCode};
use formrpc_service_caller::{RpcCallError, RpcServiceCallerInterface};
use formrpc_tokio_client::RpcClient;
use formrpc_tokio_server::{RequestContext, RpcServer};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::join;
use tokio::net::TcpListener;

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct Point {
    x: f64,
    y: f64,
}

/// The shared test service, mirroring the arithmetic example from the
/// crate docs.
struct Arith;

fn arith_server() -> RpcServer<Arith> {
    let endpoint = RpcServer::builder(Arith)
        .method("Add", |_: &Arith, a: i64, b: i64| (a + b,))
        .method("Mult", |_: &Arith, a: i64, b: i64| (a * b,))
        .method("DivMod", |_: &Arith, a: i64, b: i64| (a / b, a % b))
        .method("Sub", |_: &Arith, _ctx: &RequestContext, a: i64, b: i64| {
            (a - b,)
        })
        .method("Boom", |_: &Arith| -> () { panic!("Just panic!") })
        .method("Header", |_: &Arith, ctx: &RequestContext, name: String| {
            let value = ctx
                .headers
                .get(name.as_str())
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();
            (value,)
        })
        .method("Scale", |_: &Arith, p: Point, k: f64| {
            (Point {
                x: p.x * k,
                y: p.y * k,
            },)
        })
        .build();
    RpcServer::new(endpoint)
}

/// Spawns the arithmetic service on an ephemeral port and returns the base
/// URL once the listener is up.
async fn spawn_arith_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = arith_server();
    tokio::spawn(async move {
        let _ = server.serve_with_listener(listener).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    format!("http://{addr}")
}

#[tokio::test]
async fn test_success_client_server_roundtrip() {
    let base = spawn_arith_server().await;
    let client = RpcClient::new(&base);

    let (sum,): (i64,) = client.call("Add", (1i64, 2i64)).await.unwrap();
    assert_eq!(sum, 3);

    let (quotient, remainder): (i64, i64) = client.call("DivMod", (7i64, 2i64)).await.unwrap();
    assert_eq!((quotient, remainder), (3, 1));
}

#[tokio::test]
async fn test_context_method_addressed_by_positional_inputs_only() {
    let base = spawn_arith_server().await;
    let client = RpcClient::new(&base);

    // `Sub` declares three parameters after the service; callers supply
    // two because the context is provided by the transport.
    let (difference,): (i64,) = client.call("Sub", (2i64, 5i64)).await.unwrap();
    assert_eq!(difference, -3);
}

#[tokio::test]
async fn test_unknown_method_roundtrip() {
    let base = spawn_arith_server().await;
    let client = RpcClient::new(&base);

    let result: Result<(i64,), _> = client.call("Xyz", (1i64,)).await;
    let err = result.unwrap_err();
    match &err {
        RpcCallError::Remote { code, info } => {
            assert_eq!(*code, ResponseCode::UnknownMethod);
            assert_eq!(info, "Xyz");
        }
        other => panic!("expected Remote, got {:?}", other),
    }
    assert_eq!(err.code(), Some(ResponseCode::UnknownMethod));
}

#[tokio::test]
async fn test_panic_is_contained_and_server_keeps_serving() {
    let base = spawn_arith_server().await;
    let client = RpcClient::new(&base);

    let result: Result<(), _> = client.call("Boom", ()).await;
    match result.unwrap_err() {
        RpcCallError::Remote { code, info } => {
            assert_eq!(code, ResponseCode::Panic);
            assert_eq!(info, "Just panic!");
        }
        other => panic!("expected Remote, got {:?}", other),
    }

    // The same server instance must still answer afterwards.
    let (sum,): (i64,) = client.call("Add", (4i64, 5i64)).await.unwrap();
    assert_eq!(sum, 9);
}

#[tokio::test]
async fn test_context_method_observes_request_headers() {
    let base = spawn_arith_server().await;

    let mut default_headers = reqwest::header::HeaderMap::new();
    default_headers.insert(
        "x-trace",
        reqwest::header::HeaderValue::from_static("abc123"),
    );
    let http_client = reqwest::Client::builder()
        .default_headers(default_headers)
        .build()
        .unwrap();
    let client = RpcClient::with_http_client(http_client, &base, DEFAULT_RPC_PATH);

    let (value,): (String,) = client.call("Header", ("x-trace".to_string(),)).await.unwrap();
    assert_eq!(value, "abc123");
}

#[tokio::test]
async fn test_structured_arguments_roundtrip() {
    let base = spawn_arith_server().await;
    let client = RpcClient::new(&base);

    let (scaled,): (Point,) = client
        .call("Scale", (Point { x: 1.5, y: -2.0 }, 2.0f64))
        .await
        .unwrap();
    assert_eq!(scaled.x, 3.0);
    assert_eq!(scaled.y, -4.0);
}

#[tokio::test]
async fn test_concurrent_calls_do_not_interfere() {
    let base = spawn_arith_server().await;
    let client = RpcClient::new(&base);

    let (res1, res2, res3, res4, res5, res6) = join!(
        client.call::<(i64, i64), (i64,)>("Add", (1, 2)),
        client.call::<(i64, i64), (i64,)>("Add", (8, 3)),
        client.call::<(i64, i64), (i64,)>("Mult", (8, 3)),
        client.call::<(i64, i64), (i64,)>("Mult", (5, 5)),
        client.call::<(i64, i64), (i64,)>("Sub", (2, 5)),
        client.call::<(i64, i64), (i64,)>("Sub", (9, 1)),
    );

    assert_eq!(res1.unwrap().0, 3);
    assert_eq!(res2.unwrap().0, 11);
    assert_eq!(res3.unwrap().0, 24);
    assert_eq!(res4.unwrap().0, 25);
    assert_eq!(res5.unwrap().0, -3);
    assert_eq!(res6.unwrap().0, 8);
}

#[tokio::test]
async fn test_custom_registration_path() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let endpoint = RpcServer::builder(Arith)
        .method("Add", |_: &Arith, a: i64, b: i64| (a + b,))
        .build();
    let server = RpcServer::with_path(endpoint, "/rpc");
    tokio::spawn(async move {
        let _ = server.serve_with_listener(listener).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = RpcClient::with_path(&format!("http://{addr}"), "/rpc");
    let (sum,): (i64,) = client.call("Add", (1i64, 2i64)).await.unwrap();
    assert_eq!(sum, 3);

    // The default path is not registered on this server.
    let wrong_path = RpcClient::new(&format!("http://{addr}"));
    let result: Result<(i64,), _> = wrong_path.call("Add", (1i64, 2i64)).await;
    match result.unwrap_err() {
        // axum answers 404 for unrouted paths, which the caller reports as
        // a transport-level status failure.
        RpcCallError::Status { status } => assert_eq!(status, 404),
        other => panic!("expected Status, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_success_status_maps_to_server_error() {
    // A route that answers 500 at the RPC path stands in for
    // infrastructure failing in front of the dispatcher.
    let app = axum::Router::new().route(
        DEFAULT_RPC_PATH,
        axum::routing::post(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = RpcClient::new(&format!("http://{addr}"));
    let result: Result<(i64,), _> = client.call("Add", (1i64, 2i64)).await;

    let err = result.unwrap_err();
    match &err {
        RpcCallError::Status { status } => assert_eq!(*status, 500),
        other => panic!("expected Status, got {:?}", other),
    }
    assert_eq!(err.code(), Some(ResponseCode::ServerError));
    assert!(err.to_string().contains("500"));
}
