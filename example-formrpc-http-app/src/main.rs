use formrpc_service_caller::RpcServiceCallerInterface;
use formrpc_tokio_client::RpcClient;
use formrpc_tokio_server::{RequestContext, RpcServer};
use tokio::join;
use tokio::net::TcpListener;

/// The classic arithmetic demo service.
struct Arith;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Bind to a random available port
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    {
        let endpoint = RpcServer::builder(Arith)
            .method("Add", |_: &Arith, a: i64, b: i64| (a + b,))
            .method("Mult", |_: &Arith, a: i64, b: i64| (a * b,))
            .method("Peer", |_: &Arith, ctx: &RequestContext| {
                let peer = ctx
                    .remote_addr
                    .map(|addr| addr.to_string())
                    .unwrap_or_default();
                (peer,)
            })
            .build();

        // Spawn the server using the pre-bound listener
        let server = RpcServer::new(endpoint);
        let _server_task = tokio::spawn(async move {
            let _ = server.serve_with_listener(listener).await;
        });
    }

    {
        // Wait briefly for server to start
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        // Use the actual bound address for the client
        let rpc_client = RpcClient::new(&format!("http://{addr}"));

        // `join!` will await all responses before proceeding
        let (res1, res2, res3) = join!(
            rpc_client.call::<(i64, i64), (i64,)>("Add", (1, 2)),
            rpc_client.call::<(i64, i64), (i64,)>("Mult", (8, 3)),
            rpc_client.call::<(), (String,)>("Peer", ()),
        );

        println!("Result from add(): {:?}", res1);
        println!("Result from mult(): {:?}", res2);
        println!("Result from peer(): {:?}", res3);
    }
}
