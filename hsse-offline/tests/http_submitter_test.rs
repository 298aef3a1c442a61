//! HttpSubmitter against a local stub endpoint: headers, response mapping,
//! and the resend policy (only failed connects are resent).

#![cfg(feature = "remote")]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use hsse_core::config::{OfflineConfig, RemoteConfig};
use hsse_core::errors::{HsseError, SubmitError};
use hsse_core::models::{HsseMutation, SubmitReceipt, SyncStatus};
use hsse_core::traits::{INotifier, IRemoteSubmitter};
use hsse_offline::{HttpSubmitter, NetworkMonitor, OfflineQueue};
use test_fixtures::{permit, FlakyStore, RecordingNotifier};

#[derive(Clone, Copy)]
enum Reply {
    Status(u16, &'static str),
    /// Read the request, never answer.
    Stall,
}

struct StubRemote {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubRemote {
    async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let (task_hits, task_requests) = (Arc::clone(&hits), Arc::clone(&requests));
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let request = read_request(&mut sock).await;
                task_requests.lock().unwrap().push(request);
                task_hits.fetch_add(1, Ordering::SeqCst);
                match reply {
                    Reply::Status(code, body) => {
                        let response = format!(
                            "HTTP/1.1 {code} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                            body.len()
                        );
                        let _ = sock.write_all(response.as_bytes()).await;
                        let _ = sock.shutdown().await;
                    }
                    Reply::Stall => {
                        tokio::time::sleep(Duration::from_secs(10)).await;
                    }
                }
            }
        });

        Self {
            addr,
            hits,
            requests,
        }
    }

    fn config(&self) -> RemoteConfig {
        RemoteConfig {
            base_url: format!("http://{}", self.addr),
            api_key: Some("secret-key".into()),
            timeout_ms: 2_000,
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            ..Default::default()
        }
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Requests seen so far, lowercased.
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Read one HTTP/1.1 request: head plus a `content-length` body.
async fn read_request(sock: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = sock.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_lowercase();
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_lowercase()
}

async fn submit(config: RemoteConfig, local_id: &str) -> Result<SubmitReceipt, SubmitError> {
    let submitter = HttpSubmitter::new(config).unwrap();
    submitter.submit(local_id, &permit("P1")).await
}

#[tokio::test]
async fn success_sends_headers_and_reads_remote_id() {
    let remote = StubRemote::start(Reply::Status(201, r#"[{"id":"srv-17"}]"#)).await;

    let receipt = submit(remote.config(), "local-abc").await.unwrap();

    assert_eq!(receipt.remote_id.as_deref(), Some("srv-17"));
    assert_eq!(remote.hits(), 1);
    let request = &remote.requests()[0];
    assert!(request.starts_with("post /rest/v1/ptw_permits http/1.1"));
    assert!(request.contains("idempotency-key: local-abc"));
    assert!(request.contains("authorization: bearer secret-key"));
    assert!(request.contains("content-type: application/json"));
    assert!(request.contains(r#""kind":"create_permit""#));
    assert!(request.contains(r#""project_id":"p1""#));
}

#[tokio::test]
async fn idempotency_key_can_be_disabled() {
    let remote = StubRemote::start(Reply::Status(200, "{}")).await;
    let config = RemoteConfig {
        send_idempotency_key: false,
        ..remote.config()
    };

    let receipt = submit(config, "local-abc").await.unwrap();

    assert_eq!(receipt.remote_id, None);
    assert!(!remote.requests()[0].contains("idempotency-key"));
}

#[tokio::test]
async fn client_error_fails_after_one_request() {
    let remote = StubRemote::start(Reply::Status(422, r#"{"message":"missing project"}"#)).await;

    let err = submit(remote.config(), "local-abc").await.unwrap_err();

    assert!(matches!(err, SubmitError::Rejected { status: 422, .. }));
    assert_eq!(remote.hits(), 1);
}

#[tokio::test]
async fn server_error_is_not_resent() {
    let remote = StubRemote::start(Reply::Status(500, "{}")).await;

    let err = submit(remote.config(), "local-abc").await.unwrap_err();

    assert!(matches!(err, SubmitError::Rejected { status: 500, .. }));
    assert_eq!(remote.hits(), 1);
}

#[tokio::test]
async fn timeout_is_reported_and_not_resent() {
    let remote = StubRemote::start(Reply::Stall).await;
    let config = RemoteConfig {
        timeout_ms: 100,
        ..remote.config()
    };

    let err = submit(config, "local-abc").await.unwrap_err();

    assert_eq!(err, SubmitError::Timeout);
    assert_eq!(remote.hits(), 1);
}

#[tokio::test]
async fn refused_connection_is_unreachable() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let config = RemoteConfig {
        base_url: format!("http://{addr}"),
        max_retries: 2,
        initial_backoff_ms: 1,
        max_backoff_ms: 5,
        ..Default::default()
    };

    let err = submit(config, "local-abc").await.unwrap_err();

    assert!(matches!(err, SubmitError::Unreachable { .. }), "{err:?}");
    assert!(err.is_safe_to_resend());
}

#[tokio::test]
async fn direct_submit_rejection_is_a_single_write() {
    let remote = StubRemote::start(Reply::Status(500, "{}")).await;
    let queue: OfflineQueue<HsseMutation, FlakyStore, HttpSubmitter> = OfflineQueue::open(
        Arc::new(FlakyStore::new()),
        Arc::new(HttpSubmitter::new(remote.config()).unwrap()),
        Arc::new(RecordingNotifier::new()) as Arc<dyn INotifier>,
        NetworkMonitor::new(true),
        OfflineConfig::default(),
    )
    .await
    .unwrap();

    let err = queue.enqueue_or_submit(permit("P1")).await.unwrap_err();

    assert!(matches!(
        err,
        HsseError::Submission(SubmitError::Rejected { status: 500, .. })
    ));
    assert_eq!(remote.hits(), 1);
    assert_eq!(queue.pending_count().await, 0);
}

#[tokio::test]
async fn sync_attempt_is_a_single_write_per_item() {
    let remote = StubRemote::start(Reply::Status(503, "{}")).await;
    let network = NetworkMonitor::new(false);
    let queue: OfflineQueue<HsseMutation, FlakyStore, HttpSubmitter> = OfflineQueue::open(
        Arc::new(FlakyStore::new()),
        Arc::new(HttpSubmitter::new(remote.config()).unwrap()),
        Arc::new(RecordingNotifier::new()) as Arc<dyn INotifier>,
        network.clone(),
        OfflineConfig::default(),
    )
    .await
    .unwrap();
    let local_id = queue.enqueue(permit("P1")).await.unwrap();
    network.go_online();

    let report = queue.sync_all().await.unwrap();

    assert_eq!((report.synced, report.failed), (0, 1));
    assert_eq!(remote.hits(), 1);
    let item = queue.get(&local_id).await.unwrap();
    assert_eq!(item.sync_status, SyncStatus::Failed);
    assert!(item.sync_error.unwrap().contains("HTTP 503"));
}
