//! # Integration Tests
//!
//! End-to-end tests across crates.
//!
//! Covers:
//! - Config file to running coordinator
//! - Queue -> FlushCoordinator -> HTTP collector over a real socket
//! - Loss semantics under collector failure and deadline expiry

#[cfg(test)]
mod collector {
    //! Minimal HTTP collector that records batch bodies.

    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// How the collector answers the n-th request (0-based)
    #[derive(Clone, Copy)]
    pub enum Reply {
        Accept,
        Reject(u64),
        Fail,
        Hang,
    }

    pub struct Collector {
        pub endpoint: String,
        pub bodies: Arc<Mutex<Vec<serde_json::Value>>>,
        _task: JoinHandle<()>,
    }

    impl Collector {
        pub fn batch_sizes(&self) -> Vec<usize> {
            self.bodies
                .lock()
                .unwrap()
                .iter()
                .map(|body| body["batch"].as_array().map_or(0, Vec::len))
                .collect()
        }

        pub fn event_names(&self) -> Vec<String> {
            self.bodies
                .lock()
                .unwrap()
                .iter()
                .flat_map(|body| body["batch"].as_array().cloned().unwrap_or_default())
                .filter_map(|item| item["name"].as_str().map(str::to_string))
                .collect()
        }
    }

    pub async fn start(plan: impl Fn(usize) -> Reply + Send + Sync + 'static) -> Collector {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let bodies = Arc::new(Mutex::new(Vec::new()));

        let recorded = bodies.clone();
        let task = tokio::spawn(async move {
            let mut request_index = 0;
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                let reply = plan(request_index);
                request_index += 1;

                let body = request.split_once("\r\n\r\n").map_or("", |(_, b)| b);
                let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
                let items = parsed["batch"].as_array().map_or(0, Vec::len) as u64;

                let (status, response) = match reply {
                    Reply::Accept => ("200 OK", format!(r#"{{"processed":{items},"failed":0}}"#)),
                    Reply::Reject(failed) => (
                        "200 OK",
                        format!(r#"{{"processed":{},"failed":{failed}}}"#, items - failed),
                    ),
                    Reply::Fail => ("500 Internal Server Error", "{}".to_string()),
                    Reply::Hang => {
                        tokio::spawn(async move {
                            let _held = socket;
                            std::future::pending::<()>().await;
                        });
                        continue;
                    }
                };
                recorded.lock().unwrap().push(parsed);

                let reply = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    response.len(),
                    response
                );
                socket.write_all(reply.as_bytes()).await.ok();
                socket.shutdown().await.ok();
            }
        });

        Collector {
            endpoint: format!("http://{}/v1/batch", addr),
            bodies,
            _task: task,
        }
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_complete(&buf) {
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        buf.len() >= header_end + 4 + content_length
    }
}

#[cfg(test)]
mod contract_tests {
    use contracts::{BatchRequest, Item};

    #[test]
    fn test_batch_request_wire_shape() {
        let request = BatchRequest::new(vec![
            Item::event("app_open", "2024-05-01T12:00:00.000Z"),
            Item::identify("u-1"),
        ])
        .unwrap();

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["batch"][0]["type"], "event");
        assert_eq!(json["batch"][0]["name"], "app_open");
        assert_eq!(json["batch"][1]["type"], "identify");
        let sent_at = json["sent_at"].as_str().unwrap();
        assert!(flush_engine::parse_timestamp(sent_at).is_ok(), "{sent_at}");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use contracts::{FlushConfig, FlushState, Item, TransportConfig, TransportType};
    use dispatcher::{create_transport, AnyTransport};
    use flush_engine::{FlushCoordinator, FlushScheduler, MemoryQueue};

    use crate::collector::{self, Reply};

    fn http_config(endpoint: &str) -> TransportConfig {
        let mut params = HashMap::new();
        params.insert("endpoint".to_string(), endpoint.to_string());
        params.insert("timeout_ms".to_string(), "2000".to_string());
        TransportConfig {
            name: "collector".to_string(),
            transport_type: TransportType::Http,
            params,
        }
    }

    fn events(count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| Item::event(format!("e{i}"), "2024-05-01T12:00:00.000Z"))
            .collect()
    }

    async fn http_coordinator(
        endpoint: &str,
        items: Vec<Item>,
        flush: FlushConfig,
    ) -> Arc<FlushCoordinator<MemoryQueue, AnyTransport>> {
        let queue = Arc::new(MemoryQueue::new());
        queue.enqueue_all(items).await;
        let transport = create_transport(&http_config(endpoint)).unwrap();
        Arc::new(FlushCoordinator::new(queue, transport, flush).unwrap())
    }

    /// Queue -> dedup -> batcher -> HttpTransport -> collector
    #[tokio::test]
    async fn test_e2e_http_delivery_in_order() {
        let collector = collector::start(|_| Reply::Accept).await;
        let flush = FlushConfig {
            max_batch_size: 100,
            ..FlushConfig::default()
        };
        let coordinator = http_coordinator(&collector.endpoint, events(250), flush).await;

        coordinator.flush().await;

        assert_eq!(collector.batch_sizes(), vec![100, 100, 50]);
        let expected: Vec<String> = (0..250).map(|i| format!("e{i}")).collect();
        assert_eq!(collector.event_names(), expected);

        let report = coordinator.last_report().unwrap();
        assert_eq!(report.items_delivered, 250);
        assert!(!report.timed_out);
        assert!(coordinator.queue().is_empty().await);

        let summary: observability::MetricsSummary = coordinator.summary();
        let rendered = summary.to_string();
        assert!(rendered.contains("Items delivered: 250"), "{rendered}");
        assert!(rendered.contains("Items lost: 0"), "{rendered}");
    }

    #[tokio::test]
    async fn test_e2e_duplicates_never_reach_collector() {
        let collector = collector::start(|_| Reply::Accept).await;
        let items = vec![
            Item::event("click", "2024-05-01T12:00:00.000Z"),
            Item::event("click", "2024-05-01T12:00:00.020Z"),
            Item::identify("u-1"),
            Item::event("click", "2024-05-01T12:00:00.080Z"),
        ];
        let coordinator =
            http_coordinator(&collector.endpoint, items, FlushConfig::default()).await;

        coordinator.flush().await;

        assert_eq!(collector.batch_sizes(), vec![3]);
        assert_eq!(coordinator.summary().total_duplicates, 1);
    }

    #[tokio::test]
    async fn test_e2e_collector_error_drops_only_that_batch() {
        let collector = collector::start(|n| if n == 1 { Reply::Fail } else { Reply::Accept }).await;
        let flush = FlushConfig {
            max_batch_size: 10,
            ..FlushConfig::default()
        };
        let coordinator = http_coordinator(&collector.endpoint, events(30), flush).await;

        coordinator.flush().await;

        // The failing request is not recorded; batches 1 and 3 were.
        assert_eq!(collector.batch_sizes(), vec![10, 10]);
        let snapshot = coordinator.dispatch_snapshot();
        assert_eq!(snapshot.batches_failed, 1);
        assert_eq!(snapshot.items_dropped, 10);
        assert!(coordinator.queue().is_empty().await, "nothing is re-queued");

        // A later flush does not resend the dropped batch.
        coordinator.flush().await;
        assert_eq!(collector.batch_sizes(), vec![10, 10]);
    }

    #[tokio::test]
    async fn test_e2e_partial_failure_is_final() {
        let collector = collector::start(|_| Reply::Reject(2)).await;
        let coordinator =
            http_coordinator(&collector.endpoint, events(5), FlushConfig::default()).await;

        coordinator.flush().await;

        assert_eq!(collector.batch_sizes(), vec![5]);
        let report = coordinator.last_report().unwrap();
        assert_eq!(report.items_rejected, 2);
        assert_eq!(report.batches_dispatched, 1);
    }

    #[tokio::test]
    async fn test_e2e_hanging_collector_hits_deadline() {
        let collector = collector::start(|_| Reply::Hang).await;
        let flush = FlushConfig {
            flush_timeout_ms: 300,
            max_batch_size: 2,
            dedup_window_ms: 50,
        };
        let coordinator = http_coordinator(&collector.endpoint, events(6), flush).await;

        let started = Instant::now();
        coordinator.flush().await;
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(1_500), "took {elapsed:?}");
        assert_eq!(coordinator.state(), FlushState::Idle);

        let report = coordinator.last_report().unwrap();
        assert!(report.timed_out);
        assert_eq!(report.items_abandoned, 6);
        assert!(coordinator.queue().is_empty().await);
    }

    #[tokio::test]
    async fn test_e2e_concurrent_flushes_single_flight() {
        let collector = collector::start(|_| Reply::Accept).await;
        let coordinator =
            http_coordinator(&collector.endpoint, events(20), FlushConfig::default()).await;

        let calls: Vec<_> = (0..8)
            .map(|_| {
                let coordinator = coordinator.clone();
                tokio::spawn(async move { coordinator.flush().await })
            })
            .collect();
        for call in calls {
            call.await.unwrap();
        }

        let summary = coordinator.summary();
        assert_eq!(summary.total_flushes + summary.skipped_flushes, 8);
        assert_eq!(summary.total_drained, 20);
        assert_eq!(collector.event_names().len(), 20);
    }

    #[tokio::test]
    async fn test_e2e_scheduler_shutdown_flushes_remaining() {
        let collector = collector::start(|_| Reply::Accept).await;
        let coordinator =
            http_coordinator(&collector.endpoint, Vec::new(), FlushConfig::default()).await;
        let handle = FlushScheduler::spawn(coordinator.clone(), Duration::from_secs(3_600));

        coordinator.queue().enqueue_all(events(4)).await;
        handle.shutdown().await;

        assert_eq!(collector.batch_sizes(), vec![4]);
    }
}

#[cfg(test)]
mod config_e2e_tests {
    use std::io::Write;
    use std::sync::Arc;

    use config_loader::ConfigLoader;
    use dispatcher::create_transport;
    use flush_engine::{FlushCoordinator, MemoryQueue};

    /// TOML config -> FileTransport -> JSON lines on disk
    #[tokio::test]
    async fn test_config_file_to_file_transport() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join("batches.jsonl");
        let config_text = format!(
            r#"
[flush]
flush_timeout_ms = 2000
max_batch_size = 3

[transport]
name = "disk"
transport_type = "file"

[transport.params]
path = "{}"

[queue]
capacity = 8
"#,
            output.display()
        );
        let mut config_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        config_file.write_all(config_text.as_bytes()).unwrap();

        let blueprint = ConfigLoader::load_from_path(config_file.path()).unwrap();
        assert_eq!(blueprint.flush.max_batch_size, 3);

        let queue = Arc::new(MemoryQueue::bounded(blueprint.queue.capacity));
        for i in 0..10 {
            queue
                .enqueue(contracts::Item::event(format!("e{i}"), "2024-05-01T12:00:00.000Z"))
                .await;
        }
        assert_eq!(queue.evicted(), 2);

        let transport = create_transport(&blueprint.transport).unwrap();
        let coordinator = FlushCoordinator::new(queue, transport, blueprint.flush).unwrap();
        coordinator.flush().await;

        let written = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<serde_json::Value> = written
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let sizes: Vec<usize> = lines
            .iter()
            .map(|line| line["batch"].as_array().unwrap().len())
            .collect();
        assert_eq!(sizes, vec![3, 3, 2]);
        assert_eq!(lines[0]["batch"][0]["name"], "e2");
    }
}
