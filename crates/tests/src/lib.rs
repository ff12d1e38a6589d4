//! # Integration Tests
//!
//! End-to-end tests across crate boundaries.
//!
//! Covers:
//! - Source -> loop -> real transport flows over the loopback interface
//! - The commit-regardless-of-send-outcome contract
//! - Configuration load into transport construction

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use bridge::{BridgeLoop, MemorySource};
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{LoopConfig, TransportConfig, TransportMode};
    use tokio::io::AsyncReadExt;
    use tokio::net::{TcpListener, UdpSocket};
    use tokio_util::sync::CancellationToken;

    fn detection_json(uas_id: &str, operator: bool) -> bytes::Bytes {
        let (op_lat, op_lon) = if operator { (10.002, 20.002) } else { (0.0, 0.0) };
        format!(
            r#"{{"SN": "sensor-7", "UASID": "{uas_id}", "DroneType": "Quadcopter",
                "Latitude": 10.0, "Longitude": 20.0, "Height": 75.0,
                "Direction": 180, "SpeedHorizontal": 12.5, "SpeedVertical": -1.0,
                "OperatorLatitude": {op_lat}, "OperatorLongitude": {op_lon},
                "timestamp": "2025-06-01T12:00:00Z"}}"#
        )
        .into()
    }

    /// End-to-end over UDP: MemorySource -> BridgeLoop -> UnicastTransport
    ///
    /// A loopback socket plays the TAK consumer and checks the documents
    /// that actually hit the wire.
    #[tokio::test]
    async fn test_e2e_unicast_delivery() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();

        let transport = transport::build_transport(&TransportConfig {
            mode: TransportMode::DirectUnicast,
            host: Some("127.0.0.1".to_string()),
            port: Some(port),
        })
        .await
        .unwrap();

        let source = MemorySource::new(vec![
            detection_json("1581F5FKD23A00XYZ", false),
            detection_json("1581F5FKD23A00ABC", true),
        ]);
        let commits = source.commit_count();

        let mut bridge = BridgeLoop::new(source, transport, LoopConfig::default());
        let stats = bridge.run(CancellationToken::new()).await;

        assert_eq!(stats.sends_ok, 2);
        assert_eq!(commits.load(Ordering::SeqCst), 2);

        let mut buf = vec![0u8; 8192];
        let n = tokio::time::timeout(Duration::from_secs(2), receiver.recv(&mut buf))
            .await
            .expect("first datagram not received")
            .unwrap();
        let first = String::from_utf8_lossy(&buf[..n]).to_string();
        assert!(first.contains("uid=\"Corvus.UAS.1581F5FKD23A00XYZ\""));
        assert!(first.contains("type=\"a-u-A\""));
        assert!(first.contains("UAS-0XYZ"));

        let n = tokio::time::timeout(Duration::from_secs(2), receiver.recv(&mut buf))
            .await
            .expect("second datagram not received")
            .unwrap();
        let second = String::from_utf8_lossy(&buf[..n]).to_string();
        // Operator position present: classified hostile, operator link attached
        assert!(second.contains("type=\"a-h-A-M-F-Q\""));
        assert!(second.contains("Corvus.OP.1581F5FKD23A00ABC"));
    }

    /// End-to-end over TCP: the stream transport delivers to a live server
    /// and the server sees well-formed XML documents in order.
    #[tokio::test]
    async fn test_e2e_stream_delivery() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut conn, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            conn.read_to_end(&mut received).await.unwrap();
            received
        });

        let transport = transport::build_transport(&TransportConfig {
            mode: TransportMode::ReliableStream,
            host: Some("127.0.0.1".to_string()),
            port: Some(port),
        })
        .await
        .unwrap();

        let source = MemorySource::new(vec![
            detection_json("STREAM0001", false),
            detection_json("STREAM0002", false),
        ]);

        let mut bridge = BridgeLoop::new(source, transport, LoopConfig::default());
        let stats = bridge.run(CancellationToken::new()).await;
        assert_eq!(stats.sends_ok, 2);

        let received = tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("server task timed out")
            .unwrap();
        let text = String::from_utf8_lossy(&received).to_string();

        // Both documents arrived, in fetch order
        let first = text.find("STREAM0001").expect("first event missing");
        let second = text.find("STREAM0002").expect("second event missing");
        assert!(first < second);
        assert_eq!(text.matches("<?xml").count(), 2);
    }

    /// The at-most-once contract: a mix of malformed and good payloads is
    /// acknowledged in full, and only the good ones reach the wire.
    #[tokio::test]
    async fn test_e2e_commit_covers_skipped_messages() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();

        let transport = transport::build_transport(&TransportConfig {
            mode: TransportMode::DirectUnicast,
            host: Some("127.0.0.1".to_string()),
            port: Some(port),
        })
        .await
        .unwrap();

        let source = MemorySource::new(vec![
            bytes::Bytes::from_static(b"{ not json"),
            detection_json("GOODONE001", false),
            bytes::Bytes::from_static(b"{\"UASID\": 42}"),
        ]);
        let commits = source.commit_count();

        let mut bridge = BridgeLoop::new(source, transport, LoopConfig::default());
        let stats = bridge.run(CancellationToken::new()).await;

        assert_eq!(stats.messages_fetched, 3);
        assert_eq!(stats.parse_failures, 2);
        assert_eq!(stats.sends_ok, 1);
        // Every fetched message was acknowledged, valid or not
        assert_eq!(commits.load(Ordering::SeqCst), 3);
    }

    /// Configuration text drives the transport the loop actually uses.
    #[tokio::test]
    async fn test_config_to_transport() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();

        let toml = format!(
            r#"
[transport]
mode = "direct-unicast"
host = "127.0.0.1"
port = {port}

[bridge]
fetch_retry_secs = 2
"#
        );
        let config = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.bridge.fetch_retry_secs, 2);

        let transport = transport::build_transport(&config.transport).await.unwrap();
        assert_eq!(transport.name(), "unicast");

        let source = MemorySource::new(vec![detection_json("CFGDRIVEN1", false)]);
        let mut bridge = BridgeLoop::new(source, transport, config.bridge.clone());
        let stats = bridge.run(CancellationToken::new()).await;
        assert_eq!(stats.sends_ok, 1);

        let mut buf = vec![0u8; 8192];
        let n = tokio::time::timeout(Duration::from_secs(2), receiver.recv(&mut buf))
            .await
            .expect("datagram not received")
            .unwrap();
        assert!(String::from_utf8_lossy(&buf[..n]).contains("CFGDRIVEN1"));
    }
}
