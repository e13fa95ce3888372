//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 表格 -> 任务 -> 调度 的 e2e 测试（MockChannel，无需真实网关）
//! - 配置文件驱动的完整流程

#[cfg(test)]
mod contract_tests {
    use contracts::{ProgressEvent, ReporterType};

    #[test]
    fn test_blueprint_defaults_from_minimal_config() {
        let blueprint: contracts::BroadcastBlueprint =
            serde_json::from_str(r#"{"source": {"path": "rows.xlsx"}}"#).unwrap();
        assert_eq!(blueprint.version, contracts::ConfigVersion::V1);
        assert_eq!(blueprint.delay.default_seconds, contracts::DEFAULT_DELAY_SECONDS);
        assert_eq!(blueprint.routing.country_code, "57");
        assert!(blueprint.reporters.is_empty());
    }

    #[test]
    fn test_progress_event_wire_names() {
        let event = ProgressEvent::JobStarted {
            index: 2,
            total: 7,
            recipient_id: "573001112222@s.whatsapp.net".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "job_started");
        assert_eq!(json["index"], 2);

        let rt: ReporterType = serde_json::from_str("\"json_lines\"").unwrap();
        assert_eq!(rt, ReporterType::JsonLines);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::Path;
    use std::time::Duration;

    use contracts::{JobSource, PayloadKind, RawRow, RoutingConfig};
    use dispatcher::{
        DelayPolicy, DispatchScheduler, MediaCaptions, MockChannel, RecordingReporter,
        SchedulerState,
    };
    use ingestion::{JobNormalizer, MemorySource};
    use tempfile::tempdir;

    fn routing(base: &Path) -> RoutingConfig {
        RoutingConfig {
            media_base_dir: base.to_path_buf(),
            ..RoutingConfig::default()
        }
    }

    /// End-to-end: MemorySource -> JobNormalizer -> DispatchScheduler
    ///
    /// 三行：第一行发送文本与链接，第二行无收件人被丢弃，第三行图片缺失被跳过。
    #[tokio::test(start_paused = true)]
    async fn test_e2e_text_url_and_missing_image() {
        let dir = tempdir().unwrap();
        let mut source = MemorySource::new(
            "mensajes",
            vec![
                RawRow::new()
                    .with("to", "3001112222")
                    .with("text", "hi")
                    .with("url", "example.com"),
                RawRow::new().with("to", "").with("text", "skip-me"),
                RawRow::new()
                    .with("to", "3003334444")
                    .with("imagePath", "missing.jpg"),
            ],
        );

        let rows = source.read_rows().unwrap();
        let jobs = JobNormalizer::new(routing(dir.path())).normalize(&rows);
        assert_eq!(jobs.len(), 2);

        let mut scheduler = DispatchScheduler::new(MediaCaptions::default());
        let mut channel = MockChannel::new("mock");
        let mut reporter = RecordingReporter::new();
        let delay = DelayPolicy::new(1);

        let report = scheduler
            .start(jobs, &delay, &mut channel, &mut reporter)
            .await
            .unwrap();

        let first = channel.sent_to("573001112222@s.whatsapp.net");
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].body, "hi");
        assert_eq!(first[1].body, "https://example.com");
        assert!(channel.sent_to("573003334444@s.whatsapp.net").is_empty());

        let second = &report.outcomes[1];
        assert_eq!(second.recipient_id, "573003334444@s.whatsapp.net");
        assert!(second.skipped.contains(&PayloadKind::Image));
        assert!(second.error.is_none());

        assert_eq!(report.state, SchedulerState::Completed);
        assert_eq!(report.total_jobs, 2);
        assert_eq!(report.failed, 0);
        assert!(report.elapsed() >= Duration::from_secs(1));
        assert_eq!(
            reporter.names(),
            vec![
                "run_started",
                "job_started",
                "payload_sent",
                "payload_sent",
                "job_started",
                "payload_skipped",
                "run_completed",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_e2e_failure_isolation_and_pacing() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("promo.jpg"), b"jpeg").unwrap();

        let rows = vec![
            RawRow::new()
                .with("to", 3001110000.0)
                .with("imagePath", "promo.jpg")
                .with("text", "uno"),
            RawRow::new().with("to", "3002220000").with("text", "dos"),
            RawRow::new().with("text", "sin destinatario"),
            RawRow::new().with("to", "3003330000").with("text", "tres"),
        ];
        let jobs = JobNormalizer::new(routing(dir.path())).normalize(&rows);
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].recipient_id, "573001110000@s.whatsapp.net");

        let mut scheduler = DispatchScheduler::default();
        let mut channel =
            MockChannel::new("mock").fail_recipient("573002220000@s.whatsapp.net");
        let mut reporter = RecordingReporter::new();
        let delay = DelayPolicy::new(5);

        let report = scheduler
            .start(jobs, &delay, &mut channel, &mut reporter)
            .await
            .unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.estimated_total_seconds, 15);

        let sent = channel.sent();
        assert_eq!(sent[0].kind, PayloadKind::Image);
        assert_eq!(sent[1].kind, PayloadKind::Text);
        let last = sent.last().unwrap();
        assert_eq!(last.recipient_id, "573003330000@s.whatsapp.net");
        assert!(last.at - sent[0].at >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_operator_delay_fallback() {
        let mut delay = DelayPolicy::new(25);
        assert!(delay.set("abc").is_fallback());
        assert_eq!(delay.get(), 25_000);
        assert!(delay.set("0").is_fallback());
        assert_eq!(delay.get(), 25_000);
        assert!(!delay.set("3").is_fallback());
        assert_eq!(delay.get(), 3_000);

        let jobs = JobNormalizer::new(RoutingConfig::default()).normalize(&[
            RawRow::new().with("to", "1").with("text", "a"),
            RawRow::new().with("to", "2").with("text", "b"),
        ]);
        let mut channel = MockChannel::new("mock");
        let mut reporter = RecordingReporter::new();
        DispatchScheduler::default()
            .start(jobs, &delay, &mut channel, &mut reporter)
            .await
            .unwrap();

        let sent = channel.sent();
        assert!(sent[1].at - sent[0].at >= Duration::from_secs(3));
    }
}

#[cfg(test)]
mod config_tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;

    use config_loader::ConfigLoader;
    use contracts::{ChannelConfig, ChannelType, PayloadKind, ProgressEvent};
    use dispatcher::{
        create_channel, create_reporters, DelayPolicy, DispatchScheduler, DispatcherError,
        MediaCaptions, RecordingReporter, SchedulerState,
    };
    use ingestion::{open_source, JobNormalizer, JobSource};
    use tempfile::tempdir;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    /// Config file + JSON rows + attachments -> log channel + json_lines reporter
    #[tokio::test(start_paused = true)]
    async fn test_config_driven_run() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("media")).unwrap();
        std::fs::write(dir.path().join("media").join("lista.pdf"), b"%PDF").unwrap();
        std::fs::write(
            dir.path().join("rows.json"),
            r#"[
                {"to": 3001112222, "text": "Hola", "filePath": "lista.pdf"},
                {"to": "  ", "text": "ignored"},
                {"to": "3009998888", "url": "http://example.org"}
            ]"#,
        )
        .unwrap();
        let config_path = dir.path().join("broadcast.toml");
        std::fs::write(
            &config_path,
            r#"
[source]
path = "rows.json"

[routing]
media_base_dir = "media"

[delay]
default_seconds = 2

[channel]
channel_type = "log"

[[reporters]]
name = "events"
reporter_type = "json_lines"
params = { path = "out/events.jsonl" }
"#,
        )
        .unwrap();

        let blueprint = ConfigLoader::load_from_path(&config_path).unwrap();
        let events_path = dir.path().join("out").join("events.jsonl");

        let mut source = open_source(&blueprint.source).unwrap();
        let rows = source.read_rows().unwrap();
        let jobs = JobNormalizer::new(blueprint.routing.clone()).normalize(&rows);
        assert_eq!(jobs.len(), 2);

        let delay = DelayPolicy::from_config(&blueprint.delay);
        let mut channel = create_channel(&blueprint.channel).await.unwrap();
        let mut reporter = create_reporters(&blueprint.reporters).unwrap();
        let mut scheduler = DispatchScheduler::new(MediaCaptions::from(&blueprint.channel));

        let report = scheduler
            .start(jobs, &delay, &mut channel, &mut reporter)
            .await
            .unwrap();
        drop(reporter);

        assert_eq!(report.sent_of_kind(PayloadKind::File), 1);
        assert_eq!(report.sent_of_kind(PayloadKind::Url), 1);
        assert_eq!(report.payloads_sent(), 3);

        let content = std::fs::read_to_string(&events_path).unwrap();
        let events: Vec<ProgressEvent> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert!(matches!(events[0], ProgressEvent::RunStarted { total_jobs: 2, delay_millis: 2000, .. }));
        assert!(matches!(events.last(), Some(ProgressEvent::RunCompleted { failed: 0, .. })));
    }

    #[tokio::test]
    async fn test_missing_source_aborts_run() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("broadcast.toml");
        std::fs::write(&config_path, "[source]\npath = \"nowhere.xlsx\"\n").unwrap();

        let blueprint = ConfigLoader::load_from_path(&config_path).unwrap();
        let normalizer = JobNormalizer::new(blueprint.routing.clone());
        let mut channel = create_channel(&ChannelConfig::default()).await.unwrap();
        let mut reporter = RecordingReporter::new();
        let mut scheduler = DispatchScheduler::default();

        let result = scheduler
            .start_with(
                || {
                    let mut source = open_source(&blueprint.source)?;
                    Ok(normalizer.normalize(&source.read_rows()?))
                },
                &DelayPolicy::default(),
                &mut channel,
                &mut reporter,
            )
            .await;

        assert!(matches!(result, Err(DispatcherError::Ingestion(_))));
        assert_eq!(scheduler.state(), SchedulerState::Aborted);
        assert_eq!(reporter.names(), vec!["run_aborted"]);
    }

    /// Gateway channel against a local bridge stub
    #[tokio::test]
    async fn test_gateway_channel_run() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let bridge = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read, mut write) = stream.into_split();
            let mut lines = BufReader::new(read).lines();
            let mut ops = Vec::new();
            while let Some(line) = lines.next_line().await.unwrap() {
                let cmd: serde_json::Value = serde_json::from_str(&line).unwrap();
                ops.push(format!(
                    "{} {}",
                    cmd["op"].as_str().unwrap(),
                    cmd["to"].as_str().unwrap()
                ));
                write.write_all(b"{\"ok\":true}\n").await.unwrap();
            }
            ops
        });

        let config = ChannelConfig {
            channel_type: ChannelType::Gateway,
            params: HashMap::from([("addr".to_string(), addr.to_string())]),
            ..ChannelConfig::default()
        };
        let mut channel = create_channel(&config).await.unwrap();

        let jobs = JobNormalizer::new(Default::default()).normalize(&[contracts::RawRow::new()
            .with("to", "3001112222")
            .with("text", "Hola")
            .with("url", "example.com")]);

        let mut reporter = RecordingReporter::new();
        let report = DispatchScheduler::default()
            .start(jobs, &DelayPolicy::new(1), &mut channel, &mut reporter)
            .await
            .unwrap();
        assert_eq!(report.payloads_sent(), 2);
        drop(channel);

        let ops = bridge.await.unwrap();
        assert_eq!(
            ops,
            vec![
                "send_text 573001112222@s.whatsapp.net",
                "send_text 573001112222@s.whatsapp.net",
            ]
        );
    }
}
