//! Engine integration tests
//!
//! Time-dependent behavior runs on tokio's paused clock, so backoff and rate
//! limits are measured exactly without slowing the suite down.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::settings;
    use crate::common::{ScriptedSubmitter, VoucherFactory, max_calls_in_window};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use voucher_upload::config::UploadSettings;
    use voucher_upload::core::control::{ControlFile, FileControlSignal};
    use voucher_upload::{RawOutcome, RunState, RunStatus, SharedControlSignal, UploadEngine};

    fn engine(
        settings: &UploadSettings,
        submitter: &Arc<ScriptedSubmitter>,
        control: &SharedControlSignal,
    ) -> UploadEngine {
        UploadEngine::new(settings, submitter.clone(), Arc::new(control.clone()))
    }

    fn within(actual: Duration, expected: Duration) -> bool {
        actual >= expected && actual < expected + Duration::from_millis(10)
    }

    // ==================== Worked Examples ====================

    #[tokio::test(start_paused = true)]
    async fn test_120_items_in_chunks_of_50() {
        let submitter = Arc::new(ScriptedSubmitter::always(200, r#"{"status":"ok"}"#));
        let control = SharedControlSignal::default();
        let chunk_sizes = Arc::new(Mutex::new(Vec::new()));
        let engine = {
            let chunk_sizes = chunk_sizes.clone();
            engine(&settings(3, 3, 50), &submitter, &control)
                .with_progress(move |p| chunk_sizes.lock().push(p.chunk_len))
        };

        let result = engine.run(VoucherFactory::items(120)).await;

        assert_eq!(result.status(), RunStatus::Completed);
        assert_eq!(result.successes().count(), 120);
        assert_eq!(result.failures().count(), 0);
        assert_eq!(*chunk_sizes.lock(), vec![50, 50, 20]);
        assert!(result.entries().iter().all(|e| e.outcome.attempt_count == 1));
        let rows: Vec<usize> = result.entries().iter().map(|e| e.item.row).collect();
        assert_eq!(rows, (1..=120).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_item_always_500() {
        let submitter = Arc::new(ScriptedSubmitter::always(500, "database unavailable"));
        let control = SharedControlSignal::default();
        let engine = engine(&settings(3, 3, 50), &submitter, &control);

        let result = engine.run(VoucherFactory::items(1)).await;

        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        let outcome = &failures[0].outcome;
        assert_eq!(outcome.attempt_count, 3);
        assert_eq!(outcome.status_code, Some(500));
        assert_eq!(outcome.error_message.as_deref(), Some("database unavailable"));

        let base = Duration::from_secs_f64(1.0 / 3.0);
        let calls = submitter.calls();
        assert_eq!(calls.len(), 3);
        assert!(within(calls[1].at - calls[0].at, base));
        assert!(within(calls[2].at - calls[1].at, base * 2));
    }

    // ==================== Control Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_stopped_before_start() {
        let submitter = Arc::new(ScriptedSubmitter::always(200, "ok"));
        let control = SharedControlSignal::new(RunState::Stopped, Duration::from_secs(1));

        let result = engine(&settings(3, 3, 10), &submitter, &control)
            .run(VoucherFactory::items(30))
            .await;

        assert!(result.is_empty());
        assert_eq!(result.status(), RunStatus::Stopped);
        assert_eq!(submitter.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_after_chunk_k() {
        for k in 1..=3 {
            let submitter = Arc::new(ScriptedSubmitter::always(200, "ok"));
            let control = SharedControlSignal::default();
            let engine = {
                let control = control.clone();
                engine(&settings(4, 20, 10), &submitter, &control).with_progress(move |p| {
                    if p.chunk == k {
                        control.stop();
                    }
                })
            };

            let result = engine.run(VoucherFactory::items(45)).await;

            assert_eq!(result.status(), RunStatus::Stopped, "k = {}", k);
            let rows: Vec<usize> = result.entries().iter().map(|e| e.item.row).collect();
            assert_eq!(rows, (1..=k * 10).collect::<Vec<_>>(), "k = {}", k);
            assert_eq!(submitter.call_count(), k * 10);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_file_control_pause_and_resume() {
        let dir = tempfile::TempDir::new().unwrap();
        let control_path = dir.path().join("control.json");
        ControlFile::write(&control_path, RunState::Running).unwrap();

        let submitter = Arc::new(ScriptedSubmitter::always(200, "ok"));
        let control = Arc::new(FileControlSignal::new(&control_path, Duration::from_secs(1)));
        let engine = {
            let control_path = control_path.clone();
            UploadEngine::new(&settings(2, 10, 5), submitter.clone(), control).with_progress(
                move |p| {
                    if p.chunk == 1 {
                        ControlFile::write(&control_path, RunState::Paused).unwrap();
                    }
                },
            )
        };

        let operator = {
            let control_path = control_path.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(30)).await;
                ControlFile::write(&control_path, RunState::Running).unwrap();
            })
        };

        let start = tokio::time::Instant::now();
        let result = engine.run(VoucherFactory::items(10)).await;
        operator.await.unwrap();

        assert_eq!(result.status(), RunStatus::Completed);
        assert_eq!(result.len(), 10);
        let times = submitter.call_times();
        assert!(times[5] - start >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_control_file_fails_open() {
        let dir = tempfile::TempDir::new().unwrap();
        let control_path = dir.path().join("control.json");
        std::fs::write(&control_path, "{ not json").unwrap();

        let submitter = Arc::new(ScriptedSubmitter::always(200, "ok"));
        let control = Arc::new(FileControlSignal::new(&control_path, Duration::from_secs(1)));
        let result = UploadEngine::new(&settings(2, 10, 5), submitter, control)
            .run(VoucherFactory::items(7))
            .await;

        assert_eq!(result.status(), RunStatus::Completed);
        assert_eq!(result.successes().count(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_mid_chunk_drops_unstarted_items() {
        let control = SharedControlSignal::default();
        let submitter = Arc::new({
            let control = control.clone();
            ScriptedSubmitter::always(200, "ok").on_call(move |count| {
                if count == 12 {
                    control.stop();
                }
            })
        });

        let result = engine(&settings(1, 20, 10), &submitter, &control)
            .run(VoucherFactory::items(30))
            .await;

        assert_eq!(result.status(), RunStatus::Stopped);
        assert_eq!(result.len(), 12);
        let summary = result.summary();
        assert_eq!(summary.dropped, 8);
        assert_eq!(summary.not_started, 10);
        assert_eq!(summary.succeeded, 12);
    }

    // ==================== Semantics Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_chunk_size_does_not_change_outcomes() {
        let script = |item: &voucher_upload::WorkItem, attempt: u32| match item.row % 5 {
            0 => RawOutcome::response(400, format!("invalid voucher {}", item.row)),
            1 if attempt == 1 => RawOutcome::transport("connection reset"),
            2 if attempt < 3 => RawOutcome::response(429, "too many requests"),
            _ => RawOutcome::response(200, "ok"),
        };

        let mut views = Vec::new();
        for chunk_size in [1, 4, 17, 40] {
            let submitter = Arc::new(ScriptedSubmitter::new(script));
            let control = SharedControlSignal::default();
            let result = engine(&settings(3, 10, chunk_size), &submitter, &control)
                .run(VoucherFactory::items(40))
                .await;
            let mut view: Vec<_> = result
                .entries()
                .iter()
                .map(|e| (e.item.row, e.outcome.clone()))
                .collect();
            view.sort_by_key(|(row, _)| *row);
            views.push(view);
        }

        for view in &views[1..] {
            assert_eq!(view, &views[0]);
        }
        let failed = views[0].iter().filter(|(_, o)| !o.success).count();
        assert_eq!(failed, 8);
        let throttled_row = views[0].iter().find(|(row, _)| *row == 2).unwrap();
        assert!(throttled_row.1.success);
        assert_eq!(throttled_row.1.attempt_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_aggregate_rate_stays_under_limit() {
        let rps = 5u32;
        let submitter = Arc::new(ScriptedSubmitter::always(200, "ok"));
        let control = SharedControlSignal::default();

        let result = engine(&settings(8, rps, 20), &submitter, &control)
            .run(VoucherFactory::items(60))
            .await;
        assert_eq!(result.successes().count(), 60);

        let times = submitter.call_times();
        let window = Duration::from_secs(1);
        // one bucket of burst on top of the steady rate
        assert!(max_calls_in_window(&times, window) <= 2 * rps as usize);

        let burst_over = times[0] + Duration::from_secs(2);
        let steady: Vec<_> = times.iter().copied().filter(|t| *t >= burst_over).collect();
        assert!(max_calls_in_window(&steady, window) <= rps as usize + 1);

        // 60 calls at 5/s after a burst of 5
        let elapsed = times[times.len() - 1] - times[0];
        assert!(elapsed >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_workers_and_rate_are_independent() {
        let submitter = Arc::new(ScriptedSubmitter::always(200, "ok"));
        let control = SharedControlSignal::default();

        let result = engine(&settings(1, 50, 100), &submitter, &control)
            .run(VoucherFactory::items(10))
            .await;

        // a single worker still spaces its own requests by 1/R
        let times = submitter.call_times();
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(20));
        }
        assert_eq!(result.successes().count(), 10);
    }
}
