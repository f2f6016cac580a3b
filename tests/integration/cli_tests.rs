//! Command level tests: a whole run against a mock endpoint

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::fixtures::RunFolderFixture;
    use voucher_upload::RunState;
    use voucher_upload::cli::commands;
    use voucher_upload::cli::{ConfigOverrides, ControlArgs, RunArgs, ValidateArgs};
    use voucher_upload::core::control::ControlSignal;
    use voucher_upload::storage::RunFolder;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn run_args(fixture: &RunFolderFixture, base_url: &str) -> RunArgs {
        RunArgs {
            input: fixture.input.clone(),
            run_folder: fixture.path().to_path_buf(),
            config: None,
            overrides: ConfigOverrides {
                base_url: Some(base_url.to_string()),
                username: Some("merchant".to_string()),
                password: Some("secret".to_string()),
                requests_per_second: Some(50),
                max_workers: Some(4),
                chunk_size: Some(3),
                ..ConfigOverrides::default()
            },
        }
    }

    #[tokio::test]
    async fn test_run_uploads_and_writes_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/offers/voucher-benefits"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(7)
            .mount(&server)
            .await;
        let fixture = RunFolderFixture::new(7);

        let summary = assert_ok!(commands::run(run_args(&fixture, &server.uri())).await);

        assert_eq!(summary.total, 7);
        assert_eq!(summary.succeeded, 7);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.chunks_processed, 3);
        assert!(fixture.path().join("control.json").exists());
        assert_eq!(RunFolderFixture::read_csv(&fixture.results_path()).len(), 8);
        assert!(!fixture.failed_path().exists());
    }

    #[tokio::test]
    async fn test_run_honors_preset_stop() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let fixture = RunFolderFixture::new(4);
        assert_ok!(commands::control(ControlArgs {
            run_folder: fixture.path().to_path_buf(),
            state: RunState::Stopped,
        }));

        let summary = assert_ok!(commands::run(run_args(&fixture, &server.uri())).await);

        assert_eq!(summary.succeeded + summary.failed, 0);
        assert_eq!(summary.not_started, 4);
        let signal = RunFolder::new(fixture.path()).control_signal(std::time::Duration::from_secs(1));
        assert_eq!(signal.poll().await, RunState::Stopped);
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_config() {
        let fixture = RunFolderFixture::new(1);
        let err = commands::run(run_args(&fixture, "not a url")).await.unwrap_err();
        assert!(format!("{:#}", err).contains("base_url"));
    }

    #[test]
    fn test_validate_command() {
        let fixture = RunFolderFixture::new(12);
        let count = assert_ok!(commands::validate(ValidateArgs {
            input: fixture.input.clone(),
        }));
        assert_eq!(count, 12);
    }
}
