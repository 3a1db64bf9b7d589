use lingo_gateway::app::build_app_with_table;
use lingo_gateway::domain::language::LanguageSupportTable;
use lingo_gateway::infrastructure::config::{Config, Environment, LogFormat};
use lingo_gateway::infrastructure::http::build_router;
use std::path::Path;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use wiremock::MockServer;

pub mod api_client;

use api_client::TestClient;

pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

pub struct TestContext {
    pub client: TestClient,
    /// Stands in for every Google endpoint
    pub google: MockServer,
    #[allow(dead_code)]
    pub config: Config,
    upload_dir: TempDir,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async { Self::with_language_table(LanguageSupportTable::builtin()).await }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Upload directory and mock server are removed on drop
        }
    }
}

impl TestContext {
    /// Start a server routing languages through `table`
    pub async fn with_language_table(table: LanguageSupportTable) -> Self {
        let google = MockServer::start().await;
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");

        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Will be assigned by the OS
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
            upload_dir: upload_dir.path().to_path_buf(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            max_text_length: 10_000,
            provider_timeout_secs: 5,
            upstream_retries: 0,
            default_recognition_language: "hy-AM".to_string(),
            language_table_path: None,
            google_api_key: Some("test-api-key".to_string()),
            google_application_credentials: None,
            google_translate_url: google.uri(),
            google_tts_url: google.uri(),
            google_stt_url: google.uri(),
            aws_region: "us-east-1".to_string(),
            openai_api_key: None,
            openai_tts_model: "tts-1".to_string(),
        };

        let state = build_app_with_table(&config, table)
            .await
            .expect("Failed to create app");
        let app = build_router(&state);

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = TestClient::new(&base_url);

        Self {
            client,
            google,
            config,
            upload_dir,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        self.upload_dir.path()
    }

    /// Files currently stored in the upload directory
    pub fn stored_uploads(&self) -> usize {
        std::fs::read_dir(self.upload_dir())
            .expect("Failed to read upload dir")
            .count()
    }
}
