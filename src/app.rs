use anyhow::{anyhow, Context};
use async_openai::config::OpenAIConfig;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::controllers::{stt::SttController, translate::TranslateController, tts::TtsController};
use crate::domain::language::{
    Capability, LanguageCode, LanguageDetector, LanguagePolicy, LanguageSupportTable, ProviderKind,
};
use crate::domain::shared::{RetryPolicy, ServiceSettings};
use crate::domain::stt::SttService;
use crate::domain::translate::TranslationService;
use crate::domain::tts::TtsService;
use crate::infrastructure::config::Config;
use crate::infrastructure::google::GoogleClient;
use crate::infrastructure::repositories::{
    openai_tts_repository, polly_tts_repository, GoogleSttRepository, GoogleTranslationRepository,
    GoogleTtsRepository, OpenAiTtsRepository, PollyTtsRepository, SttRepository,
    TranslationRepository, TtsRepository,
};
use crate::infrastructure::uploads::UploadStore;

/// Everything the router needs, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub language_table: Arc<LanguageSupportTable>,
    pub translate_controller: Arc<TranslateController>,
    pub tts_controller: Arc<TtsController>,
    pub stt_controller: Arc<SttController>,
    pub max_upload_bytes: usize,
}

/// Wire the application from configuration, loading the language table
/// from `LANGUAGE_TABLE_PATH` when set
pub async fn build_app(config: &Config) -> anyhow::Result<AppState> {
    let table = match &config.language_table_path {
        Some(path) => LanguageSupportTable::from_file(path)
            .with_context(|| format!("loading language table from {}", path))?,
        None => LanguageSupportTable::builtin(),
    };
    build_app_with_table(config, table).await
}

pub async fn build_app_with_table(
    config: &Config,
    table: LanguageSupportTable,
) -> anyhow::Result<AppState> {
    let timeout = config.provider_timeout();
    let table = Arc::new(table);
    let referenced: HashSet<ProviderKind> = Capability::ALL
        .iter()
        .flat_map(|capability| table.providers_for(*capability))
        .collect();

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate provider repositories (only those the table routes to)
    tracing::info!(providers = ?referenced, "Instantiating provider repositories...");
    let mut translators: HashMap<ProviderKind, Arc<dyn TranslationRepository>> = HashMap::new();
    let mut synthesizers: HashMap<ProviderKind, Arc<dyn TtsRepository>> = HashMap::new();
    let mut recognizers: HashMap<ProviderKind, Arc<dyn SttRepository>> = HashMap::new();

    if referenced.contains(&ProviderKind::Google) {
        let auth = GoogleClient::auth_from(
            config.google_api_key.as_deref(),
            config.google_application_credentials.as_deref(),
            timeout,
        )?
        .ok_or_else(|| {
            anyhow!("language table routes to google but neither GOOGLE_API_KEY nor GOOGLE_APPLICATION_CREDENTIALS is set")
        })?;
        tracing::info!(auth = auth.kind(), "Google client configured");

        let google = Arc::new(GoogleClient::new(auth, timeout)?);
        translators.insert(
            ProviderKind::Google,
            Arc::new(GoogleTranslationRepository::new(google.clone(), &config.google_translate_url)),
        );
        synthesizers.insert(
            ProviderKind::Google,
            Arc::new(GoogleTtsRepository::new(google.clone(), &config.google_tts_url)),
        );
        recognizers.insert(
            ProviderKind::Google,
            Arc::new(GoogleSttRepository::new(google, &config.google_stt_url)),
        );
    }

    if referenced.contains(&ProviderKind::Polly) {
        tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);
        let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
        if !has_access_key {
            tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
        }

        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.aws_region.clone()))
            .load()
            .await;
        let polly_client = Arc::new(polly_tts_repository::single_attempt_client(&aws_config));
        synthesizers.insert(
            ProviderKind::Polly,
            Arc::new(PollyTtsRepository::new(polly_client, timeout)),
        );
    }

    if referenced.contains(&ProviderKind::OpenAi) {
        let api_key = config
            .openai_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("language table routes to openai but OPENAI_API_KEY is not set"))?;
        let client = Arc::new(openai_tts_repository::single_attempt_client(
            OpenAIConfig::new().with_api_key(api_key),
        ));
        synthesizers.insert(
            ProviderKind::OpenAi,
            Arc::new(OpenAiTtsRepository::new(
                client,
                config.openai_tts_model.clone(),
                timeout,
            )),
        );
    }

    ensure_covered(&table, Capability::Translate, &translators)?;
    ensure_covered(&table, Capability::Synthesize, &synthesizers)?;
    ensure_covered(&table, Capability::Transcribe, &recognizers)?;

    // 2. Instantiate services (inject policy and repositories)
    tracing::info!("Instantiating services...");
    let policy = LanguagePolicy::new(table.clone());
    let settings = ServiceSettings {
        max_text_length: config.max_text_length,
        retry: RetryPolicy::new(config.upstream_retries),
    };
    let default_recognition_language = LanguageCode::parse(&config.default_recognition_language)
        .context("DEFAULT_RECOGNITION_LANGUAGE")?;

    let translation_service = Arc::new(TranslationService::new(policy.clone(), translators, settings));
    let tts_service = Arc::new(TtsService::new(
        policy.clone(),
        synthesizers,
        Arc::new(LanguageDetector::new()),
        settings,
    ));
    let stt_service = Arc::new(SttService::new(
        policy,
        recognizers,
        default_recognition_language,
        settings,
    ));

    // 3. Prepare upload storage
    let uploads = Arc::new(
        UploadStore::new(&config.upload_dir, config.max_upload_bytes).with_context(|| {
            format!("creating upload directory {}", config.upload_dir.display())
        })?,
    );
    tracing::info!(upload_dir = %uploads.dir().display(), "Upload storage ready");

    // 4. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    Ok(AppState {
        language_table: table,
        translate_controller: Arc::new(TranslateController::new(translation_service)),
        tts_controller: Arc::new(TtsController::new(tts_service)),
        stt_controller: Arc::new(SttController::new(stt_service, uploads)),
        max_upload_bytes: config.max_upload_bytes,
    })
}

/// Every provider the table routes a capability to must be wired for it
fn ensure_covered<V>(
    table: &LanguageSupportTable,
    capability: Capability,
    wired: &HashMap<ProviderKind, V>,
) -> anyhow::Result<()> {
    for provider in table.providers_for(capability) {
        if !wired.contains_key(&provider) {
            return Err(anyhow!(
                "language table routes {} to {} but that provider is not configured",
                capability,
                provider
            ));
        }
    }
    Ok(())
}
