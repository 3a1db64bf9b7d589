use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    domain::shared::ServiceError,
    domain::stt::{RecognizeResponse, SttService, SttServiceApi},
    error::{AppError, AppResult},
    infrastructure::http::RequestId,
    infrastructure::uploads::{UploadHandle, UploadStore},
};

const AUDIO_FIELD: &str = "audio";
const LANGUAGE_FIELD: &str = "lang";

pub struct SttController {
    stt_service: Arc<SttService>,
    uploads: Arc<UploadStore>,
}

impl SttController {
    pub fn new(stt_service: Arc<SttService>, uploads: Arc<UploadStore>) -> Self {
        Self {
            stt_service,
            uploads,
        }
    }

    /// POST /recognize - Transcribe an uploaded audio file
    ///
    /// Multipart fields: `audio` (file), `lang` (optional language code).
    /// Any upload stored before an early return is removed when its
    /// handle drops.
    pub async fn recognize(
        State(controller): State<Arc<SttController>>,
        Extension(request_id): Extension<RequestId>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> AppResult<Json<RecognizeResponse>> {
        let mut multipart = multipart?;
        let mut upload: Option<UploadHandle> = None;
        let mut language: Option<String> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some(AUDIO_FIELD) => {
                    if upload.is_some() {
                        return Err(AppError::BadRequest(
                            "Only one audio file may be uploaded".to_string(),
                        ));
                    }
                    let content_type = field.content_type().map(str::to_string);
                    let handle = controller
                        .uploads
                        .accept(field, content_type, &request_id.0)
                        .await
                        .map_err(ServiceError::from)?;
                    upload = Some(handle);
                }
                Some(LANGUAGE_FIELD) => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    language = Some(value);
                }
                other => {
                    tracing::debug!(field = ?other, "Ignoring unknown multipart field");
                }
            }
        }

        let result = controller.stt_service.transcribe(upload, language).await?;

        Ok(Json(result.into()))
    }
}
