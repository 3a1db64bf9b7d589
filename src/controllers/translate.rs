use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::translate::{TranslateRequest, TranslateResponse, TranslationService, TranslationServiceApi},
    error::AppResult,
};

pub struct TranslateController {
    translation_service: Arc<TranslationService>,
}

impl TranslateController {
    pub fn new(translation_service: Arc<TranslationService>) -> Self {
        Self {
            translation_service,
        }
    }

    /// POST /translate - Translate text into the target language
    pub async fn translate(
        State(controller): State<Arc<TranslateController>>,
        payload: Result<Json<TranslateRequest>, JsonRejection>,
    ) -> AppResult<Json<TranslateResponse>> {
        let Json(request) = payload?;

        let result = controller.translation_service.translate(request).await?;

        Ok(Json(result.into()))
    }
}
