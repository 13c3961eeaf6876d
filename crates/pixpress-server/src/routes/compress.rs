use std::sync::Arc;

use pixpress_core::PresetSize;
use poem::web::Data;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::{
    error::ApiError,
    schemas::{
        common::HealthResponse,
        compress::{CompressForm, CompressResponse, PresetInfo, PresetsResponse},
    },
    AppState,
};

#[derive(Tags)]
enum ApiCompressTags {
    Compress,
    Meta,
}

pub struct ApiCompress;

#[OpenApi()]
impl ApiCompress {
    /// Compress
    ///
    /// Re-encode an uploaded image. `mode` selects how quality is chosen:
    ///
    /// - `preset`: fixed size and quality from `small`, `medium` or `large`
    /// - `target`: highest quality whose output fits `targetSizeKB`
    /// - `custom`: the given `quality`, optionally resized to `width`/`height`
    ///
    /// `outputFormat` defaults to `auto`: PNG stays PNG, everything else
    /// becomes JPEG.
    #[oai(path = "/compress", method = "post", tag = "ApiCompressTags::Compress")]
    async fn compress(&self, form: CompressForm, state: Data<&Arc<AppState>>) -> CompressResponse {
        match run_compress(form, state.0).await {
            Ok(response) => response,
            Err(err) => err.into(),
        }
    }

    /// List Presets
    ///
    /// The size and quality each preset applies.
    #[oai(path = "/presets", method = "get", tag = "ApiCompressTags::Meta")]
    async fn list_presets(&self) -> PresetsResponse {
        let presets = PresetSize::ALL.into_iter().map(PresetInfo::from).collect();
        PresetsResponse::Ok(Json(presets))
    }

    #[oai(path = "/health", method = "get", tag = "ApiCompressTags::Meta")]
    async fn health(&self) -> Json<HealthResponse> {
        Json(HealthResponse::default())
    }
}

async fn run_compress(form: CompressForm, state: &AppState) -> Result<CompressResponse, ApiError> {
    let (upload, options) = form.into_parts();
    let upload = upload.ok_or(ApiError::MissingFile)?;

    let limit = state.config.max_upload_bytes;
    if upload.size() > limit {
        return Err(ApiError::PayloadTooLarge {
            size: upload.size(),
            limit,
        });
    }

    let request = options.into_request()?;
    let file_name = upload.file_name().map(str::to_string);
    let input = upload.into_vec().await?;

    tracing::info!(
        "compressing: file={}, size={}, mode={}",
        file_name.as_deref().unwrap_or("-"),
        input.len(),
        request.mode.name()
    );

    let compressor = state.compressor.clone();
    let result =
        tokio::task::spawn_blocking(move || compressor.compress(&input, &request)).await??;

    tracing::info!(
        "compressed: {} -> {} bytes as {} at quality {} ({} attempts)",
        result.original_size,
        result.size(),
        result.format,
        result.quality,
        result.attempts
    );

    Ok(CompressResponse::image(result, file_name.as_deref()))
}
