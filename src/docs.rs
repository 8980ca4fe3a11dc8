use utoipa::OpenApi;

use crate::common::response::ErrorBody;
use crate::config::settings::Mode;
use crate::modules::normalize::dto::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::normalize::handler::normalize_presigned,
        crate::modules::normalize::handler::health,
    ),
    components(
        schemas(
            PresignedNormalizeRequest, PresignedNormalizeResponse, HealthResponse, ErrorBody,
        )
    ),
    tags(
        (name = "Normalize", description = "Re-encode a video into web-ready MP4"),
        (name = "Health", description = "Liveness probe")
    )
)]
pub struct PresignedApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::normalize::handler::normalize_to_storage,
        crate::modules::normalize::handler::health,
    ),
    components(
        schemas(
            StorageNormalizeRequest, StorageNormalizeResponse, HealthResponse, ErrorBody,
        )
    ),
    tags(
        (name = "Normalize", description = "Re-encode a video into web-ready MP4"),
        (name = "Health", description = "Liveness probe")
    )
)]
pub struct StorageApiDoc;

/// The document for whichever `/normalize` contract is mounted.
pub fn openapi(mode: Mode) -> utoipa::openapi::OpenApi {
    match mode {
        Mode::Presigned => PresignedApiDoc::openapi(),
        Mode::Storage => StorageApiDoc::openapi(),
    }
}
