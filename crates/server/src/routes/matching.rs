use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use vpm::{ImageUpload, RankedResults};

/// Multipart field the upload is expected under.
pub const UPLOAD_FIELD: &str = "image";

/// Match response
#[derive(Debug, Serialize)]
pub struct MatchResponse<'a> {
    pub results: RankedResults<'a>,
}

/// Match an uploaded image against the product catalog.
///
/// Expects a multipart body carrying one file, preferably under the `image`
/// field. The filename decides the accepted format (`.png`, `.jpg`, `.jpeg`).
/// The image is labeled by the configured label source and every catalog
/// product is scored by the fraction of its labels that were detected.
///
/// # Response
///
/// ```json
/// { "results": [ { "product": { "...": "..." }, "similarity_score": 0.5 } ] }
/// ```
///
/// Failures keep status 200 and answer `{ "error": "<message>" }`.
pub async fn match_upload(
    State(state): State<Arc<ServerState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Response> {
    metrics::counter!("vpm_match_requests_total").increment(1);

    let result = match multipart {
        Ok(mut multipart) => run_match(&state, &mut multipart).await,
        Err(rejection) => Err(ServerError::from(rejection)),
    };
    if let Err(err) = &result {
        metrics::counter!("vpm_match_errors_total", "kind" => err.kind()).increment(1);
        tracing::warn!(kind = err.kind(), error = %err, "match request failed");
    }
    result
}

async fn run_match(state: &ServerState, multipart: &mut Multipart) -> ServerResult<Response> {
    let upload = read_upload(multipart).await?;
    tracing::info!(
        filename = %upload.filename,
        bytes = upload.bytes.len(),
        "received upload"
    );

    let results = vpm::match_image(state.labeler.as_ref(), &state.catalog, &upload).await?;
    Ok(Json(MatchResponse { results }).into_response())
}

/// Pull the uploaded file out of the multipart body.
///
/// The first field carrying a filename is used. An `image` field without a
/// filename is rejected rather than skipped.
async fn read_upload(multipart: &mut Multipart) -> ServerResult<ImageUpload> {
    while let Some(field) = multipart.next_field().await? {
        let named_image = field.name() == Some(UPLOAD_FIELD);
        let Some(filename) = field.file_name().map(str::to_owned) else {
            if named_image {
                return Err(ServerError::BadRequest(format!(
                    "`{UPLOAD_FIELD}` field must be a file upload"
                )));
            }
            continue;
        };

        let bytes = field.bytes().await?;
        return Ok(ImageUpload::new(filename, bytes));
    }

    Err(ServerError::BadRequest(format!(
        "no file uploaded; send the image in the `{UPLOAD_FIELD}` field"
    )))
}
