use crate::handlers::error::handle_storage_error;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use common::{parse_mod_time, MODTIME_HEADER};
use futures_util::StreamExt;
use std::io;
use tracing::{debug, info};

/// Handle `PUT /upload/<relative path>`: write the body under the storage root
pub async fn upload(
    path: web::Path<String>,
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let relative_path = path.into_inner();
    let mod_time = requested_mod_time(&req);

    // Debug formatter escapes control characters coming from the URL
    info!(
        path = ?relative_path,
        mod_time = ?mod_time,
        "PUT /upload - Request received"
    );

    let body = payload
        .map(|chunk| chunk.map_err(|e| io::Error::other(e.to_string())))
        .boxed_local();

    let stored = state
        .storage
        .store_file(&relative_path, body, mod_time)
        .await
        .map_err(handle_storage_error)?;

    info!(
        path = ?relative_path,
        local_path = ?stored.path,
        bytes = stored.bytes_written,
        "PUT /upload - File stored"
    );

    Ok(HttpResponse::Created().finish())
}

/// Modification time requested by the client, if the header is present and valid
fn requested_mod_time(req: &HttpRequest) -> Option<DateTime<Utc>> {
    let value = req.headers().get(MODTIME_HEADER)?;
    let parsed = value
        .to_str()
        .ok()
        .and_then(|s| parse_mod_time(s).ok());
    if parsed.is_none() {
        debug!(value = ?value, "Ignoring malformed {} header", MODTIME_HEADER);
    }
    parsed
}
