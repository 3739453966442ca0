use crate::batch::UploadBatch;
use crate::config::ClientConfig;
use crate::error::TransferError;
use crate::progress::{ProgressSink, Status};
use common::file_utils::to_slash_path;
use common::{format_mod_time, MODTIME_HEADER, OCTET_STREAM, UPLOAD_ROUTE};
use log::{debug, error, info};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

/// Uploads files to the receiver, one at a time
pub struct Transmitter {
    client: Client,
    server: Url,
}

impl Transmitter {
    /// Create a transmitter for the receiver at `config.server`
    pub fn new(config: &ClientConfig) -> Result<Self, TransferError> {
        let server = parse_server_url(&config.server)?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, server })
    }

    /// Upload everything under `selected`, stopping at the first failure.
    ///
    /// Progress goes to `sink` as status lines; the number of transferred
    /// files is returned on success.
    pub fn transmit(&self, selected: &Path, sink: &dyn ProgressSink) -> Result<usize, TransferError> {
        let batch = match UploadBatch::collect(selected) {
            Ok(batch) => batch,
            Err(e) => {
                error!("{}", e);
                sink.report(&Status::Failed(&e).to_string());
                return Err(e);
            }
        };

        info!(
            "Found {} files to upload (base directory: {:?})",
            batch.len(),
            batch.base_dir()
        );

        for file in batch.files() {
            sink.report(&Status::Sending(file).to_string());
            if let Err(e) = self.upload_one(file, batch.base_dir()) {
                error!("Upload of {:?} failed: {}", file, e);
                sink.report(&Status::Failed(&e).to_string());
                return Err(e);
            }
        }

        sink.report(&Status::Done(batch.len()).to_string());
        Ok(batch.len())
    }

    /// Run `transmit` on a background thread so the caller stays responsive
    pub fn spawn<S>(
        self: Arc<Self>,
        selected: PathBuf,
        sink: S,
    ) -> std::io::Result<thread::JoinHandle<Result<usize, TransferError>>>
    where
        S: ProgressSink + 'static,
    {
        thread::Builder::new()
            .name("transmit".to_string())
            .spawn(move || self.transmit(&selected, &sink))
    }

    /// Upload one file to `<server>/upload/<path relative to base_dir>`
    ///
    /// Succeeds only when the receiver answers `201 Created`.
    pub fn upload_one(&self, file_path: &Path, base_dir: &Path) -> Result<(), TransferError> {
        let relative = file_path
            .strip_prefix(base_dir)
            .map_err(|_| TransferError::OutsideBase {
                path: file_path.to_path_buf(),
                base: base_dir.to_path_buf(),
            })?;
        let relative = to_slash_path(relative).ok_or_else(|| TransferError::UnsupportedPath {
            path: file_path.to_path_buf(),
        })?;

        let mut file = File::open(file_path).map_err(|source| TransferError::Open {
            path: file_path.to_path_buf(),
            source,
        })?;
        let read_error = |source| TransferError::Read {
            path: file_path.to_path_buf(),
            source,
        };
        let metadata = file.metadata().map_err(read_error)?;
        let mut content = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
        file.read_to_end(&mut content).map_err(read_error)?;
        drop(file);

        let url = self.upload_url(&relative);
        let mut request = self
            .client
            .put(url)
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(content);

        match metadata.modified() {
            Ok(modified) => request = request.header(MODTIME_HEADER, format_mod_time(modified)),
            Err(e) => debug!("No modification time for {:?}: {}", file_path, e),
        }

        let response = request.send()?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TransferError::Rejected {
                status,
                body: error_text.trim().to_string(),
            });
        }

        info!("Uploaded file: {}", relative);
        Ok(())
    }

    /// Upload URL for a slash-separated relative path, each segment percent-encoded
    pub fn upload_url(&self, relative: &str) -> Url {
        let mut url = self.server.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(UPLOAD_ROUTE.trim_start_matches('/'))
                .extend(relative.split('/'));
        }
        url
    }
}

fn parse_server_url(server: &str) -> Result<Url, TransferError> {
    let invalid = |reason: String| TransferError::InvalidServerUrl {
        url: server.to_string(),
        reason,
    };
    let url = Url::parse(server).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_string()));
    }
    Ok(url)
}
