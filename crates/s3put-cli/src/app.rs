//! Wiring from parsed arguments to a finished upload.

use s3put_core::{ObjectBody, Result, UploadOutput, Uploader};
use s3put_aws::S3Client;
use tokio_util::sync::CancellationToken;

use crate::config::Cli;

/// Builds the client from `cli` and uploads `body` once.
///
/// # Errors
///
/// Returns the classified upload error; nothing is printed here.
pub async fn execute(cli: &Cli, body: ObjectBody, token: CancellationToken) -> Result<UploadOutput> {
    let client = S3Client::new(cli.s3.clone(), cli.upload.credentials())?;
    let uploader = Uploader::new(client.into_service());

    uploader
        .upload_with_cancellation(cli.upload.request(body), token)
        .await
}
