//! Operator-facing output and exit codes.

use s3put_core::{Error, ErrorKind, UploadOutput};

use crate::TRACING_TARGET_UPLOAD;

/// Returns the process exit code for a failed upload.
///
/// Codes start at 3; clap exits with 2 on usage errors.
pub fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Configuration => 3,
        ErrorKind::Canceled => 4,
        ErrorKind::RemoteApi => 5,
        ErrorKind::Transport => 6,
    }
}

/// The single stdout line printed after a successful upload.
pub fn success_message(output: &UploadOutput) -> String {
    format!("successfully uploaded file to {}", output.location())
}

/// Logs a failed upload with its structured context at debug level.
///
/// The diagnostic line itself is printed by the caller.
pub fn log_failure(error: &Error) {
    match error.remote() {
        Some(remote) => tracing::debug!(
            target: TRACING_TARGET_UPLOAD,
            kind = %error.kind,
            code = %remote.code,
            status = remote.status,
            request_id = ?remote.request_id,
            "Upload failed"
        ),
        None => tracing::debug!(
            target: TRACING_TARGET_UPLOAD,
            kind = %error.kind,
            error = %error,
            "Upload failed"
        ),
    }
}
