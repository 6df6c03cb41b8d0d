//! Value types exchanged between the uploader and storage providers.

mod acl;
mod body;
mod credentials;
mod output;
mod request;

pub use acl::CannedAcl;
pub use body::ObjectBody;
pub use credentials::Credentials;
pub use output::{PutObjectOutput, UploadOutput};
pub use request::{PutObjectRequest, UploadRequest};
