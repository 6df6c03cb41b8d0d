//! Canned access control lists.

use strum::{AsRefStr, Display, EnumString};

/// Predefined grant set sent as the `x-amz-acl` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[strum(serialize_all = "kebab-case")]
pub enum CannedAcl {
    /// Owner gets full control; no one else has access.
    Private,
    /// Anyone can read the object.
    PublicRead,
    /// Anyone can read and write the object.
    PublicReadWrite,
    /// Authenticated users can read the object.
    AuthenticatedRead,
    /// EC2 can read the object for AMI bundles.
    AwsExecRead,
    /// The bucket owner can read the object.
    BucketOwnerRead,
    /// Owner and bucket owner get full control.
    BucketOwnerFullControl,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn header_values_are_kebab_case() {
        assert_eq!(CannedAcl::PublicRead.as_ref(), "public-read");
        assert_eq!(CannedAcl::AwsExecRead.to_string(), "aws-exec-read");
        assert_eq!(
            CannedAcl::BucketOwnerFullControl.as_ref(),
            "bucket-owner-full-control"
        );
        assert_eq!(
            CannedAcl::from_str("authenticated-read").unwrap(),
            CannedAcl::AuthenticatedRead
        );
        assert!(CannedAcl::from_str("public_read").is_err());
    }
}
