//! URI encoding for object keys.

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encodes an object key for use in a request path.
///
/// Unreserved characters (RFC 3986) and `/` pass through unchanged; every
/// other byte of the UTF-8 encoding becomes `%XX` with uppercase hex. The
/// same string is used both on the wire and in the signed resource.
pub(crate) fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for &byte in key.as_bytes() {
        if is_unreserved(byte) || byte == b'/' {
            encoded.push(char::from(byte));
        } else {
            encoded.push('%');
            encoded.push(char::from(HEX_UPPER[usize::from(byte >> 4)]));
            encoded.push(char::from(HEX_UPPER[usize::from(byte & 0x0F)]));
        }
    }
    encoded
}

const fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keys_are_unchanged() {
        assert_eq!(encode_key("sample.txt"), "sample.txt");
        assert_eq!(encode_key("dir/sub-dir/file_1~.txt"), "dir/sub-dir/file_1~.txt");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(encode_key("a b+c"), "a%20b%2Bc");
        assert_eq!(encode_key("test$file.text"), "test%24file.text");
        assert_eq!(encode_key("q?x=1&y#z"), "q%3Fx%3D1%26y%23z");
    }

    #[test]
    fn multibyte_characters_are_escaped_per_byte() {
        assert_eq!(encode_key("日本"), "%E6%97%A5%E6%9C%AC");
    }
}
