//! Blake3 hashing utilities for request identity.
//!
//! The response cache keys entries by a digest of the request rather than by
//! the raw URL so that bodies of arbitrary size map to a fixed-width key.

use crate::types::HttpMethod;

/// Identity of a request for caching purposes.
///
/// Two requests with the same method, resolved URL and body share a key.
pub fn request_key(method: HttpMethod, url: &str, body: Option<&[u8]>) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(method.as_str().as_bytes());
    hasher.update(b" ");
    hasher.update(url.as_bytes());
    if let Some(body) = body {
        hasher.update(b"\n");
        hasher.update(body);
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_request_key_distinguishes_method_and_url() {
        let get = request_key(HttpMethod::Get, "http://api/items", None);
        let post = request_key(HttpMethod::Post, "http://api/items", None);
        let other = request_key(HttpMethod::Get, "http://api/items/1", None);

        assert_ne!(get, post);
        assert_ne!(get, other);
        assert_eq!(get, request_key(HttpMethod::Get, "http://api/items", None));
    }

    #[test]
    fn test_request_key_includes_body() {
        let a = request_key(HttpMethod::Get, "http://api/search", Some(b"{\"q\":\"a\"}"));
        let b = request_key(HttpMethod::Get, "http://api/search", Some(b"{\"q\":\"b\"}"));
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn request_key_is_deterministic(url in "[a-z/]{0,40}", body in prop::collection::vec(any::<u8>(), 0..64)) {
            let first = request_key(HttpMethod::Get, &url, Some(&body));
            let second = request_key(HttpMethod::Get, &url, Some(&body));
            prop_assert_eq!(first.len(), 64);
            prop_assert_eq!(first, second);
        }
    }
}
