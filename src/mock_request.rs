use crate::{RequestLike, Target};

/// A mock request type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockRequest {
    target: Option<Target>,
    headers: Vec<(String, String)>,
    body: String,
}

impl MockRequest {
    /// Constructs a new mock request with no target, no headers and an empty body
    pub fn new() -> Self {
        Self::default()
    }
    /// Set the method and path of this mock request
    pub fn with_target(mut self, method: &str, path: &str) -> Self {
        self.target = Some(Target::new(method, path));
        self
    }
    /// Convenience method for setting a header. Header values may span multiple lines.
    ///
    /// Setting a header which already exists (ignoring case) replaces it.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.into(), value.into()));
        self
    }
    /// Method for setting a request body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

impl RequestLike for MockRequest {
    fn headers(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(
            self.headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )
    }
    fn body(&self) -> &str {
        &self.body
    }
    fn target(&self) -> Option<Target> {
        self.target.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{CanonicalizeConfig, CanonicalizeExt};

    /// Test request as defined in the draft specification:
    /// https://tools.ietf.org/id/draft-cavage-http-signatures-09.html#rfc.appendix.C
    ///
    /// ```
    /// POST /foo?param=value&pet=dog HTTP/1.1
    /// Host: example.com
    /// Date: Sun, 05 Jan 2014 21:31:40 GMT
    /// Content-Type: application/json
    /// Digest: SHA-256=X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE=
    /// Content-Length: 18
    ///
    /// {"hello": "world"}
    /// ```
    fn test_request() -> MockRequest {
        MockRequest::new()
            .with_target("POST", "/foo?param=value&pet=dog")
            .with_header("Host", "example.com")
            .with_header("Date", "Sun, 05 Jan 2014 21:31:40 GMT")
            .with_header("Content-Type", "application/json")
            .with_header(
                "Digest",
                "SHA-256=X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE=",
            )
            .with_header("Content-Length", "18")
            .with_body(r#"{"hello": "world"}"#)
    }

    fn headers(names: &str) -> Vec<String> {
        names.split(' ').map(String::from).collect()
    }

    /// https://tools.ietf.org/id/draft-cavage-http-signatures-09.html#default-test
    #[test]
    fn default_test() {
        let res = test_request().canonicalize(&CanonicalizeConfig::new());
        assert_eq!(
            res.as_str(),
            "date: Sun, 05 Jan 2014 21:31:40 GMT\n{\"hello\": \"world\"}"
        );
    }

    /// https://tools.ietf.org/id/draft-cavage-http-signatures-09.html#basic-test
    #[test]
    fn basic_test() {
        let config =
            CanonicalizeConfig::new().with_signature_headers(headers("(request-target) host date"));
        let res = test_request().canonicalize(&config);

        assert_eq!(
            res.as_str(),
            "(request-target): post /foo?param=value&pet=dog\nhost: example.com\ndate: Sun, 05 Jan 2014 21:31:40 GMT\n{\"hello\": \"world\"}"
        );
    }

    /// https://tools.ietf.org/id/draft-cavage-http-signatures-09.html#all-headers-test
    #[test]
    fn all_headers_test() {
        let config = CanonicalizeConfig::new().with_signature_headers(headers(
            "(request-target) host date content-type digest content-length",
        ));
        let res = test_request().canonicalize(&config);

        assert_eq!(
            res.as_str(),
            "(request-target): post /foo?param=value&pet=dog\nhost: example.com\ndate: Sun, 05 Jan 2014 21:31:40 GMT\ncontent-type: application/json\ndigest: SHA-256=X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE=\ncontent-length: 18\n{\"hello\": \"world\"}"
        );
    }

    #[test]
    fn replaces_headers() {
        let req = MockRequest::new()
            .with_header("Host", "a.example.com")
            .with_header("HOST", "b.example.com");

        assert_eq!(
            req.headers().collect::<Vec<_>>(),
            vec![("HOST", "b.example.com")]
        );
    }
}
