use crate::header::Target;

/// Base trait for all request types which can be canonicalized.
pub trait RequestLike {
    /// Returns every header on the request, in order. Header names may use any case,
    /// and the same name may appear more than once: the last value wins.
    fn headers(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>;

    /// Returns the request body. An empty body is still part of the signature string.
    fn body(&self) -> &str;

    /// Returns the method and path of the request, if known. This is only consulted
    /// when the canonicalization config does not specify a target itself.
    fn target(&self) -> Option<Target> {
        None
    }
}

impl<T: RequestLike> RequestLike for &T {
    fn headers(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        (**self).headers()
    }
    fn body(&self) -> &str {
        (**self).body()
    }
    fn target(&self) -> Option<Target> {
        (**self).target()
    }
}

/// Header values which are not valid UTF-8 are skipped.
impl<B: AsRef<str>> RequestLike for http::Request<B> {
    fn headers(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(
            http::Request::headers(self)
                .iter()
                .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?))),
        )
    }
    fn body(&self) -> &str {
        <B as AsRef<str>>::as_ref(http::Request::body(self))
    }
    fn target(&self) -> Option<Target> {
        let uri = self.uri();
        let path = uri
            .path_and_query()
            .map_or_else(|| uri.path(), |path_and_query| path_and_query.as_str());
        Some(Target::new(self.method().as_str(), path))
    }
}
