use std::fmt;

/// Fixed API-version segment prepended to every resource path.
pub const API_VERSION_PREFIX: &str = "/v2.1/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// HTTP verbs used by the Redlink API.
///
/// `Options` is not a CORS preflight here: Redlink repurposes the OPTIONS
/// verb for several read-only "list metadata" endpoints (smtp accounts,
/// sms senders, blacklist reasons). The mapping is preserved for wire
/// compatibility.
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A fully assembled request, immutable once built and discarded per call.
///
/// `uri` is the complete URL including the base host, the `/v2.1/` prefix,
/// resolved placeholders, and the encoded query string. `body` is already
/// JSON-encoded.
pub struct RequestDescriptor {
    pub method: Method,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Replace every occurrence of each `{name}` placeholder with the string
/// form of its value. Placeholders with no supplied value are left verbatim;
/// that is not an error.
pub fn build_path(template: &str, params: &[(&str, String)]) -> String {
    let mut path = template.to_owned();
    for (name, value) in params {
        path = path.replace(&format!("{{{name}}}"), value);
    }
    path
}

/// Build the request path: version prefix, resolved placeholders, and the
/// percent-encoded query appended with `?` only when non-empty.
pub fn build_uri(template: &str, params: &[(&str, String)], query: &[(&str, String)]) -> String {
    let path = build_path(template, params);
    let mut uri = format!("{API_VERSION_PREFIX}{path}");

    if !query.is_empty() {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        uri.push('?');
        uri.push_str(&encoded);
    }

    uri
}
