use url::Url;

/// Parses `input` as an absolute URL and keeps it only when the scheme is `http` or `https`.
pub fn parse_http_url(input: &str) -> Option<Url> {
    let url = Url::parse(input).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url),
        _ => None,
    }
}

pub fn is_valid_url(input: &str) -> bool {
    parse_http_url(input).is_some()
}
