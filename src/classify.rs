use crate::error::FetchError;
use crate::url_check::parse_http_url;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, LOCATION};
use url::Url;

/// What a single HTTP response means for the fetch chain it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    /// `location` is the URL to request next; `target` is how it is shown in reports:
    /// the `Location` value itself when absolute, the resolved URL otherwise.
    Redirect { location: Url, target: String },
    Failure(FetchError),
}

/// Sorts a response for `url` by status class. `requested` is the form of `url` the
/// caller asked for and is what failure messages quote.
///
/// Redirects carry their `Location` already resolved against `url`, so relative
/// targets work. A redirect whose `Location` is missing, unreadable, or not an
/// http(s) URL is a failure in the transport message format.
pub fn classify(url: &Url, requested: &str, status: StatusCode, headers: &HeaderMap) -> ResponseClass {
    if status.is_success() {
        return ResponseClass::Success;
    }

    if status.is_redirection() {
        return match redirect_target(url, headers) {
            Ok((location, target)) => ResponseClass::Redirect { location, target },
            Err(message) => ResponseClass::Failure(FetchError::transport(requested, message)),
        };
    }

    ResponseClass::Failure(FetchError::HttpStatus {
        url: requested.to_string(),
        code: status.as_u16(),
        reason: status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string(),
    })
}

fn redirect_target(url: &Url, headers: &HeaderMap) -> Result<(Url, String), String> {
    let raw = headers
        .get(LOCATION)
        .ok_or_else(|| "redirect response has no Location header".to_string())?
        .to_str()
        .map_err(|e| format!("unreadable Location header: {}", e))?;

    let resolved = url
        .join(raw)
        .map_err(|e| format!("invalid redirect target '{}': {}", raw, e))?;

    let location = parse_http_url(resolved.as_str())
        .ok_or_else(|| format!("unsupported redirect target '{}'", resolved))?;

    let target = match parse_http_url(raw) {
        Some(_) => raw.to_string(),
        None => location.to_string(),
    };
    Ok((location, target))
}
