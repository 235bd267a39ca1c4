use url::Url;

const QUERY_HASH_LEN: usize = 8;

/// Maps a URL to the name of the file its body is saved under.
///
/// `host` + path (trailing slash dropped, `/` replaced by `-`) + an optional
/// `-xxxxxxxx` fragment taken from the MD5 of the raw query string + `.html`.
/// The port and fragment never contribute.
pub fn derive_filename(url: &Url) -> String {
    let mut name = url.host_str().unwrap_or_default().to_string();

    let path = url.path();
    let path = path.strip_suffix('/').unwrap_or(path);
    if !path.is_empty() {
        name.push_str(&path.replace('/', "-"));
    }

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        let digest = format!("{:x}", md5::compute(query.as_bytes()));
        name.push('-');
        name.push_str(&digest[..QUERY_HASH_LEN]);
    }

    name.push_str(".html");
    name
}
