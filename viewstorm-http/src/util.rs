pub(super) fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

pub(super) fn host_header_value(parsed: &url::Url) -> Option<String> {
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{host}:{port}")),
        None => Some(host.to_string()),
    }
}

/// First `max_chars` characters of `body`, decoded lossily.
pub(super) fn preview(body: &[u8], max_chars: usize) -> String {
    String::from_utf8_lossy(body).chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let body = "ééé".as_bytes();
        assert_eq!(preview(body, 2), "éé");
        assert_eq!(preview(b"short", 200), "short");
    }

    #[test]
    fn host_header_keeps_explicit_port() {
        let parsed = match url::Url::parse("http://127.0.0.1:15201/api") {
            Ok(v) => v,
            Err(err) => panic!("parse failed: {err}"),
        };
        assert_eq!(host_header_value(&parsed).as_deref(), Some("127.0.0.1:15201"));
    }
}
