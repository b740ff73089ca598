use url::Url;

/// Mask the password of a connection URL for display.
pub fn redact_url_password(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("***")).is_ok() {
                url.to_string()
            } else {
                raw.to_string()
            }
        }
        Ok(_) => raw.to_string(),
        // Unparseable input may still carry a secret; show only the scheme.
        Err(_) => match raw.split_once("://") {
            Some((scheme, _)) => format!("{scheme}://<redacted>"),
            None => "<redacted>".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_password_only() {
        assert_eq!(
            redact_url_password("postgres://bpa:hunter2@db:5432/bpa"),
            "postgres://bpa:***@db:5432/bpa"
        );
        assert_eq!(redact_url_password("postgres://db/bpa"), "postgres://db/bpa");
    }
}
