use axum_core::body::Body;
use futures_util::stream;
use http::{header, HeaderMap};
use http_body_util::{BodyExt, Limited};

const URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

enum FormKind {
    UrlEncoded,
    Multipart(String),
}

fn form_kind(headers: &HeaderMap) -> Option<FormKind> {
    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let mime = content_type.split(';').next()?.trim();

    if mime.eq_ignore_ascii_case(URLENCODED) {
        Some(FormKind::UrlEncoded)
    } else if mime.eq_ignore_ascii_case(MULTIPART) {
        multer::parse_boundary(content_type)
            .ok()
            .map(FormKind::Multipart)
    } else {
        None
    }
}

/// Buffers a form body and looks up `field` in it, handing back a body with
/// the same bytes for the handler.
///
/// Both url-encoded and multipart bodies are read. When the field repeats, the
/// last value counts. Bodies of other types, over `limit` or unreadable yield
/// no value.
pub(crate) async fn read_field(
    headers: &HeaderMap,
    body: Body,
    field: &str,
    limit: usize,
) -> (Option<String>, Body) {
    let Some(kind) = form_kind(headers) else {
        return (None, body);
    };

    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            tracing::debug!(err = %err, "couldn't read form body");
            return (None, Body::empty());
        }
    };

    let value = match kind {
        FormKind::UrlEncoded => serde_urlencoded::from_bytes::<Vec<(String, String)>>(&bytes)
            .ok()
            .and_then(|pairs| {
                pairs
                    .into_iter()
                    .filter(|(name, _)| name == field)
                    .last()
                    .map(|(_, value)| value)
            }),
        FormKind::Multipart(boundary) => {
            let chunk = bytes.clone();
            let stream = stream::once(async move { Ok::<_, std::io::Error>(chunk) });
            let mut multipart = multer::Multipart::new(stream, boundary);
            let mut value = None;

            loop {
                match multipart.next_field().await {
                    Ok(Some(part)) if part.name() == Some(field) => match part.text().await {
                        Ok(text) => value = Some(text),
                        Err(err) => {
                            tracing::debug!(err = %err, "couldn't read multipart field");
                            break;
                        }
                    },
                    Ok(Some(_)) => {}
                    Ok(None) => break,
                    Err(err) => {
                        tracing::debug!(err = %err, "couldn't parse multipart body");
                        break;
                    }
                }
            }

            value
        }
    };

    (value, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    async fn read(content_type: &'static str, body: &'static str) -> Option<String> {
        read_field(&headers(content_type), Body::from(body), "csrf_token", 1024)
            .await
            .0
    }

    #[tokio::test]
    async fn reads_urlencoded_field() {
        let value = read(URLENCODED, "note=hi&csrf_token=a%2Bb").await;

        assert_eq!(value.as_deref(), Some("a+b"));
    }

    #[tokio::test]
    async fn last_repeated_field_wins() {
        let value = read(URLENCODED, "csrf_token=bad&csrf_token=good").await;

        assert_eq!(value.as_deref(), Some("good"));
    }

    #[tokio::test]
    async fn reads_multipart_field() {
        let body = "--XX\r\n\
            Content-Disposition: form-data; name=\"upload\"; filename=\"a.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            file contents\r\n\
            --XX\r\n\
            Content-Disposition: form-data; name=\"csrf_token\"\r\n\r\n\
            tok\r\n\
            --XX--\r\n";

        let value = read("multipart/form-data; boundary=XX", body).await;

        assert_eq!(value.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn ignores_other_content_types() {
        assert_eq!(read("application/json", r#"{"csrf_token":"tok"}"#).await, None);
        assert_eq!(read("multipart/form-data", "csrf_token=tok").await, None);
    }

    #[tokio::test]
    async fn keeps_body_for_handler() -> Result<(), axum_core::Error> {
        let (_, body) = read_field(
            &headers(URLENCODED),
            Body::from("csrf_token=tok&note=hi"),
            "csrf_token",
            1024,
        )
        .await;

        let bytes = body.collect().await?.to_bytes();
        assert_eq!(&bytes[..], b"csrf_token=tok&note=hi");

        Ok(())
    }

    #[tokio::test]
    async fn oversized_body_yields_nothing() {
        let (value, _) = read_field(
            &headers(URLENCODED),
            Body::from("csrf_token=a-rather-long-token"),
            "csrf_token",
            8,
        )
        .await;

        assert_eq!(value, None);
    }
}
