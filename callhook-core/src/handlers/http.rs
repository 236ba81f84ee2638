use super::HandlerError;
use reqwest::redirect::Policy;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Build the client shared by the HTTP handlers.
///
/// Redirects are not followed. reqwest would replay a redirected POST as a
/// GET without the body, so a 3xx reply surfaces as `DeliveryFailed`.
pub fn delivery_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .redirect(Policy::none())
        .build()
}

/// POST `body` as JSON and map any non-success status to
/// [`HandlerError::DeliveryFailed`].
pub(super) async fn post_json<T: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &Url,
    body: &T,
    headers: &[(&'static str, &str)],
) -> Result<(), HandlerError> {
    let mut request = client.post(url.as_str()).json(body);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(HandlerError::DeliveryFailed {
            status: status.as_u16(),
            body,
        })
    }
}
