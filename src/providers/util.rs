use crate::core::error::{LookupError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Successful upstream response, kept as text so parse failures can report it.
#[derive(Debug)]
pub struct UpstreamBody {
    pub status: u16,
    pub text: String,
}

impl UpstreamBody {
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.text).map_err(|e| {
            debug!(error = ?e, response = %self.text, "Failed to parse upstream response");
            LookupError::Upstream {
                status: self.status,
                message: format!("Failed to parse response: {e}"),
            }
        })
    }
}

pub fn http_client(user_agent: &str) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().user_agent(user_agent).build()
}

/// Issues a GET bounded by `deadline`. Whole-body reads count against it.
///
/// On expiry the request future is dropped, which aborts the in-flight call
/// and releases its connection. `target` names the subject in timeout errors.
pub async fn get_with_deadline(
    client: &reqwest::Client,
    url: &str,
    deadline: Duration,
    target: &str,
) -> Result<UpstreamBody> {
    let request = async {
        let response = client.get(url).send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok::<_, reqwest::Error>((status, text))
    };

    let (status, text) = match tokio::time::timeout(deadline, request).await {
        Ok(Ok(received)) => received,
        Ok(Err(e)) => return Err(transport_error(e, target)),
        Err(_) => {
            warn!(%url, ?deadline, "Upstream request timed out");
            return Err(LookupError::Timeout {
                target: target.to_string(),
            });
        }
    };

    debug!(%url, %status, "Received upstream response");
    if !status.is_success() {
        return Err(LookupError::upstream(status.as_u16(), text));
    }

    Ok(UpstreamBody {
        status: status.as_u16(),
        text,
    })
}

fn transport_error(e: reqwest::Error, target: &str) -> LookupError {
    if e.is_timeout() {
        LookupError::Timeout {
            target: target.to_string(),
        }
    } else {
        LookupError::Network(e.to_string())
    }
}
