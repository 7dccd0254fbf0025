use serde::{Deserialize, Serialize};

/// Question as sent by the caller, either in the query string or as a JSON body.
#[derive(Debug, Deserialize)]
pub struct AskQuery {
    pub question: Option<String>,
    #[serde(alias = "sessionId")]
    pub session_id: Option<String>,
}

impl AskQuery {
    /// Drops blank session ids and the `None` placeholder some clients send.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != "None")
    }
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
