use serde::Deserialize;

/// Query string a provider appends when redirecting back after authorization.
#[derive(Deserialize, Debug)]
pub struct CallbackQuery {
    pub code: Option<String>,
    /// Set instead of `code` when the user declines access.
    pub error: Option<String>,
    /// Echo of the nonce sent with the authorize redirect.
    pub state: Option<String>,
}
