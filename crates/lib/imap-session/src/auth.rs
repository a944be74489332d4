//! Authentication.

/// Authenticate with `LOGIN` to obtain a session.
pub(crate) async fn login<S: crate::Stream>(
    client: async_imap::Client<S>,
    username: &str,
    password: &str,
) -> Result<async_imap::Session<S>, mailbox_core::Error> {
    tracing::debug!(imap_username = %username, "sending LOGIN");

    client
        .login(username, password)
        .await
        .map_err(|(err, _client)| crate::error::classify_login(err))
}
