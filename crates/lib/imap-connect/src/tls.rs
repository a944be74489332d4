//! rustls connector setup.

/// Errors returned while preparing the TLS connector.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Loading system root certificates failed and none were usable.
    #[error("failed to load system root certificates: {0}")]
    RootCerts(#[source] rustls_native_certs::Error),

    /// The system has no root certificates.
    #[error("no system root certificates available")]
    NoRootCerts,
}

/// Build a rustls connector configured with system root certificates.
///
/// Individual certificate load errors are logged and skipped as long as at
/// least one root certificate was loaded.
pub(crate) fn connector() -> Result<tokio_rustls::TlsConnector, ConnectorError> {
    let rustls_native_certs::CertificateResult { certs, errors, .. } =
        rustls_native_certs::load_native_certs();

    for error in &errors {
        tracing::warn!(%error, "failed to load a system root certificate");
    }

    let mut root_store = rustls::RootCertStore::empty();
    let (added, ignored) = root_store.add_parsable_certificates(certs);
    tracing::debug!(added, ignored, "loaded system root certificates");

    if root_store.is_empty() {
        return Err(match errors.into_iter().next() {
            Some(error) => ConnectorError::RootCerts(error),
            None => ConnectorError::NoRootCerts,
        });
    }

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    Ok(tokio_rustls::TlsConnector::from(std::sync::Arc::new(config)))
}
