//! Infrastructure layer: concrete implementations of the domain traits and
//! the wire format.

pub mod ai;
pub mod codec;
pub mod dto;
pub mod registry;
pub mod transcript;

use crate::domain::CollaboratorError;

/// Shared mapping for the HTTP-backed collaborators.
pub(crate) fn map_reqwest_error(e: reqwest::Error) -> CollaboratorError {
    if e.is_timeout() {
        CollaboratorError::Timeout
    } else {
        CollaboratorError::Request(e.to_string())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;

    /// Serve `app` on an ephemeral local port and return its base URL.
    pub async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
