//! `CodebreakServer` builder and accept loop.
//!
//! This ties the layers together: transport → gateway handler →
//! session directory.

use std::sync::Arc;

use codebreak_game::{SessionConfig, SessionDirectory};
use codebreak_protocol::{Codec, JsonCodec};
use codebreak_transport::{Transport, WebSocketTransport};

use crate::CodebreakError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) directory: Arc<SessionDirectory>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Codebreak server.
///
/// # Example
///
/// ```rust,ignore
/// let server = CodebreakServer::builder()
///     .bind("0.0.0.0:8000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct CodebreakServerBuilder {
    bind_addr: String,
    session_config: SessionConfig,
}

impl CodebreakServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            session_config: SessionConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every session is created with.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Binds the listener. Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<CodebreakServer<JsonCodec>, CodebreakError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            directory: Arc::new(SessionDirectory::new(self.session_config)),
            codec: JsonCodec,
        });

        Ok(CodebreakServer { transport, state })
    }
}

impl Default for CodebreakServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Codebreak server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct CodebreakServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl CodebreakServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> CodebreakServerBuilder {
        CodebreakServerBuilder::new()
    }
}

impl<C: Codec> CodebreakServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The live session directory.
    pub fn directory(&self) -> Arc<SessionDirectory> {
        Arc::clone(&self.state.directory)
    }

    /// Runs the accept loop, spawning one handler task per connection.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), CodebreakError> {
        tracing::info!("Codebreak server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
