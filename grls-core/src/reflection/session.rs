//! # Reflection Session
//!
//! A single `ServerReflectionInfo` stream shared by every request of a run.
//!
//! The stream is opened on the first exchange with that first request already queued, because
//! some servers only send response headers together with their first message. After that,
//! each [`exchange`](ReflectionExchange::exchange) pushes one request and waits for exactly one
//! response. Exchanges take `&mut self`, so there is never more than one request in flight.
//!
//! There is no retry and no reconnection: once the stream fails or times out, the session is
//! closed and every later exchange fails with [`ReflectionError::StreamClosed`].
use super::{ReflectionError, ReflectionExchange, ReflectionRequest, ReflectionResponse};
use crate::BoxError;
use crate::config::SessionConfig;
use http_body::Body as HttpBody;
use std::mem;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::{Channel, Endpoint};
use tonic::{Streaming, client::GrpcService};
use tonic_reflection::pb::v1::{
    ServerReflectionRequest, ServerReflectionResponse,
    server_reflection_client::ServerReflectionClient,
};

enum StreamState {
    /// Not opened yet. Holds the receiving half of the request channel.
    Pending(mpsc::Receiver<ServerReflectionRequest>),
    Open(Streaming<ServerReflectionResponse>),
    Closed,
}

/// A bidirectional reflection stream driven one exchange at a time.
pub struct ReflectionSession<T = Channel> {
    client: ServerReflectionClient<T>,
    requests: mpsc::Sender<ServerReflectionRequest>,
    state: StreamState,
    timeout: Option<Duration>,
}

impl ReflectionSession<Channel> {
    /// Connects to the server described by `config`.
    ///
    /// The TCP connection (and TLS handshake, if enabled) happens here; the reflection stream
    /// itself is opened by the first exchange.
    ///
    /// # Returns
    ///
    /// * `Ok(ReflectionSession)` - The connected session.
    /// * `Err(ReflectionError::InvalidAddress)` - The address or TLS settings were rejected.
    /// * `Err(ReflectionError::PlaintextScheme)` - TLS is enabled but the address is `http://`.
    /// * `Err(ReflectionError::Connect)` - The server could not be reached.
    pub async fn connect(config: &SessionConfig) -> Result<Self, ReflectionError> {
        let uri = config.uri();

        if config.tls_over_plaintext_scheme() {
            return Err(ReflectionError::PlaintextScheme(uri));
        }

        let mut endpoint = Endpoint::new(uri.clone())
            .map_err(|e| ReflectionError::InvalidAddress(uri.clone(), e))?;

        if let Some(tls) = &config.tls {
            endpoint = endpoint
                .tls_config(tls.client_tls_config())
                .map_err(|e| ReflectionError::InvalidAddress(uri.clone(), e))?;
        }

        if let Some(timeout) = config.timeout {
            endpoint = endpoint.connect_timeout(timeout);
        }

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| ReflectionError::Connect(uri.clone(), e))?;

        Ok(Self::new(channel).with_timeout(config.timeout))
    }
}

impl<S> ReflectionSession<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    /// Wraps an existing Tonic service (e.g., a `Channel` or an in-process server).
    pub fn new(service: S) -> Self {
        // A single request is ever in flight.
        let (requests, pending) = mpsc::channel(1);

        Self {
            client: ServerReflectionClient::new(service),
            requests,
            state: StreamState::Pending(pending),
            timeout: None,
        }
    }

    /// Fails any exchange that takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn round_trip(
        &mut self,
        request: ReflectionRequest,
    ) -> Result<ReflectionResponse, ReflectionError> {
        if matches!(self.state, StreamState::Closed) {
            return Err(ReflectionError::StreamClosed);
        }

        self.requests
            .send(request.into())
            .await
            .map_err(|_| ReflectionError::SendFailed)?;

        let response = self
            .responses()
            .await?
            .message()
            .await
            .map_err(ReflectionError::StreamFailure)?
            .ok_or(ReflectionError::StreamClosed)?;

        ReflectionResponse::try_from(response)
    }

    async fn responses(
        &mut self,
    ) -> Result<&mut Streaming<ServerReflectionResponse>, ReflectionError> {
        if matches!(self.state, StreamState::Pending(_)) {
            let StreamState::Pending(pending) = mem::replace(&mut self.state, StreamState::Closed)
            else {
                return Err(ReflectionError::StreamClosed);
            };

            let stream = self
                .client
                .server_reflection_info(ReceiverStream::new(pending))
                .await
                .map_err(ReflectionError::StreamInitFailed)?
                .into_inner();

            self.state = StreamState::Open(stream);
        }

        match &mut self.state {
            StreamState::Open(stream) => Ok(stream),
            StreamState::Pending(_) | StreamState::Closed => Err(ReflectionError::StreamClosed),
        }
    }
}

impl<S> ReflectionExchange for ReflectionSession<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    async fn exchange(
        &mut self,
        request: ReflectionRequest,
    ) -> Result<ReflectionResponse, ReflectionError> {
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.round_trip(request))
                .await
                .unwrap_or(Err(ReflectionError::Timeout(limit))),
            None => self.round_trip(request).await,
        };

        // A late answer would be read as the answer to the next request.
        if result.as_ref().is_err_and(ReflectionError::is_transport) {
            self.state = StreamState::Closed;
        }

        result
    }
}
