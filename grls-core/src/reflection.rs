//! # Server Reflection
//!
//! This module contains the logic necessary to talk to the gRPC Server Reflection Protocol
//! (`grpc.reflection.v1`).
//!
//! The protocol multiplexes every kind of query over one bidirectional stream and correlates
//! answers to questions only by arrival order. We only need two of its queries, so the protocol
//! `oneof`s are narrowed down to the two-variant [`ReflectionRequest`] and [`ReflectionResponse`]
//! enums, and every exchange goes through [`ReflectionExchange::exchange`].
//!
//! ## References
//!
//! * [gRPC Server Reflection Protocol](https://github.com/grpc/grpc/blob/master/doc/server-reflection.md)
pub mod session;

use std::future::Future;
use std::time::Duration;
use tonic_reflection::pb::v1::{
    ServerReflectionRequest, ServerReflectionResponse, server_reflection_request::MessageRequest,
    server_reflection_response::MessageResponse,
};

#[derive(Debug, thiserror::Error)]
pub enum ReflectionError {
    #[error("Invalid address '{0}': {1}")]
    InvalidAddress(String, #[source] tonic::transport::Error),

    #[error("TLS is enabled but '{0}' uses the plaintext http scheme")]
    PlaintextScheme(String),

    #[error("Failed to connect to '{0}': {1}")]
    Connect(String, #[source] tonic::transport::Error),

    #[error(
        "Failed to start a stream request with the reflection server, reflection might not be supported: '{0}'"
    )]
    StreamInitFailed(#[source] tonic::Status),

    #[error("The server stream returned an error status: '{0}'")]
    StreamFailure(#[source] tonic::Status),

    #[error("Reflection stream closed unexpectedly")]
    StreamClosed,

    #[error("Internal error: Failed to send request to stream")]
    SendFailed,

    #[error("The reflection server did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Server returned reflection error code {code}: {message}")]
    Server { code: i32, message: String },

    #[error("Protocol error: Received unexpected response type: {0}")]
    UnexpectedResponse(String),

    #[error("Failed to decode FileDescriptorProto: {0}")]
    Decode(#[from] prost::DecodeError),
}

impl ReflectionError {
    /// Whether the failure happened in the transport (connection, TLS, stream) rather than in
    /// the content of an answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ReflectionError::InvalidAddress(..)
                | ReflectionError::PlaintextScheme(_)
                | ReflectionError::Connect(..)
                | ReflectionError::StreamInitFailed(_)
                | ReflectionError::StreamFailure(_)
                | ReflectionError::StreamClosed
                | ReflectionError::SendFailed
                | ReflectionError::Timeout(_)
        )
    }
}

// The host defined in the reflection requests doesn't seem to be a mandatory field
// and there is no documentation about what it is about.
// So we won't enforce it from the user.
pub(crate) const EMPTY_HOST: &str = "";

/// The reflection queries this crate sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectionRequest {
    /// List the full names of the registered services.
    ListServices,
    /// Find the file(s) declaring the given fully-qualified symbol.
    FileContainingSymbol(String),
}

impl From<ReflectionRequest> for ServerReflectionRequest {
    fn from(request: ReflectionRequest) -> Self {
        let message_request = match request {
            ReflectionRequest::ListServices => MessageRequest::ListServices(String::new()),
            ReflectionRequest::FileContainingSymbol(symbol) => {
                MessageRequest::FileContainingSymbol(symbol)
            }
        };

        ServerReflectionRequest {
            host: EMPTY_HOST.to_string(),
            message_request: Some(message_request),
        }
    }
}

/// The answers to [`ReflectionRequest`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectionResponse {
    /// Service names, in the order reported by the server.
    ListServices(Vec<String>),
    /// Encoded `FileDescriptorProto`s, not yet decoded.
    FileDescriptors(Vec<Vec<u8>>),
}

impl TryFrom<ServerReflectionResponse> for ReflectionResponse {
    type Error = ReflectionError;

    fn try_from(response: ServerReflectionResponse) -> Result<Self, Self::Error> {
        match response.message_response {
            Some(MessageResponse::ListServicesResponse(resp)) => {
                let names = resp.service.into_iter().map(|s| s.name).collect();
                Ok(ReflectionResponse::ListServices(names))
            }
            Some(MessageResponse::FileDescriptorResponse(resp)) => Ok(
                ReflectionResponse::FileDescriptors(resp.file_descriptor_proto),
            ),
            Some(MessageResponse::ErrorResponse(e)) => Err(ReflectionError::Server {
                code: e.error_code,
                message: e.error_message,
            }),
            Some(MessageResponse::AllExtensionNumbersResponse(resp)) => Err(
                ReflectionError::UnexpectedResponse(format!("{resp:?}")),
            ),
            None => Err(ReflectionError::UnexpectedResponse(
                "Empty Message".into(),
            )),
        }
    }
}

/// One request, one response.
///
/// Implementors must complete the whole round trip before returning, so that the next exchange
/// can never read an answer meant for a previous request.
pub trait ReflectionExchange {
    fn exchange(
        &mut self,
        request: ReflectionRequest,
    ) -> impl Future<Output = Result<ReflectionResponse, ReflectionError>>;
}
