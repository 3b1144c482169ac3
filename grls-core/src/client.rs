//! # Introspector
//!
//! High level entry point: owns one reflection session and runs the fixed pipeline
//!
//! 1. list the services,
//! 2. fetch the file descriptors of each service, one at a time,
//! 3. project them into [`ServiceMethod`]s.
//!
//! ## Example
//!
//! ```rust,no_run
//! use grls_core::client::Introspector;
//! use grls_core::config::SessionConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig::new("localhost:50051");
//! let mut introspector = Introspector::connect(&config).await?;
//!
//! for method in introspector.find_methods("Get", true).await? {
//!     println!("{}.{}", method.service, method.method);
//! }
//! # Ok(())
//! # }
//! ```
use crate::BoxError;
use crate::config::SessionConfig;
use crate::reflection::session::ReflectionSession;
use crate::reflection::{ReflectionError, ReflectionExchange};
use crate::signature::{self, ServiceMethod};
use crate::{descriptors, services};
use http_body::Body as HttpBody;
use tonic::client::GrpcService;
use tonic::transport::Channel;

/// Lists and searches the services and methods of a server through its reflection service.
pub struct Introspector<E = ReflectionSession<Channel>> {
    session: E,
}

impl Introspector<ReflectionSession<Channel>> {
    /// Connects to the server described by `config`. No reflection request is sent yet.
    pub async fn connect(config: &SessionConfig) -> Result<Self, ReflectionError> {
        let session = ReflectionSession::connect(config).await?;
        Ok(Self::new(session))
    }
}

impl<S> Introspector<ReflectionSession<S>>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    /// Creates an `Introspector` over an existing Tonic service (e.g., a `Channel` or an in-process server).
    pub fn from_service(service: S) -> Self {
        Self::new(ReflectionSession::new(service))
    }
}

impl<E: ReflectionExchange> Introspector<E> {
    pub fn new(session: E) -> Self {
        Self { session }
    }

    /// Lists all services exposed by the server, in server order.
    pub async fn list_services(&mut self) -> Result<Vec<String>, ReflectionError> {
        services::list_services(&mut self.session).await
    }

    /// Lists every method of every service.
    ///
    /// With `verbose`, each method also carries its rendered `rpc` signature.
    pub async fn list_methods(
        &mut self,
        verbose: bool,
    ) -> Result<Vec<ServiceMethod>, ReflectionError> {
        let service_names = services::list_services(&mut self.session).await?;
        let files = descriptors::fetch_all_for(&mut self.session, &service_names).await?;

        Ok(signature::project_methods(&files, verbose))
    }

    /// Lists the methods whose name contains `needle`. An empty result is not an error.
    pub async fn find_methods(
        &mut self,
        needle: &str,
        verbose: bool,
    ) -> Result<Vec<ServiceMethod>, ReflectionError> {
        let methods = self.list_methods(verbose).await?;
        Ok(signature::find_methods(methods, needle))
    }
}
