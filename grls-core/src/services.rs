//! # Service Enumeration
use crate::reflection::{ReflectionError, ReflectionExchange, ReflectionRequest, ReflectionResponse};

/// Lists all services exposed by the server.
///
/// Names are returned exactly as the server reported them: same order, no sorting, no dedup.
/// A server without services yields an empty list.
pub async fn list_services(
    session: &mut impl ReflectionExchange,
) -> Result<Vec<String>, ReflectionError> {
    match session.exchange(ReflectionRequest::ListServices).await? {
        ReflectionResponse::ListServices(services) => Ok(services),
        ReflectionResponse::FileDescriptors(_) => Err(ReflectionError::UnexpectedResponse(
            "FileDescriptorResponse to a list services request".into(),
        )),
    }
}
