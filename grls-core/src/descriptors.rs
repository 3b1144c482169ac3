//! # Descriptor Fetching
//!
//! Resolves service names into the `FileDescriptorProto`s that declare them.
//!
//! A single symbol lookup may legitimately return several files, so results are always lists.
//! Dependencies (imports) are not followed: only the files the server sends for the symbol are
//! decoded.
use crate::reflection::{ReflectionError, ReflectionExchange, ReflectionRequest, ReflectionResponse};
use prost::Message;
use prost_types::FileDescriptorProto;

/// Asks the reflection service for the file(s) containing `service_name` and decodes them.
///
/// # Returns
///
/// * `Ok(files)` - Every file the server sent, in the order it sent them.
/// * `Err(ReflectionError::Decode)` - One of the files could not be decoded. Nothing is returned
///   for the other ones.
/// * `Err(ReflectionError)` - The exchange itself failed.
pub async fn fetch_descriptors_for(
    session: &mut impl ReflectionExchange,
    service_name: &str,
) -> Result<Vec<FileDescriptorProto>, ReflectionError> {
    let request = ReflectionRequest::FileContainingSymbol(service_name.to_string());

    match session.exchange(request).await? {
        ReflectionResponse::FileDescriptors(raw_protos) => decode_all(&raw_protos),
        ReflectionResponse::ListServices(_) => Err(ReflectionError::UnexpectedResponse(
            "ListServiceResponse to a file containing symbol request".into(),
        )),
    }
}

/// Fetches the descriptors of every service, one after the other, in the given order.
///
/// The first failure aborts the whole operation and the files collected so far are dropped.
pub async fn fetch_all_for(
    session: &mut impl ReflectionExchange,
    service_names: &[String],
) -> Result<Vec<FileDescriptorProto>, ReflectionError> {
    let mut collected_files = Vec::new();

    for service_name in service_names {
        collected_files.extend(fetch_descriptors_for(session, service_name).await?);
    }

    Ok(collected_files)
}

fn decode_all(raw_protos: &[Vec<u8>]) -> Result<Vec<FileDescriptorProto>, ReflectionError> {
    raw_protos
        .iter()
        .map(|raw| FileDescriptorProto::decode(raw.as_slice()).map_err(ReflectionError::from))
        .collect()
}
