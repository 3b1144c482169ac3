//! # Signature Projection
//!
//! Flattens decoded file descriptors into one [`ServiceMethod`] per method, and optionally renders
//! each method as a one-line `.proto` signature:
//!
//! ```text
//! rpc BidiHello(stream demo.HelloRequest) returns (stream demo.HelloReply){}
//! ```
use prost_types::{FileDescriptorProto, MethodDescriptorProto};
use serde::Serialize;

/// A method of a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceMethod {
    /// Fully qualified service name (`package.Service`).
    pub service: String,
    pub method: String,
    /// The rendered signature, only present when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_method: Option<String>,
}

/// Projects every method of every service of every file, keeping the decoded order.
///
/// `service` is `package.Service`. A file without a package yields the bare service name rather
/// than a leading `.`.
pub fn project_methods(files: &[FileDescriptorProto], verbose: bool) -> Vec<ServiceMethod> {
    files
        .iter()
        .flat_map(|file| {
            file.service.iter().flat_map(move |service| {
                let service_name = qualified_name(file.package(), service.name());

                service.method.iter().map(move |method| ServiceMethod {
                    service: service_name.clone(),
                    method: method.name().to_string(),
                    long_method: verbose.then(|| render_signature(method)),
                })
            })
        })
        .collect()
}

/// Keeps the methods whose name contains `needle`, in their original order.
pub fn find_methods(methods: Vec<ServiceMethod>, needle: &str) -> Vec<ServiceMethod> {
    methods
        .into_iter()
        .filter(|m| m.method.contains(needle))
        .collect()
}

/// Renders `rpc Name(<stream >Input) returns (<stream >Output){}`.
///
/// Missing streaming flags read as unary.
pub fn render_signature(method: &MethodDescriptorProto) -> String {
    format!(
        "rpc {}({}{}) returns ({}{}){{}}",
        method.name(),
        stream_qualifier(method.client_streaming()),
        trim_leading_qualifier(method.input_type()),
        stream_qualifier(method.server_streaming()),
        trim_leading_qualifier(method.output_type()),
    )
}

/// Strips the leading `.` of a fully qualified type name. Dots inside the name are kept.
pub fn trim_leading_qualifier(type_name: &str) -> &str {
    type_name.trim_start_matches('.')
}

fn stream_qualifier(streaming: bool) -> &'static str {
    if streaming { "stream " } else { "" }
}

// Files without a package declare their services at the root.
fn qualified_name(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}
