#![allow(dead_code)]

use prost::Message;
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet,
    MethodDescriptorProto, ServiceDescriptorProto, field_descriptor_proto,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tonic_reflection::pb::v1::{
    ErrorResponse, FileDescriptorResponse, ListServiceResponse, ServerReflectionRequest,
    ServerReflectionResponse, ServiceResponse, server_reflection_response::MessageResponse,
};
use tonic_reflection::server::v1::{ServerReflection, ServerReflectionServer};

// --- Descriptor fixtures ---

fn message(name: &str) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.into()),
        field: vec![FieldDescriptorProto {
            name: Some("value".into()),
            number: Some(1),
            label: Some(field_descriptor_proto::Label::Optional as i32),
            r#type: Some(field_descriptor_proto::Type::String as i32),
            json_name: Some("value".into()),
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn method(
    name: &str,
    input: &str,
    output: &str,
    client_streaming: bool,
    server_streaming: bool,
) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.into()),
        input_type: Some(input.into()),
        output_type: Some(output.into()),
        // Unary flags are left out of the wire data on purpose.
        client_streaming: client_streaming.then_some(true),
        server_streaming: server_streaming.then_some(true),
        ..Default::default()
    }
}

/// `demo.greeter.Greeter` with one method of each streaming kind.
pub fn greeter_file() -> FileDescriptorProto {
    let req = ".demo.greeter.HelloRequest";
    let res = ".demo.greeter.HelloReply";

    FileDescriptorProto {
        name: Some("demo/greeter.proto".into()),
        package: Some("demo.greeter".into()),
        message_type: vec![message("HelloRequest"), message("HelloReply")],
        service: vec![ServiceDescriptorProto {
            name: Some("Greeter".into()),
            method: vec![
                method("SayHello", req, res, false, false),
                method("LotsOfReplies", req, res, false, true),
                method("LotsOfGreetings", req, res, true, false),
                method("BidiHello", req, res, true, true),
            ],
            ..Default::default()
        }],
        syntax: Some("proto3".into()),
        ..Default::default()
    }
}

/// `demo.users.UserService` with `GetUser`, `SetUser` and `GetOrder`.
pub fn users_file() -> FileDescriptorProto {
    let user = ".demo.users.User";

    FileDescriptorProto {
        name: Some("demo/users.proto".into()),
        package: Some("demo.users".into()),
        message_type: vec![message("User")],
        service: vec![ServiceDescriptorProto {
            name: Some("UserService".into()),
            method: vec![
                method("GetUser", user, user, false, false),
                method("SetUser", user, user, false, false),
                method("GetOrder", user, user, false, false),
            ],
            ..Default::default()
        }],
        syntax: Some("proto3".into()),
        ..Default::default()
    }
}

pub fn demo_descriptor_set() -> FileDescriptorSet {
    FileDescriptorSet {
        file: vec![greeter_file(), users_file()],
    }
}

/// The reference reflection server from `tonic-reflection`, serving the demo files.
pub fn reflection_server()
-> ServerReflectionServer<impl tonic_reflection::server::v1::ServerReflection> {
    tonic_reflection::server::Builder::configure()
        .register_file_descriptor_set(demo_descriptor_set())
        .build_v1()
        .expect("Failed to setup Reflection Service")
}

// --- Scripted reflection server ---

pub fn list_services_reply(names: &[&str]) -> ServerReflectionResponse {
    reply(MessageResponse::ListServicesResponse(ListServiceResponse {
        service: names
            .iter()
            .map(|name| ServiceResponse {
                name: name.to_string(),
            })
            .collect(),
    }))
}

pub fn file_descriptors_reply(files: &[FileDescriptorProto]) -> ServerReflectionResponse {
    raw_descriptors_reply(files.iter().map(Message::encode_to_vec).collect())
}

pub fn raw_descriptors_reply(blobs: Vec<Vec<u8>>) -> ServerReflectionResponse {
    reply(MessageResponse::FileDescriptorResponse(
        FileDescriptorResponse {
            file_descriptor_proto: blobs,
        },
    ))
}

pub fn error_reply(code: i32, message: &str) -> ServerReflectionResponse {
    reply(MessageResponse::ErrorResponse(ErrorResponse {
        error_code: code,
        error_message: message.into(),
    }))
}

fn reply(message_response: MessageResponse) -> ServerReflectionResponse {
    ServerReflectionResponse {
        message_response: Some(message_response),
        ..Default::default()
    }
}

/// A reflection server answering each incoming request with the next scripted reply.
///
/// When the script runs out, the response stream ends (or hangs, see [`ScriptedReflection::hanging`]).
#[derive(Clone, Default)]
pub struct ScriptedReflection {
    replies: Arc<Mutex<VecDeque<Result<ServerReflectionResponse, Status>>>>,
    received: Arc<Mutex<Vec<ServerReflectionRequest>>>,
    hang_when_done: bool,
}

impl ScriptedReflection {
    pub fn new(replies: Vec<Result<ServerReflectionResponse, Status>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            received: Arc::default(),
            hang_when_done: false,
        }
    }

    /// Keeps the stream open without answering once the script runs out.
    pub fn hanging(mut self) -> Self {
        self.hang_when_done = true;
        self
    }

    /// Every request received so far, in arrival order.
    pub fn received(&self) -> Vec<ServerReflectionRequest> {
        self.received.lock().unwrap().clone()
    }

    pub fn server(&self) -> ServerReflectionServer<ScriptedReflection> {
        ServerReflectionServer::new(self.clone())
    }
}

#[tonic::async_trait]
impl ServerReflection for ScriptedReflection {
    type ServerReflectionInfoStream = ReceiverStream<Result<ServerReflectionResponse, Status>>;

    async fn server_reflection_info(
        &self,
        request: Request<Streaming<ServerReflectionRequest>>,
    ) -> Result<Response<Self::ServerReflectionInfoStream>, Status> {
        let mut requests = request.into_inner();
        let replies = self.replies.clone();
        let received = self.received.clone();
        let hang_when_done = self.hang_when_done;
        let (tx, rx) = mpsc::channel(4);

        tokio::spawn(async move {
            while let Ok(Some(request)) = requests.message().await {
                received.lock().unwrap().push(request);

                let next = replies.lock().unwrap().pop_front();
                let Some(reply) = next else {
                    if hang_when_done {
                        std::future::pending::<()>().await;
                    }
                    break;
                };

                if tx.send(reply).await.is_err() {
                    break;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}
