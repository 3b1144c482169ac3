use colored::*;
use grls_core::reflection::ReflectionError;
use grls_core::signature::ServiceMethod;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fmt::{self, Display};

/// A wrapper struct for a formatted, colored diagnostic.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

#[derive(Serialize)]
#[serde(transparent)]
pub struct ServiceList(pub Vec<String>);

#[derive(Serialize)]
#[serde(transparent)]
pub struct MethodList(pub Vec<ServiceMethod>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Plain
        }
    }
}

/// Renders `value` as plain text lines or as tab indented JSON.
pub fn render<T: Serialize + Display>(
    value: &T,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Plain => Ok(value.to_string()),
        OutputFormat::Json => to_json(value),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

impl Display for ServiceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, service) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{service}")?;
        }
        Ok(())
    }
}

impl Display for MethodList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, method) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}.{}", method.service, method.method)?;
            if let Some(long_method) = &method.long_method {
                write!(f, "\n{long_method}")?;
            }
        }
        Ok(())
    }
}

impl Display for FormattedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<ReflectionError> for FormattedString {
    fn from(err: ReflectionError) -> Self {
        let title = match &err {
            ReflectionError::Decode(_) => "Failed to parse file descriptor:",
            ReflectionError::Server { .. } | ReflectionError::UnexpectedResponse(_) => {
                "Reflection Failed:"
            }
            _ => "Connection Error:",
        };

        FormattedString(format!("{}\n\n'{}'", title.red().bold(), err))
    }
}

// Configuration errors (TLS files, auth mode)
impl From<anyhow::Error> for FormattedString {
    fn from(err: anyhow::Error) -> Self {
        FormattedString(format!(
            "{}\n\n'{:#}'",
            "Invalid Configuration:".red().bold(),
            err
        ))
    }
}

impl From<serde_json::Error> for FormattedString {
    fn from(err: serde_json::Error) -> Self {
        FormattedString(format!(
            "{}\n\n'{}'",
            "Failed to serialize output:".red().bold(),
            err
        ))
    }
}
