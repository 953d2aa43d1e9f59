//! Request and response messages carried by the codec.

use super::value::AnyValue;

/// Outbound call: target service plus positional arguments.
#[derive(Debug)]
pub struct Request {
    pub service_id: String,
    /// Passed to the invoked method in this order.
    pub arguments: Vec<AnyValue>,
}

impl Request {
    pub fn new(service_id: impl Into<String>, arguments: Vec<AnyValue>) -> Self {
        Self {
            service_id: service_id.into(),
            arguments,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<AnyValue>) -> Self {
        self.arguments.push(value.into());
        self
    }
}

/// Call result: exactly one value, `()` for void methods.
#[derive(Debug)]
pub struct Response {
    pub result: AnyValue,
}

impl Response {
    pub fn new(result: impl Into<AnyValue>) -> Self {
        Self {
            result: result.into(),
        }
    }

    pub fn void() -> Self {
        Self {
            result: AnyValue::unit(),
        }
    }
}

/// Which shape decode should reconstruct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}

impl MessageKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request message",
            Self::Response => "response message",
        }
    }
}

/// Either message shape.
#[derive(Debug)]
pub enum Message {
    Request(Request),
    Response(Response),
}

impl Message {
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Request(_) => MessageKind::Request,
            Self::Response(_) => MessageKind::Response,
        }
    }

    pub fn into_request(self) -> Option<Request> {
        match self {
            Self::Request(r) => Some(r),
            Self::Response(_) => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Response(r) => Some(r),
            Self::Request(_) => None,
        }
    }
}

impl From<Request> for Message {
    fn from(r: Request) -> Self {
        Self::Request(r)
    }
}

impl From<Response> for Message {
    fn from(r: Response) -> Self {
        Self::Response(r)
    }
}
