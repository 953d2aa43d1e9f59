//! Integration tests: Request/Response → wire bytes → Request/Response.

use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use tagwire::{
    AnyValue, Codec, Error, JsonCodec, Message, MessageKind, Payload, Request, Response,
    TypeRegistry,
};

// ── Shared domain types ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Order {
    id: u64,
    items: Vec<String>,
    note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Status {
    Pending,
    Shipped { tracking: String },
}

fn registry() -> Arc<TypeRegistry> {
    let mut reg = TypeRegistry::with_builtins();
    reg.register::<Order>("shop.Order").unwrap();
    reg.register::<Status>("shop.Status").unwrap();
    Arc::new(reg)
}

fn codec() -> JsonCodec {
    JsonCodec::new(registry())
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn calculator_add_round_trip() {
    let c = codec();
    let req = Request::new("Calculator.Add", vec![AnyValue::new(3i32), AnyValue::new(4i32)]);

    let wire = c.encode(&Message::Request(req)).unwrap();
    let back = c.decode_request(&wire[..]).unwrap();

    assert_eq!(back.service_id, "Calculator.Add");
    let args: Vec<i32> = back
        .arguments
        .iter()
        .map(|a| *a.downcast_ref::<i32>().expect("integer argument"))
        .collect();
    assert_eq!(args, vec![3, 4]);
}

#[test]
fn string_response_round_trip() {
    let c = codec();
    let wire = c.encode(&Message::Response(Response::new("ok"))).unwrap();
    let back = c.decode(Payload::Bytes(&wire), MessageKind::Response).unwrap();

    let Message::Response(resp) = back else {
        panic!("expected a response");
    };
    assert_eq!(resp.result.downcast_ref::<String>().map(String::as_str), Some("ok"));
}

#[test]
fn heterogeneous_arguments_keep_order_and_type() {
    let c = codec();
    let order = Order {
        id: 42,
        items: vec!["kibble".into(), "bowl".into()],
        note: None,
    };
    let req = Request::new("Shop.Place", Vec::new())
        .arg(AnyValue::new(order.clone()))
        .arg("express")
        .arg(AnyValue::new(Status::Shipped {
            tracking: "TRK-1".into(),
        }));

    let wire = c.encode_request(&req).unwrap();
    let back = c.decode_request(&wire[..]).unwrap();

    assert_eq!(back.arguments.len(), 3);
    assert_eq!(back.arguments[0].downcast_ref::<Order>(), Some(&order));
    assert_eq!(
        back.arguments[1].downcast_ref::<String>().map(String::as_str),
        Some("express")
    );
    assert_eq!(
        back.arguments[2].downcast_ref::<Status>(),
        Some(&Status::Shipped {
            tracking: "TRK-1".into()
        })
    );
}

#[test]
fn custom_type_key_is_on_the_wire() {
    let c = codec();
    let wire = c
        .encode_response(&Response::new(AnyValue::new(Status::Pending)))
        .unwrap();
    let text = std::str::from_utf8(&wire).unwrap();
    assert_eq!(text, r#"{"Type":"shop.Status","Content":"Pending"}"#);
}

#[test]
fn void_response_round_trip() {
    let c = codec();
    let wire = c.encode_response(&Response::void()).unwrap();
    let back = c.decode_response(&wire[..]).unwrap();
    assert!(back.result.is::<()>());
}

#[test]
fn empty_argument_list_round_trip() {
    let c = codec();
    let wire = c.encode_request(&Request::new("Health.Ping", Vec::new())).unwrap();
    let back = c.decode_request(&wire[..]).unwrap();
    assert_eq!(back.service_id, "Health.Ping");
    assert!(back.arguments.is_empty());
}

#[test]
fn peer_without_registration_cannot_decode() {
    let sender = codec();
    let receiver = JsonCodec::new(Arc::new(TypeRegistry::with_builtins()));

    let wire = sender
        .encode_request(&Request::new("Shop.Place", Vec::new()).arg(AnyValue::new(Status::Pending)))
        .unwrap();
    let err = receiver.decode_request(&wire[..]).unwrap_err();
    match err {
        Error::UnknownType(key) => assert_eq!(key, "shop.Status"),
        other => panic!("expected UnknownType, got {other:?}"),
    }
}

#[test]
fn content_of_wrong_shape_is_reported() {
    let c = codec();
    let err = c
        .decode_response(r#"{"Type":"shop.Order","Content":{"id":"not a number"}}"#)
        .unwrap_err();
    assert!(matches!(err, Error::Content { ref key, .. } if key == "shop.Order"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn fast_path_hands_back_same_message() {
    let c = codec();
    let msg = Message::Response(Response::new(7u8));
    let out = c.decode(Payload::from(msg), MessageKind::Response).unwrap();
    assert_eq!(out.kind(), MessageKind::Response);
    let resp = out.into_response().unwrap();
    assert_eq!(resp.result.downcast_ref::<u8>(), Some(&7));
}

#[test]
fn array_payload_is_unsupported() {
    let err = codec().decode_request("[1, 2, 3]").unwrap_err();
    assert_eq!(err.to_string(), "unsupported payload type: array");
}

#[test]
fn codec_is_shareable_across_threads() {
    let c: Arc<dyn Codec> = Arc::new(codec());
    let handles: Vec<_> = (0..4i64)
        .map(|n| {
            let c = Arc::clone(&c);
            thread::spawn(move || {
                let req = Request::new(format!("Worker.{n}"), Vec::new()).arg(n);
                let wire = c.encode(&Message::Request(req)).unwrap();
                let back = c
                    .decode(Payload::Bytes(&wire), MessageKind::Request)
                    .unwrap()
                    .into_request()
                    .unwrap();
                (back.service_id, *back.arguments[0].downcast_ref::<i64>().unwrap())
            })
        })
        .collect();

    for (n, h) in handles.into_iter().enumerate() {
        let (service, value) = h.join().unwrap();
        assert_eq!(service, format!("Worker.{n}"));
        assert_eq!(value, n as i64);
    }
}
