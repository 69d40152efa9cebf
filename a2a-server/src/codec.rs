//! JSON-RPC 2.0 envelope codec.
//!
//! Pure byte-level transforms: no I/O, no state. Decoding validates the
//! envelope (version, method, id shape) before any method-level handling;
//! encoding enforces the exactly-one-of result/error rule before producing
//! bytes.

use a2a_types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId, JSONRPC_VERSION};
use serde_json::Value;

use crate::errors::{A2aError, Result};

/// Decodes and validates a JSON-RPC request from raw bytes.
///
/// Malformed JSON maps to [`A2aError::JsonParse`]; a structurally valid JSON
/// document that is not a valid request object (wrong `jsonrpc` version,
/// empty method, or an `id` that is not a string, an i32, or absent) maps to
/// [`A2aError::InvalidRequest`].
pub fn decode_request(bytes: &[u8]) -> Result<JsonRpcRequest> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| A2aError::JsonParse {
        message: e.to_string(),
    })?;

    // An explicit `"id": null` deserializes identically to an absent id, so
    // it has to be rejected before the typed decode.
    if let Some(id) = value.get("id") {
        let valid = match id {
            Value::String(_) => true,
            Value::Number(n) => n.as_i64().is_some_and(|n| i32::try_from(n).is_ok()),
            _ => false,
        };
        if !valid {
            return Err(A2aError::InvalidRequest {
                message: "id must be a string or a 32-bit integer".to_string(),
            });
        }
    }

    let request: JsonRpcRequest =
        serde_json::from_value(value).map_err(|e| A2aError::InvalidRequest {
            message: e.to_string(),
        })?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err(A2aError::InvalidRequest {
            message: format!("jsonrpc must be \"2.0\", got {:?}", request.jsonrpc),
        });
    }
    if request.method.is_empty() {
        return Err(A2aError::InvalidRequest {
            message: "method must not be empty".to_string(),
        });
    }

    Ok(request)
}

/// Encodes a response to bytes, enforcing that exactly one of `result` /
/// `error` is set. A violation is a bug in the caller and never reaches the
/// wire.
pub fn encode_response(response: &JsonRpcResponse) -> Result<Vec<u8>> {
    match (&response.result, &response.error) {
        (Some(_), None) | (None, Some(_)) => Ok(serde_json::to_vec(response)?),
        (Some(_), Some(_)) => Err(A2aError::internal(
            "response carries both result and error",
        )),
        (None, None) => Err(A2aError::internal(
            "response carries neither result nor error",
        )),
    }
}

/// Encodes an error response directly from an error object.
///
/// Serializing a response built from plain data cannot fail, so this is
/// infallible and safe to use on every error path, including while reporting
/// an earlier encode failure.
pub fn encode_error(id: Option<RequestId>, error: JsonRpcError) -> Vec<u8> {
    serde_json::to_vec(&JsonRpcResponse::error(id, error)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_request_with_string_and_number_ids() {
        let req = decode_request(br#"{"jsonrpc":"2.0","method":"tasks/get","id":"abc"}"#).unwrap();
        assert_eq!(req.id, Some(RequestId::String("abc".to_string())));

        let req = decode_request(br#"{"jsonrpc":"2.0","method":"tasks/get","id":7}"#).unwrap();
        assert_eq!(req.id, Some(RequestId::Number(7)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = decode_request(b"{not json").unwrap_err();
        assert!(matches!(err, A2aError::JsonParse { .. }));
    }

    #[test]
    fn rejects_wrong_version_and_empty_method() {
        let err =
            decode_request(br#"{"jsonrpc":"1.0","method":"tasks/get","id":1}"#).unwrap_err();
        assert!(matches!(err, A2aError::InvalidRequest { .. }));

        let err = decode_request(br#"{"jsonrpc":"2.0","method":"","id":1}"#).unwrap_err();
        assert!(matches!(err, A2aError::InvalidRequest { .. }));
    }

    #[test]
    fn rejects_null_float_and_bool_ids() {
        for id in ["null", "1.5", "true", "{}", "4294967296"] {
            let body = format!(r#"{{"jsonrpc":"2.0","method":"tasks/get","id":{id}}}"#);
            let err = decode_request(body.as_bytes()).unwrap_err();
            assert!(
                matches!(err, A2aError::InvalidRequest { .. }),
                "id {id} should be rejected"
            );
        }
    }

    #[test]
    fn absent_id_is_accepted() {
        let req = decode_request(br#"{"jsonrpc":"2.0","method":"tasks/get"}"#).unwrap();
        assert!(req.id.is_none());
    }

    #[test]
    fn encode_enforces_exactly_one_of_result_or_error() {
        let ok = JsonRpcResponse::success(Some(1.into()), json!({"x": 1}));
        assert!(encode_response(&ok).is_ok());

        let mut both = ok.clone();
        both.error = Some(JsonRpcError::internal());
        assert!(matches!(
            encode_response(&both).unwrap_err(),
            A2aError::Internal { .. }
        ));

        let neither = JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: None,
            id: Some(1.into()),
        };
        assert!(matches!(
            encode_response(&neither).unwrap_err(),
            A2aError::Internal { .. }
        ));
    }

    #[test]
    fn error_encoding_preserves_id_variant() {
        let bytes = encode_error(Some("1".into()), JsonRpcError::task_not_found());
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["error"]["code"], -32001);

        let bytes = encode_error(Some(1.into()), JsonRpcError::task_not_found());
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], 1);
    }

    #[test]
    fn error_with_unknown_id_uses_null() {
        let bytes = encode_error(None, JsonRpcError::json_parse());
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(value["id"].is_null());
        assert_eq!(value["error"]["code"], -32700);
    }
}
