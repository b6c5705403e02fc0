//! Response envelope shared by every handler.
//!
//! Successful responses wrap their payload as `{ "data": ... }` so clients
//! can tell success bodies from the `{ "error", "code" }` shape the error
//! type produces. Handlers return [`DataResponse`] rather than building the
//! envelope with `serde_json::json!` by hand.

use serde::Serialize;

/// Standard `{ "data": T }` success envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_payload_under_data_key() {
        let body = serde_json::to_value(DataResponse { data: vec![1, 2] }).unwrap();
        assert_eq!(body, serde_json::json!({ "data": [1, 2] }));
    }
}
