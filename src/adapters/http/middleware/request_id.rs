//! Request id generation for `SetRequestIdLayer`.

use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Assigns a UUID v4 to requests that arrive without an id.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let request_id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(request_id))
    }
}
