pub mod request_id;

pub use request_id::{request_context_middleware, make_span_with_request_id, RequestContext, RequestId};
