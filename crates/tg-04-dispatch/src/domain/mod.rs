//! Domain layer: requests, paths, targets and outcomes.

pub mod outcome;
pub mod request;
pub mod request_id;

pub use outcome::DispatchOutcome;
pub use request::{parse_path, RequestPath, RpcRequest, RpcTarget};
pub use request_id::RequestId;
