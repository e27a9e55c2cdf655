//! Response envelopes.
//!
//! List and detail endpoints wrap their payload in `{ "data": ... }`. The
//! three interview operations (start, webhook acknowledgement, manual
//! evaluation) have fixed wire shapes of their own, defined next to their
//! handlers.

use serde::Serialize;

/// The `{ "data": T }` wrapper used by listing and detail responses.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
