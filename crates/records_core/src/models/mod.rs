pub mod request;
pub mod status;

pub use request::{DocumentRequest, NewDocumentRequest, StudentRef};
pub use status::{InitiatedBy, RequestStatus, Role};
