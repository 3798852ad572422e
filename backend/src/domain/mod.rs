//! Domain core: entities, policy and the request lifecycle service.
//!
//! Everything in here is transport and storage agnostic. Adapters live in
//! [`crate::api`] (inbound HTTP) and [`crate::outbound`] (driven ports).

pub mod attachment;
pub mod error;
pub mod filters;
pub mod permissions;
pub mod ports;
pub mod request;
pub mod requests;
pub mod viewer;

pub use self::attachment::{Attachment, AttachmentInfo, UploadedFile};
pub use self::error::{Error, ErrorCode};
pub use self::filters::RequestSearchFilters;
pub use self::permissions::RequestPermissions;
pub use self::request::{Request, RequestPriority, RequestResponse, RequestStatus};
pub use self::requests::{
    CreateRequestInput, EditRequestInput, RequestDetails, RequestService, RequestsPage,
};
pub use self::viewer::{UserId, Viewer, ADMIN_ROLE};
