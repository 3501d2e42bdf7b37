//! NPHIES bundle classification and extraction
//!
//! Turns a raw NPHIES message bundle (untyped JSON) into an
//! [`ExtractedData`](nphies_models::ExtractedData) snapshot:
//!
//! - [`classify`] decides the message type from the MessageHeader event code,
//!   or from the resource types present when there is no header
//! - [`extractors`] maps each supported resource to its canonical record
//! - [`extract_bundle`] walks the entries and assembles the snapshot,
//!   skipping unreadable entries with a warning instead of failing
//! - [`catalogue`] lists the NPHIES profiles and code systems understood here
//!
//! # Example
//!
//! ```rust
//! use nphies_extract::extract_bundle;
//! use nphies_models::MessageType;
//! use serde_json::json;
//!
//! let bundle = json!({
//!     "resourceType": "Bundle",
//!     "type": "message",
//!     "entry": [
//!         {"resource": {"resourceType": "CoverageEligibilityRequest", "id": "e1"}},
//!         {"resource": {"id": "missing-type"}}
//!     ]
//! });
//!
//! let data = extract_bundle(&bundle).unwrap();
//! assert_eq!(data.message_type, MessageType::EligibilityRequest);
//! assert_eq!(data.eligibility_requests.len(), 1);
//! assert_eq!(data.warnings.len(), 1);
//! ```

pub mod aggregate;
pub mod catalogue;
pub mod classify;
pub mod error;
pub mod extractors;

pub use aggregate::extract_bundle;
pub use catalogue::Catalogue;
pub use classify::{classify, Classification, ClassificationSource};
pub use error::{EntryError, ParseError, Result};
pub use extractors::{ExtractedResource, FromResource, ResourceKind};
