//! Release validation: a [`ValidationPolicy`] applied to each release yields
//! a [`ValidationOutcome`] carrying every reason the release was rejected.

pub mod error;
pub mod inspect;
pub mod policy;
pub mod rejection;

pub use error::InspectError;
pub use inspect::{inspect, inspect_one, inspect_releases, InspectSummary, ValidationOutcome};
pub use policy::ValidationPolicy;
pub use rejection::{Rejection, RejectionSet};
