//! Operation results for relmap.
//!
//! Write operations report through result values instead of failing fast,
//! so one attempt can surface several validation errors at once. Results
//! must be inspected: a failed result that is finished or dropped without
//! anyone reading its errors logs a warning.

mod add;
mod error;
mod primary;
mod result;
mod update;

pub use add::AddResult;
pub use error::OperationError;
pub use primary::{Identifier, PrimaryKey};
pub use result::OperationResult;
pub use update::UpdateResult;
