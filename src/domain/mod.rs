pub mod crn;
pub mod filter;
pub mod status;
pub mod validation;

pub use crn::Crn;
pub use filter::{FilterOperand, FilterOperator, RuleAction, MAX_FILTER_VALUES};
pub use status::WriteStatus;
pub use validation::{Validate, ValidationError, MAX_NAME_LEN};
