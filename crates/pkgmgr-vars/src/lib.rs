//! Package Manager Variables
//!
//! Named, typed, unit-tagged configuration values and the small textual
//! formats used to refer to them.
//!
//! # Core Concepts
//!
//! - [`Variable`]: A stored configuration value (string-encoded fields)
//! - [`VariableRef`]: `packageId::variableName` reference to a variable
//! - [`Constant`]: Literal integer-with-unit token such as `7days`
//! - [`SettingValue`]: A declared setting (none / constant / reference)
//! - [`VariableInfo`]: Typed, parsed view over a [`Variable`]
//! - [`ErrorSink`]: Collector for non-fatal errors
//!
//! # Example
//!
//! ```rust
//! use pkgmgr_vars::{Constant, Units};
//!
//! let constant = Constant::try_parse_encoded("7 Years").unwrap();
//! assert_eq!(constant.units(), Units::Years);
//! assert_eq!(constant.to_encoded(), "7years");
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod constant;
mod error;
mod info;
mod setting;
mod sink;
mod units;
mod variable;
mod version;

pub use constant::Constant;
pub use error::VariableError;
pub use info::{TypedValue, VariableInfo};
pub use setting::{SettingValue, SettingValueType};
pub use sink::ErrorSink;
pub use units::{SupportedType, Units};
pub use variable::{Variable, VariableRef, REF_SEPARATOR};
pub use version::SchemaVersion;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
