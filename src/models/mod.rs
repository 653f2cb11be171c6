//! Data models

pub mod alert;
pub mod decision;
pub mod remediation;
pub mod response;

pub use alert::*;
pub use decision::*;
pub use remediation::*;
pub use response::*;
