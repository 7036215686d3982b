mod frame;
pub use frame::*;

mod logline;
pub use logline::*;

pub mod protocol;

mod report;
pub use report::*;
