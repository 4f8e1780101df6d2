pub mod diff;
pub mod explain;
pub mod load;
pub mod navigate;
pub mod progress;
pub mod session;
pub mod steps;
pub mod validate;

pub use diff::*;
pub use explain::*;
pub use load::*;
pub use navigate::*;
pub use progress::*;
pub use session::*;
pub use steps::*;
pub use validate::*;
