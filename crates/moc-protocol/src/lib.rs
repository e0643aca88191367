pub mod api;
pub mod flow;
pub mod slots;
pub mod stats;
pub mod turn;

pub use api::*;
pub use flow::*;
pub use slots::*;
pub use stats::*;
pub use turn::*;
