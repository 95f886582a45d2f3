pub mod analysis;
pub mod request;
pub mod response;

pub use analysis::*;
pub use request::*;
pub use response::*;
