pub mod api;
pub mod errors;
pub mod order;
pub mod request;
pub mod reservation;

pub use api::*;
pub use errors::*;
pub use order::*;
pub use request::*;
pub use reservation::*;
