mod notification;
mod order;
mod status;

pub mod dtos {
    pub use crate::notification::dtos::*;
}

pub use crate::notification::api::*;
pub use crate::order::api::*;
pub use crate::status::api::*;
