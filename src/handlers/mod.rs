pub mod exchanges;
pub mod openapi;
pub mod status;
