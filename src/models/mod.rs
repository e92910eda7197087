pub mod exchange;
pub mod status;
