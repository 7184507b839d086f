pub mod registration;
pub mod request;
pub mod showcase;
pub mod upload;
