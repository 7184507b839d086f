pub mod consts;
pub mod export;
pub mod mail;
pub mod model;
pub mod registrar;
pub mod store;
pub mod views;
