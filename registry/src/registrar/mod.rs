pub mod options;
pub mod registrar;
