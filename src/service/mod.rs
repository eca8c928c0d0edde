pub mod channel;
pub mod files;
pub mod upload;
