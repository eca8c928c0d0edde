pub mod cli;
pub mod filename;
pub mod state;
pub mod validation;
