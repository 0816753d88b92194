mod generate;
mod init;

pub use generate::{generate, GenerateArgs};
pub use init::{init, InitArgs};
