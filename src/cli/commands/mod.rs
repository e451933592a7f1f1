mod init;
mod serve;

pub use init::execute_init;
pub use serve::{execute_serve, resolve_config};
