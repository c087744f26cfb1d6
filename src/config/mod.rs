mod ca_client;
mod error;
mod peers;
mod settings;

pub use ca_client::*;
pub use error::*;
pub use peers::*;
pub use settings::*;
