pub mod inference;
pub mod log;
pub mod message;
pub mod notification;
pub mod settings;

pub use inference::*;
pub use log::*;
pub use message::*;
pub use notification::*;
pub use settings::*;
