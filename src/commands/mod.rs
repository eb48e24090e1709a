pub mod files;
pub mod keygen_command;
pub mod pool_command;
pub mod settle_command;
pub mod sign_command;

pub use self::{
    files::*, keygen_command::*, pool_command::*, settle_command::*, sign_command::*,
};
