pub mod amount;
pub mod commands;
pub mod hash;
pub mod public_key;
pub mod signature;
pub mod transaction;
pub mod tx_handler;
pub mod utxo;
pub mod utxo_pool;

pub use self::{
    amount::*, hash::*, public_key::*, signature::*, transaction::*, tx_handler::*, utxo::*,
    utxo_pool::*,
};
