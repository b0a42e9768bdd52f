pub mod base58;
pub mod codec;
pub mod hash;
pub mod hmac;

pub use base58::Base58Error;
pub use codec::{ByteInput, CodecError};
