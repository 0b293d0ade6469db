//! Definitions of the packets the client sends and interprets, one module
//! per protocol state.
//!
//! Clientbound packets implement both [`Decode`](crate::Decode) (the client
//! reads them) and [`Encode`](crate::Encode) (scripted test servers write
//! them); serverbound packets likewise implement both directions.

pub mod configuration;
pub mod handshaking;
pub mod login;
pub mod play;
pub mod status;

macro_rules! impl_packet {
    ($name:ty, $id:expr) => {
        impl $crate::Packet for $name {
            const ID: i32 = $id;
            const NAME: &'static str = stringify!($name);
        }
    };
}

pub(crate) use impl_packet;
