pub mod bridge;
pub mod ports;

#[cfg(test)]
pub(crate) mod mock;

pub use bridge::RemotingClient;
pub use ports::ModelApi;
