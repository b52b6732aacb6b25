mod stats;
mod transport;

pub use stats::ClientStats;
pub use transport::{
    MAX_DATAGRAM_SIZE, MemoryTransport, RECEIVE_BUFFER_SIZE, Transport, TransportError,
    UdpTransport,
};
