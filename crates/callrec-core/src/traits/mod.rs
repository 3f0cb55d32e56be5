pub mod discrete_network;
pub mod record_source;

pub use discrete_network::{IDiscreteNetwork, NodeId};
pub use record_source::IUsageRecordSource;
