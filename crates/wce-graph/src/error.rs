#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("node {node} is out of range for a graph with {num_nodes} nodes")]
    NodeOutOfRange { node: usize, num_nodes: usize },

    #[error("self-loop on node {node} cannot carry a weight")]
    SelfLoop { node: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
