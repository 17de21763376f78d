use crate::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node {id} is not part of the tree")]
    UnknownNode { id: NodeId },
}
