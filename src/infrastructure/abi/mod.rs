//! Remote ABI resolution

mod resolver;

pub use resolver::{AbiSource, ExplorerClient};
