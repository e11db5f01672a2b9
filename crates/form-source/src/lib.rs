#![allow(missing_docs)]

pub mod error;
pub mod node;
pub mod source;
pub mod transport;

pub use error::SourceError;
pub use node::{ContentNode, NodeInternal, SOURCE_PARENT};
pub use source::{
    DEFAULT_LISTING_BASE_URL, DEFAULT_NODE_TYPE, FormSource, NodeSink, SourceOptions,
};
pub use transport::HttpTransport;
