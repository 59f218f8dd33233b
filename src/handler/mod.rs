//! Request handler module
//!
//! Path resolution and response generation. Resolution never fails; every
//! fault is turned into a response by `respond`.

pub mod resolve;
pub mod respond;
pub mod router;

pub use resolve::{resolve, ResolvedTarget, INDEX_FILE};
pub use respond::{respond, Served};
pub use router::handle_request;
