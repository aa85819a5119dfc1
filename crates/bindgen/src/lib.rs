//! Contract binding generation for hubble.
//!
//! Reads compiled contract artifacts, splits them into ABI and bytecode scratch files, and
//! hands those to an external binding generator such as go-ethereum's `abigen`.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod artifact;
pub use artifact::*;

mod driver;
pub use driver::*;

mod error;
pub use error::*;

mod generator;
pub use generator::*;

mod manifest;
pub use manifest::*;

mod package;
pub use package::*;

mod request;
pub use request::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
