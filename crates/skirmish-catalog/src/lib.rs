//! Declarative strategic postures.
//!
//! A posture is a fixed, hand-tuned list of goals. Installing one always clears the scheduler
//! first; postures replace each other and never stack.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod spec;
pub mod vocab;

pub use catalog::{Posture, StrategyCatalog};
pub use error::CatalogError;
pub use spec::{GoalSpec, PostureSpec};
