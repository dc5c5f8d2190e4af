// src/lib.rs

//! orderflow: an async, type-safe step pipeline for request workflows.
//!
//! A workflow is a [`Pipeline`] of named steps operating on one shared
//! [`ContextData`]. It supports:
//!  - before/on/after hooks per step,
//!  - early stopping through [`PipelineControl::Stop`],
//!  - optional steps and per-step skip conditions,
//!  - inserting and removing steps after construction,
//!  - a [`FlowRegistry`] that dispatches a context to the pipeline registered
//!    for its data type.

pub mod context;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod step;

pub use crate::context::{ContextData, Handler};
pub use crate::error::{FlowError, FlowResult};
pub use crate::pipeline::Pipeline;
pub use crate::registry::FlowRegistry;
pub use crate::step::{PipelineControl, PipelineResult, SkipCondition, StepDef};
