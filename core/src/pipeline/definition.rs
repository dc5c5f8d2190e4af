// orderflow/src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` struct and its structural operations.

use crate::context::Handler;
use crate::error::{FlowError, FlowResult};
use crate::step::{SkipCondition, StepDef};
use std::collections::HashMap;

/// Ordered named steps over one context type `TData`.
///
/// Handlers return `Result<_, Err>`. `Err` must absorb [`FlowError`] so that
/// engine-level failures (a required step without handlers, for instance)
/// surface through the same error type as business failures.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) before_hooks: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on_hooks: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after_hooks: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Builds a pipeline from `(name, optional, skip_if)` triples, in run order.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      steps,
      before_hooks: HashMap::new(),
      on_hooks: HashMap::new(),
      after_hooks: HashMap::new(),
    }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub(crate) fn position_of(&self, step_name: &str) -> FlowResult<usize> {
    self
      .steps
      .iter()
      .position(|s| s.name == step_name)
      .ok_or_else(|| FlowError::StepNotFound {
        step_name: step_name.to_string(),
      })
  }
}
