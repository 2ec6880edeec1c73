use crate::action::{Action, require_bound};
use crate::canvas::Canvas;
use crate::engine::RasterEngine;
use crate::engine::cpu::CpuEngine;
use crate::foundation::error::RasterResult;

/// Ordered list of actions applied one after another.
///
/// Stops at the first failing action; actions already applied stay applied.
pub struct ActionChain<E: RasterEngine = CpuEngine> {
    actions: Vec<Box<dyn Action<E>>>,
}

impl<E: RasterEngine> Default for ActionChain<E> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
        }
    }
}

impl<E: RasterEngine> std::fmt::Debug for ActionChain<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionChain")
            .field("len", &self.actions.len())
            .finish()
    }
}

impl<E: RasterEngine> ActionChain<E> {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action.
    pub fn push(&mut self, action: impl Action<E> + 'static) -> &mut Self {
        self.actions.push(Box::new(action));
        self
    }

    /// Append an already boxed action.
    pub fn push_boxed(&mut self, action: Box<dyn Action<E>>) -> &mut Self {
        self.actions.push(action);
        self
    }

    /// Builder-style [`ActionChain::push`].
    pub fn then(mut self, action: impl Action<E> + 'static) -> Self {
        self.push(action);
        self
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Return `true` when the chain holds no action.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<E: RasterEngine> FromIterator<Box<dyn Action<E>>> for ActionChain<E> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Action<E>>>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl<E: RasterEngine> Action<E> for ActionChain<E> {
    #[tracing::instrument(name = "chain", skip_all, fields(len = self.actions.len()))]
    fn apply<'c>(&self, canvas: &'c mut Canvas<E>) -> RasterResult<&'c mut Canvas<E>> {
        require_bound(canvas)?;
        for action in &self.actions {
            action.apply(canvas)?;
        }
        Ok(canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/action/chain.rs"]
mod tests;
