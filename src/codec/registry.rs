//! Local message id bindings.
//!
//! The local id space is four bits wide, so the registry is a plain array of sixteen slots
//! rather than a map. Binding replaces whatever was in the slot; there is no unbinding, a slot
//! stays bound until it is rebound or the stream ends.

use crate::{
    codec::definition::MessageDefinitionRc,
    Error::UnboundLocalId,
    Result,
};

/// Number of local message ids.
pub const LOCAL_ID_COUNT: usize = 16;

/// Maps each local message id to its most recent definition.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    slots: [Option<MessageDefinitionRc>; LOCAL_ID_COUNT],
}

impl DefinitionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `definition` to `local_id`, replacing any previous binding.
    ///
    /// `local_id` is taken modulo 16; record headers never carry more than four id bits.
    pub fn bind(&mut self, local_id: u8, definition: MessageDefinitionRc) {
        self.slots[usize::from(local_id) % LOCAL_ID_COUNT] = Some(definition);
    }

    /// The definition currently bound to `local_id`.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnboundLocalId`] if nothing was bound to `local_id` yet.
    pub fn resolve(&self, local_id: u8) -> Result<&MessageDefinitionRc> {
        self.slots
            .get(usize::from(local_id))
            .and_then(Option::as_ref)
            .ok_or(UnboundLocalId(local_id))
    }

    /// `true` if `local_id` has a binding.
    #[must_use]
    pub fn is_bound(&self, local_id: u8) -> bool {
        self.resolve(local_id).is_ok()
    }

    /// Number of bound slots.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
