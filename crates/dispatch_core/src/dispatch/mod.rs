pub mod algorithm;
pub mod nearest;
pub mod reservation;
pub mod types;

use bevy_ecs::prelude::Resource;

pub use algorithm::DispatchPolicy;
pub use nearest::NearestAvailable;
pub use reservation::PriorityReservation;
pub use types::{CallContext, DispatchContext};

/// Resource wrapper for the dispatch policy trait object.
#[derive(Resource)]
pub struct DispatchPolicyResource(pub Box<dyn DispatchPolicy>);

impl DispatchPolicyResource {
    pub fn new(policy: Box<dyn DispatchPolicy>) -> Self {
        Self(policy)
    }
}

impl std::ops::Deref for DispatchPolicyResource {
    type Target = dyn DispatchPolicy;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
