//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles one specific
//! event type. Appliers are PURE functions: replaying the same events always
//! rebuilds the same order record.

use enum_dispatch::enum_dispatch;

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

mod accepted;
mod alternatives_resolved;
mod auto_cancelled;
mod cancelled;
mod denied;
mod items_flagged;
mod picked_up;
mod preparation_started;
mod rated;
mod ready_marked;
mod submitted;
mod time_added;
mod weight_recorded;
mod weight_review_resolved;

pub use accepted::AcceptedApplier;
pub use alternatives_resolved::AlternativesResolvedApplier;
pub use auto_cancelled::AutoCancelledApplier;
pub use cancelled::CancelledApplier;
pub use denied::DeniedApplier;
pub use items_flagged::ItemsFlaggedApplier;
pub use picked_up::PickedUpApplier;
pub use preparation_started::PreparationStartedApplier;
pub use rated::RatedApplier;
pub use ready_marked::ReadyMarkedApplier;
pub use submitted::SubmittedApplier;
pub use time_added::TimeAddedApplier;
pub use weight_recorded::WeightRecordedApplier;
pub use weight_review_resolved::WeightReviewResolvedApplier;

/// Fields every applier maintains: post-transition status, sequence,
/// timestamp, checksum
pub(crate) fn finish(order: &mut Order, event: &OrderEvent) {
    order.status = event.status;
    order.last_sequence = event.sequence;
    order.updated_at = event.timestamp;
    order.update_checksum();
}

/// EventAction enum - dispatches to concrete applier implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    Submitted(SubmittedApplier),
    Accepted(AcceptedApplier),
    Denied(DeniedApplier),
    ItemsFlagged(ItemsFlaggedApplier),
    AlternativesResolved(AlternativesResolvedApplier),
    PreparationStarted(PreparationStartedApplier),
    ReadyMarked(ReadyMarkedApplier),
    TimeAdded(TimeAddedApplier),
    WeightRecorded(WeightRecordedApplier),
    WeightReviewResolved(WeightReviewResolvedApplier),
    PickedUp(PickedUpApplier),
    Cancelled(CancelledApplier),
    AutoCancelled(AutoCancelledApplier),
    Rated(RatedApplier),
}

/// Convert OrderEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&OrderEvent> for EventAction {
    fn from(event: &OrderEvent) -> Self {
        match &event.payload {
            EventPayload::Submitted { .. } => EventAction::Submitted(SubmittedApplier),
            EventPayload::Accepted { .. } => EventAction::Accepted(AcceptedApplier),
            EventPayload::Denied { .. } => EventAction::Denied(DeniedApplier),
            EventPayload::ItemsFlagged { .. } => EventAction::ItemsFlagged(ItemsFlaggedApplier),
            EventPayload::AlternativesResolved { .. } => {
                EventAction::AlternativesResolved(AlternativesResolvedApplier)
            }
            EventPayload::PreparationStarted { .. } => {
                EventAction::PreparationStarted(PreparationStartedApplier)
            }
            EventPayload::ReadyMarked { .. } => EventAction::ReadyMarked(ReadyMarkedApplier),
            EventPayload::TimeAdded { .. } => EventAction::TimeAdded(TimeAddedApplier),
            EventPayload::WeightRecorded { .. } => {
                EventAction::WeightRecorded(WeightRecordedApplier)
            }
            EventPayload::WeightReviewResolved { .. } => {
                EventAction::WeightReviewResolved(WeightReviewResolvedApplier)
            }
            EventPayload::PickedUp { .. } => EventAction::PickedUp(PickedUpApplier),
            EventPayload::Cancelled { .. } => EventAction::Cancelled(CancelledApplier),
            EventPayload::AutoCancelled { .. } => {
                EventAction::AutoCancelled(AutoCancelledApplier)
            }
            EventPayload::Rated { .. } => EventAction::Rated(RatedApplier),
        }
    }
}
