//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles one specific
//! command type. Actions validate the order's CURRENT status inside the write
//! transaction - this re-read is what makes every transition a conditional
//! commit: the loser of a race observes the winner's status and fails with a
//! state conflict instead of double-applying.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{OrderCommand, OrderCommandPayload, OrderEvent};

mod accept;
mod add_time;
mod auto_cancel;
mod cancel;
mod confirm_pickup;
mod deny;
mod flag_unavailable;
mod manual_pickup;
mod mark_ready;
mod rate;
mod record_weighing;
mod resolve_alternatives;
mod resolve_weight_review;
mod start_preparing;
mod submit;

pub use accept::AcceptAction;
pub use add_time::AddTimeAction;
pub use auto_cancel::AutoCancelAction;
pub use cancel::CancelAction;
pub use confirm_pickup::ConfirmPickupAction;
pub use deny::DenyAction;
pub use flag_unavailable::FlagUnavailableAction;
pub use manual_pickup::ManualPickupAction;
pub use mark_ready::MarkReadyAction;
pub use rate::RateAction;
pub use record_weighing::RecordWeighingAction;
pub use resolve_alternatives::ResolveAlternativesAction;
pub use resolve_weight_review::ResolveWeightReviewAction;
pub use start_preparing::StartPreparingAction;
pub use submit::SubmitAction;

/// CommandAction enum - dispatches to concrete action implementations
pub enum CommandAction {
    Submit(SubmitAction),
    Accept(AcceptAction),
    Deny(DenyAction),
    FlagUnavailable(FlagUnavailableAction),
    ResolveAlternatives(ResolveAlternativesAction),
    StartPreparing(StartPreparingAction),
    MarkReady(MarkReadyAction),
    AddTime(AddTimeAction),
    RecordWeighing(RecordWeighingAction),
    ResolveWeightReview(ResolveWeightReviewAction),
    ConfirmPickup(ConfirmPickupAction),
    ManualPickup(ManualPickupAction),
    Cancel(CancelAction),
    Rate(RateAction),
    AutoCancel(AutoCancelAction),
}

/// Manual implementation of CommandHandler for CommandAction
#[async_trait]
impl CommandHandler for CommandAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        match self {
            CommandAction::Submit(action) => action.execute(ctx, metadata).await,
            CommandAction::Accept(action) => action.execute(ctx, metadata).await,
            CommandAction::Deny(action) => action.execute(ctx, metadata).await,
            CommandAction::FlagUnavailable(action) => action.execute(ctx, metadata).await,
            CommandAction::ResolveAlternatives(action) => action.execute(ctx, metadata).await,
            CommandAction::StartPreparing(action) => action.execute(ctx, metadata).await,
            CommandAction::MarkReady(action) => action.execute(ctx, metadata).await,
            CommandAction::AddTime(action) => action.execute(ctx, metadata).await,
            CommandAction::RecordWeighing(action) => action.execute(ctx, metadata).await,
            CommandAction::ResolveWeightReview(action) => action.execute(ctx, metadata).await,
            CommandAction::ConfirmPickup(action) => action.execute(ctx, metadata).await,
            CommandAction::ManualPickup(action) => action.execute(ctx, metadata).await,
            CommandAction::Cancel(action) => action.execute(ctx, metadata).await,
            CommandAction::Rate(action) => action.execute(ctx, metadata).await,
            CommandAction::AutoCancel(action) => action.execute(ctx, metadata).await,
        }
    }
}

/// Convert OrderCommand to CommandAction for payloads that need no injection
///
/// `Submit`, `FlagUnavailable`, `ResolveAlternatives`, `RecordWeighing` and
/// `AutoCancel` carry injected data (order numbers, catalog handle, weight
/// tolerance, timeout settings) and are built by the manager directly - this
/// conversion must never see them.
impl From<&OrderCommand> for CommandAction {
    fn from(cmd: &OrderCommand) -> Self {
        match &cmd.payload {
            OrderCommandPayload::Submit { .. } => {
                unreachable!("Submit is built by the manager with a pre-generated order number")
            }
            OrderCommandPayload::FlagUnavailable { .. } => {
                unreachable!("FlagUnavailable is built by the manager with the catalog handle")
            }
            OrderCommandPayload::ResolveAlternatives { .. } => {
                unreachable!("ResolveAlternatives is built by the manager with the catalog handle")
            }
            OrderCommandPayload::RecordWeighing { .. } => {
                unreachable!("RecordWeighing is built by the manager with the weight tolerance")
            }
            OrderCommandPayload::Accept {
                order_id,
                eta_minutes,
                shop_note,
            } => CommandAction::Accept(AcceptAction {
                order_id: order_id.clone(),
                eta_minutes: *eta_minutes,
                shop_note: shop_note.clone(),
            }),
            OrderCommandPayload::Deny { order_id, reason } => CommandAction::Deny(DenyAction {
                order_id: order_id.clone(),
                reason: reason.clone(),
            }),
            OrderCommandPayload::StartPreparing { order_id } => {
                CommandAction::StartPreparing(StartPreparingAction {
                    order_id: order_id.clone(),
                })
            }
            OrderCommandPayload::MarkReady { order_id } => {
                CommandAction::MarkReady(MarkReadyAction {
                    order_id: order_id.clone(),
                })
            }
            OrderCommandPayload::AddTime { order_id, minutes } => {
                CommandAction::AddTime(AddTimeAction {
                    order_id: order_id.clone(),
                    minutes: *minutes,
                })
            }
            OrderCommandPayload::ResolveWeightReview { order_id, accept } => {
                CommandAction::ResolveWeightReview(ResolveWeightReviewAction {
                    order_id: order_id.clone(),
                    accept: *accept,
                })
            }
            OrderCommandPayload::ConfirmPickup { order_id, token } => {
                CommandAction::ConfirmPickup(ConfirmPickupAction {
                    order_id: order_id.clone(),
                    token: token.clone(),
                })
            }
            OrderCommandPayload::ManualPickup { order_id } => {
                CommandAction::ManualPickup(ManualPickupAction {
                    order_id: order_id.clone(),
                })
            }
            OrderCommandPayload::Cancel { order_id } => CommandAction::Cancel(CancelAction {
                order_id: order_id.clone(),
            }),
            OrderCommandPayload::Rate {
                order_id,
                score,
                comment,
            } => CommandAction::Rate(RateAction {
                order_id: order_id.clone(),
                score: *score,
                comment: comment.clone(),
            }),
            OrderCommandPayload::AutoCancel { .. } => {
                unreachable!("AutoCancel is built by the manager with the configured timeout")
            }
        }
    }
}
