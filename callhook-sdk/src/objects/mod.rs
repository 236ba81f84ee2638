pub mod call;
pub mod dispatch;

pub use call::{CallEndedPayload, CallEvent, CallEventType, CallPayloadRef, CallStartedPayload};
pub use dispatch::{DispatchResult, DispatchStatus};
