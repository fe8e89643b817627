mod checkin;
mod guest;

pub use checkin::{CheckInRequest, CheckInResult, DecodedPayload};
pub use guest::{GuestLookupResponse, GuestRecord};
