//! TCP plumbing around the request pipeline: the accept loop and the
//! operator's stop trigger.

pub mod listener;
pub mod shutdown;
