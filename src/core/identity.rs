//! Identity context.
//!
//! The credential-management collaborator authenticates requests and hands the
//! core nothing more than the user's identifier. Reads accept `Option<UserId>`
//! so anonymous visitors can view public trips.

/// Identifier of an authenticated user
pub type UserId = i64;
