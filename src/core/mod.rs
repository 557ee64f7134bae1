/// Ownership guard - resolves the owning trip and decides read/write access
pub mod access;

/// Activities inside a city
pub mod activity;

/// Trip budgets, the expense log and spending analytics
pub mod budget;

/// Popular destinations and activity templates
pub mod catalog;

/// Cities on a trip's itinerary
pub mod city;

/// Deep copy of a shared trip into another account
pub mod clone;

/// Caller identity
pub mod identity;

/// Dense ordering of cities and activities
pub mod ordering;

/// Share-token minting, revocation and resolution
pub mod share;

/// Trip aggregate root
pub mod trip;

/// User accounts
pub mod user;

/// Input checks shared by the services
pub mod validation;
