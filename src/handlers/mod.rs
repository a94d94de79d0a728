// Two security tiers: public (no token required) and protected (x-auth-token
// validated by the JWT middleware before the handler runs).
pub mod protected;
pub mod public;
