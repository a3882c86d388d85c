// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for Prometheus metric keys
pub const USER_REGISTERED: &str = "auth.user.registered";
pub const INVITE_CREATED: &str = "auth.invite.created";
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const LOGIN_RATE_LIMITED: &str = "auth.login.rate_limited";
pub const TOKEN_REFRESHED: &str = "auth.token.refreshed";
pub const RESET_CREATED: &str = "auth.reset.created";
pub const RESET_COMPLETED: &str = "auth.reset.completed";
