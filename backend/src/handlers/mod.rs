//! HTTP handlers for the Gestionale platform

mod auth;
mod employee;
mod fleet;
mod health;
mod inventory;
mod notification;
mod order;
mod product;
mod receipt;
mod registry;
mod reporting;

pub use auth::*;
pub use employee::*;
pub use fleet::*;
pub use health::*;
pub use inventory::*;
pub use notification::*;
pub use order::*;
pub use product::*;
pub use receipt::*;
pub use registry::*;
pub use reporting::*;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;

/// Guard a handler behind a `resource:action` permission from the static
/// role policy.
pub(crate) fn require(user: &AuthUser, resource: &str, action: &str) -> AppResult<()> {
    if user.has_permission(resource, action) {
        Ok(())
    } else {
        Err(AppError::InsufficientPermissions)
    }
}
