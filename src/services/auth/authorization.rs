use crate::services::auth::claims::{Claims, Role};

/// `true` when no role is required, or the token's role is one of `required`.
///
/// Exact match only: ADMIN does not imply EMPLOYEE.
pub fn authorized(claims: &Claims, required: &[Role]) -> bool {
    required.is_empty() || required.contains(&claims.role)
}
