//! Access control for pantry ingredients.
//!
//! Evaluation is first-match-wins over a fixed rule order; every decision
//! is emitted as a structured audit event regardless of outcome.

use crate::ingredient::{AccessLevel, Ingredient};
use crate::pantry::store::IngredientStore;
use serde::{Deserialize, Serialize};

/// Identities treated as administrators.
const ADMIN_USERS: &[&str] = &["admin", "root", "system"];

/// Identity used for unauthenticated callers.
pub const ANONYMOUS: &str = "anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Delete,
    Admin,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Delete => "delete",
            Permission::Admin => "admin",
        }
    }
}

/// Check whether `user_id` may perform `permission` on the ingredient
/// with id `ingredient_id`. Unknown ingredients are always denied.
///
/// Rule order, first match wins:
/// 1. public level + read permission: allowed for everyone
/// 2. admin caller: allowed
/// 3. protected level: allowed for any authenticated caller
/// 4. admin level: allowed only for admin callers
/// 5. otherwise denied
pub fn can_access(
    store: &IngredientStore,
    user_id: &str,
    ingredient_id: &str,
    permission: Permission,
) -> bool {
    let Some(ingredient) = store.get(ingredient_id) else {
        audit(user_id, ingredient_id, permission, false);
        return false;
    };

    let granted = evaluate(user_id, ingredient, permission);
    audit(user_id, ingredient_id, permission, granted);
    granted
}

fn evaluate(user_id: &str, ingredient: &Ingredient, permission: Permission) -> bool {
    if ingredient.access_level == AccessLevel::Public && permission == Permission::Read {
        return true;
    }
    if is_admin(user_id) {
        return true;
    }
    if ingredient.access_level == AccessLevel::Protected {
        return is_authenticated(user_id);
    }
    if ingredient.access_level == AccessLevel::Admin {
        return is_admin(user_id);
    }
    false
}

/// All ingredients `user_id` can reach with `permission`.
pub fn accessible_ingredients<'a>(
    store: &'a IngredientStore,
    user_id: &str,
    permission: Permission,
) -> Vec<&'a Ingredient> {
    store
        .list(None)
        .into_iter()
        .filter(|i| evaluate(user_id, i, permission))
        .collect()
}

fn is_authenticated(user_id: &str) -> bool {
    !user_id.is_empty() && user_id != ANONYMOUS
}

fn is_admin(user_id: &str) -> bool {
    ADMIN_USERS.contains(&user_id)
}

fn audit(user_id: &str, ingredient_id: &str, permission: Permission, granted: bool) {
    tracing::info!(
        target: "galley::audit",
        user = user_id,
        ingredient = ingredient_id,
        permission = permission.as_str(),
        granted,
        "access decision"
    );
}
