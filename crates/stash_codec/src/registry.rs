//! The registry of every type this workspace knows how to rebuild.

use stash_container::Container;
use stash_foundation::{Rgba, TypeRegistry, Unit};
use stash_intset::IntSet;

/// Returns a registry with `GwyContainer`, `GwyIntSet`, `GwySIUnit` and
/// `GwyRGBA` registered.
#[must_use]
pub fn builtin_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register_object::<Container>()
        .register_object::<IntSet>()
        .register_object::<Unit>()
        .register_boxed::<Rgba>();
    registry
}
