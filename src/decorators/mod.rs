//! Bundled decorators
//!
//! Each module pairs an annotation (or a bound type) with the decorator that
//! handles it. [`register_builtins`] is what [`DecoratorRegistry::with_builtins`]
//! installs.

pub mod angle_to_rad;
pub mod array_label;
pub mod background_color;
pub mod button;
pub mod hide_if;
pub mod maximum;
pub mod passthrough;
pub mod reference;
pub mod remove_foldout;

#[cfg(test)]
pub(crate) mod test_support;

use crate::registry::DecoratorRegistry;

pub use angle_to_rad::{AngleToRad, AngleToRadDecorator};
pub use array_label::{ArrayLabel, ArrayLabelDecorator};
pub use background_color::{BackgroundColor, BackgroundColorDecorator, ColorPreset};
pub use button::{Button, ButtonDecorator};
pub use hide_if::{HideIf, HideIfDecorator};
pub use maximum::{Maximum, MaximumDecorator};
pub use passthrough::PassthroughDecorator;
pub use reference::{reference, reference_type, ReferenceDecorator};
pub use remove_foldout::{RemoveFoldout, RemoveFoldoutDecorator};

/// Register every bundled decorator kind
pub fn register_builtins(registry: &mut DecoratorRegistry) {
    registry
        .register::<MaximumDecorator>()
        .register::<HideIfDecorator>()
        .register::<AngleToRadDecorator>()
        .register::<ButtonDecorator>()
        .register::<BackgroundColorDecorator>()
        .register::<ArrayLabelDecorator>()
        .register::<RemoveFoldoutDecorator>()
        .register::<ReferenceDecorator>();
}
