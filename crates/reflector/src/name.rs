//! Display name decorator

use crate::attribute::Annotated;
use crate::decorator::{any_decorator, AnyDecorator, Decorated};

/// Tag holding a display name
pub const NAME_TAG: &str = "reflection:name";

/// Decorator stamping `name` into the [`NAME_TAG`] tag of whatever it is
/// attached to
pub fn name_decorator(name: impl Into<String>) -> AnyDecorator {
    let name = name.into();
    any_decorator(move |decorated| match *decorated {
        Decorated::Class { class } => class.set_tag(NAME_TAG, name.as_str()),
        Decorated::Constructor {
            parameter: Some(parameter),
            ..
        } => parameter.set_tag(NAME_TAG, name.as_str()),
        Decorated::Constructor { constructor, .. } => constructor.set_tag(NAME_TAG, name.as_str()),
        Decorated::Method { method, .. } => method.set_tag(NAME_TAG, name.as_str()),
        Decorated::Property { property, .. } => property.set_tag(NAME_TAG, name.as_str()),
        Decorated::Parameter { parameter, .. } => parameter.set_tag(NAME_TAG, name.as_str()),
    })
}
