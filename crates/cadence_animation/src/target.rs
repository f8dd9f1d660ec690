//! Animation targets
//!
//! A tween writes numeric values into an [`AnimatableTarget`]. The
//! well-known transform properties (offsets, scale, rotation) and opacity are
//! enumerated; anything else travels as [`Property::Attr`] and is treated as
//! a generic presentational attribute measured in pixels.

use indexmap::IndexMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A named animatable property
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Horizontal offset in pixels
    X,
    /// Vertical offset in pixels
    Y,
    /// Uniform scale factor
    Scale,
    /// Rotation in degrees
    Rotation,
    /// Opacity (0.0 to 1.0)
    Opacity,
    /// Any other presentational attribute, by name
    Attr(String),
}

impl Property {
    /// Map a property name to its variant; unknown names become `Attr`
    pub fn parse(name: &str) -> Self {
        match name {
            "x" => Property::X,
            "y" => Property::Y,
            "scale" => Property::Scale,
            "rotate" | "rotation" => Property::Rotation,
            "opacity" => Property::Opacity,
            other => Property::Attr(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Property::X => "x",
            Property::Y => "y",
            Property::Scale => "scale",
            Property::Rotation => "rotate",
            Property::Opacity => "opacity",
            Property::Attr(name) => name.as_str(),
        }
    }

    /// Whether the property is part of the cached transform composite
    pub fn is_transform(&self) -> bool {
        matches!(
            self,
            Property::X | Property::Y | Property::Scale | Property::Rotation
        )
    }
}

impl From<&str> for Property {
    fn from(name: &str) -> Self {
        Property::parse(name)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something a tween can read and write numeric properties on
pub trait AnimatableTarget {
    fn get(&self, property: &Property) -> f32;
    fn set(&mut self, property: &Property, value: f32);
}

/// Shared, mutable animation target as held by tweens
pub type SharedTarget = Rc<RefCell<dyn AnimatableTarget>>;

/// Target values for one interpolation step, in insertion order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    entries: SmallVec<[(Property, f32); 4]>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any earlier value for it
    pub fn with(mut self, property: impl Into<Property>, value: f32) -> Self {
        let property = property.into();
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
        self
    }

    pub fn x(self, value: f32) -> Self {
        self.with(Property::X, value)
    }

    pub fn y(self, value: f32) -> Self {
        self.with(Property::Y, value)
    }

    pub fn scale(self, value: f32) -> Self {
        self.with(Property::Scale, value)
    }

    pub fn rotation(self, degrees: f32) -> Self {
        self.with(Property::Rotation, degrees)
    }

    pub fn opacity(self, value: f32) -> Self {
        self.with(Property::Opacity, value)
    }

    /// Set a generic attribute
    pub fn attr(self, name: &str, value: f32) -> Self {
        self.with(Property::Attr(name.to_string()), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Property, f32)> {
        self.entries.iter().map(|(p, v)| (p, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, f32)> for Props {
    fn from_iter<I: IntoIterator<Item = (&'a str, f32)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Props::new(), |props, (name, value)| props.with(name, value))
    }
}

/// Cached transform composite
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

/// A plain visual node: transform, opacity and string attributes.
///
/// Generic attributes are stored the way a style sheet would hold them
/// (`"12.5px"`) and parsed back when read.
#[derive(Clone, Debug)]
pub struct Node {
    transform: Transform,
    opacity: f32,
    attributes: IndexMap<String, String>,
}

impl Node {
    pub fn new() -> Self {
        Self {
            transform: Transform::default(),
            opacity: 1.0,
            attributes: IndexMap::new(),
        }
    }

    /// Wrap in the shared form tweens hold
    pub fn shared(self) -> Rc<RefCell<Node>> {
        Rc::new(RefCell::new(self))
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Render the transform composite as a CSS transform string
    pub fn transform_css(&self) -> String {
        let t = &self.transform;
        format!(
            "translate({}px, {}px) scale({}) rotate({}deg)",
            t.x, t.y, t.scale, t.rotation
        )
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatableTarget for Node {
    fn get(&self, property: &Property) -> f32 {
        match property {
            Property::X => self.transform.x,
            Property::Y => self.transform.y,
            Property::Scale => self.transform.scale,
            Property::Rotation => self.transform.rotation,
            Property::Opacity => self.opacity,
            Property::Attr(name) => self
                .attributes
                .get(name)
                .and_then(|raw| parse_length(raw))
                .unwrap_or(0.0),
        }
    }

    fn set(&mut self, property: &Property, value: f32) {
        match property {
            Property::X => self.transform.x = value,
            Property::Y => self.transform.y = value,
            Property::Scale => self.transform.scale = value,
            Property::Rotation => self.transform.rotation = value,
            Property::Opacity => self.opacity = value,
            Property::Attr(name) => {
                self.attributes.insert(name.clone(), format!("{}px", value));
            }
        }
    }
}

fn parse_length(raw: &str) -> Option<f32> {
    let raw = raw.trim();
    raw.strip_suffix("px").unwrap_or(raw).trim().parse().ok()
}
