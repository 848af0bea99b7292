//! Toolkit-neutral cell renderers.
//!
//! A renderer is a bag of display properties plus the set of properties it
//! accepts. Setting anything outside that set fails, which is how the
//! column layer detects e.g. ellipsizing a rating cell.

use bitflags::bitflags;

bitflags! {
    /// Properties a renderer accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RendererCaps: u8 {
        const XALIGN = 1;
        const WIDTH_CHARS = 1 << 1;
        const ELLIPSIZE = 1 << 2;
        const FOLLOW_STATE = 1 << 3;
        const FIXED_SIZE = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    /// Plain text
    Text,
    /// Star rating
    Rating,
    /// Status icon (playing, paused)
    Icon,
}

impl RendererKind {
    pub fn caps(self) -> RendererCaps {
        match self {
            Self::Text => RendererCaps::XALIGN | RendererCaps::WIDTH_CHARS | RendererCaps::ELLIPSIZE,
            Self::Rating => {
                RendererCaps::XALIGN | RendererCaps::FOLLOW_STATE | RendererCaps::FIXED_SIZE
            }
            Self::Icon => RendererCaps::XALIGN | RendererCaps::FOLLOW_STATE | RendererCaps::FIXED_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ellipsize {
    None,
    End,
}

/// A single display property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellProperty {
    /// Horizontal alignment, 0.0 (left) to 1.0 (right)
    XAlign(f32),
    /// Width hint in characters
    WidthChars(u32),
    Ellipsize(Ellipsize),
    /// Whether the cell tracks the row's selection state
    FollowState(bool),
    /// Fixed square size in pixels
    FixedSize(u32),
}

impl CellProperty {
    pub fn name(&self) -> &'static str {
        match self {
            Self::XAlign(_) => "xalign",
            Self::WidthChars(_) => "width-chars",
            Self::Ellipsize(_) => "ellipsize",
            Self::FollowState(_) => "follow-state",
            Self::FixedSize(_) => "fixed-size",
        }
    }

    pub fn required_cap(&self) -> RendererCaps {
        match self {
            Self::XAlign(_) => RendererCaps::XALIGN,
            Self::WidthChars(_) => RendererCaps::WIDTH_CHARS,
            Self::Ellipsize(_) => RendererCaps::ELLIPSIZE,
            Self::FollowState(_) => RendererCaps::FOLLOW_STATE,
            Self::FixedSize(_) => RendererCaps::FIXED_SIZE,
        }
    }
}

/// Property rejected by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("{kind:?} renderer has no '{property}' property")]
pub struct UnsupportedProperty {
    pub kind: RendererKind,
    pub property: &'static str,
}

/// One cell inside a column.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRenderer {
    kind: RendererKind,
    /// Whether the cell takes leftover space inside the column
    expand: bool,
    properties: Vec<CellProperty>,
}

impl CellRenderer {
    pub fn new(kind: RendererKind) -> Self {
        Self {
            kind,
            expand: true,
            properties: Vec::new(),
        }
    }

    /// Leading status icon: a fixed `size` square aligned left.
    pub fn status_icon(size: u32) -> Self {
        Self {
            kind: RendererKind::Icon,
            expand: false,
            properties: vec![CellProperty::FixedSize(size), CellProperty::XAlign(0.0)],
        }
    }

    pub fn kind(&self) -> RendererKind {
        self.kind
    }

    pub fn expands(&self) -> bool {
        self.expand
    }

    pub fn supports(&self, property: &CellProperty) -> bool {
        self.kind.caps().contains(property.required_cap())
    }

    /// Set a property, replacing any earlier value of the same property.
    pub fn set_property(&mut self, property: CellProperty) -> Result<(), UnsupportedProperty> {
        if !self.supports(&property) {
            return Err(UnsupportedProperty {
                kind: self.kind,
                property: property.name(),
            });
        }
        self.properties
            .retain(|existing| existing.name() != property.name());
        self.properties.push(property);
        Ok(())
    }

    pub fn property(&self, name: &str) -> Option<CellProperty> {
        self.properties
            .iter()
            .copied()
            .find(|property| property.name() == name)
    }

    pub fn properties(&self) -> &[CellProperty] {
        &self.properties
    }
}
