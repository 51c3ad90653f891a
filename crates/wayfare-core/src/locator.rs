use std::fmt;

/// Strategy used to identify an element on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorKind {
    Id,
    Name,
    Css,
    Tag,
}

impl LocatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocatorKind::Id => "id",
            LocatorKind::Name => "name",
            LocatorKind::Css => "css selector",
            LocatorKind::Tag => "tag name",
        }
    }
}

/// A (kind, value) pair identifying a UI element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    pub kind: LocatorKind,
    pub value: String,
}

impl Locator {
    pub fn new(kind: LocatorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn id(value: impl Into<String>) -> Self {
        Self::new(LocatorKind::Id, value)
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self::new(LocatorKind::Name, value)
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self::new(LocatorKind::Css, value)
    }

    pub fn tag(value: impl Into<String>) -> Self {
        Self::new(LocatorKind::Tag, value)
    }

    /// Express this locator as a CSS selector.
    ///
    /// Backends that only understand CSS (CDP) use this for every kind.
    pub fn to_css(&self) -> String {
        match self.kind {
            LocatorKind::Css | LocatorKind::Tag => self.value.clone(),
            LocatorKind::Id => format!("[id=\"{}\"]", escape_attr(&self.value)),
            LocatorKind::Name => format!("[name=\"{}\"]", escape_attr(&self.value)),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind.as_str(), self.value)
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
