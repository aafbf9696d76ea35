use super::configuration::FolderConfiguration;
use crate::location::Location;
use crate::parser::xml::ElementId;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Kind of Android resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ResourceType {
    String,
    Style,
    Id,
    Layout,
    Color,
    Dimen,
    Array,
    Plurals,
    Font,
    Bool,
    Integer,
    Drawable,
    Attr,
    Styleable,
    Menu,
    Xml,
    Raw,
    Anim,
    Mipmap,
    Fraction,
}

impl ResourceType {
    /// Type declared by a tag inside `<resources>`
    pub fn from_values_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(ResourceType::String),
            "style" => Some(ResourceType::Style),
            "color" => Some(ResourceType::Color),
            "dimen" => Some(ResourceType::Dimen),
            "string-array" | "integer-array" | "array" => Some(ResourceType::Array),
            "plurals" => Some(ResourceType::Plurals),
            "bool" => Some(ResourceType::Bool),
            "integer" => Some(ResourceType::Integer),
            "fraction" => Some(ResourceType::Fraction),
            "drawable" => Some(ResourceType::Drawable),
            "attr" => Some(ResourceType::Attr),
            "declare-styleable" => Some(ResourceType::Styleable),
            _ => None,
        }
    }

    /// Type named in a resource reference or a `type=` attribute
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ResourceType::String),
            "style" => Some(ResourceType::Style),
            "id" => Some(ResourceType::Id),
            "layout" => Some(ResourceType::Layout),
            "color" => Some(ResourceType::Color),
            "dimen" => Some(ResourceType::Dimen),
            "array" => Some(ResourceType::Array),
            "plurals" => Some(ResourceType::Plurals),
            "font" => Some(ResourceType::Font),
            "bool" => Some(ResourceType::Bool),
            "integer" => Some(ResourceType::Integer),
            "drawable" => Some(ResourceType::Drawable),
            "attr" => Some(ResourceType::Attr),
            "styleable" => Some(ResourceType::Styleable),
            "menu" => Some(ResourceType::Menu),
            "xml" => Some(ResourceType::Xml),
            "raw" => Some(ResourceType::Raw),
            "anim" | "animator" => Some(ResourceType::Anim),
            "mipmap" => Some(ResourceType::Mipmap),
            "fraction" => Some(ResourceType::Fraction),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::String => "string",
            ResourceType::Style => "style",
            ResourceType::Id => "id",
            ResourceType::Layout => "layout",
            ResourceType::Color => "color",
            ResourceType::Dimen => "dimen",
            ResourceType::Array => "array",
            ResourceType::Plurals => "plurals",
            ResourceType::Font => "font",
            ResourceType::Bool => "bool",
            ResourceType::Integer => "integer",
            ResourceType::Drawable => "drawable",
            ResourceType::Attr => "attr",
            ResourceType::Styleable => "styleable",
            ResourceType::Menu => "menu",
            ResourceType::Xml => "xml",
            ResourceType::Raw => "raw",
            ResourceType::Anim => "anim",
            ResourceType::Mipmap => "mipmap",
            ResourceType::Fraction => "fraction",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Declared value of a resource item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceValue {
    /// Character data of `<string>`, `<color>`, `<dimen>`, ...
    Text(String),
    /// `<style parent="...">`; `parent` is `None` when the attribute is absent
    Style {
        parent: Option<String>,
        parent_location: Option<Location>,
        items: Vec<StyleEntry>,
    },
    /// Children of arrays and plurals
    Items(Vec<String>),
    /// Declarations with no value (`<item type="id">`, file resources)
    None,
}

/// `<item name="android:layout_width">wrap_content</item>` inside a style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEntry {
    pub name: String,
    pub value: String,
    pub location: Location,
}

/// How the item was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclarationTag {
    /// Dedicated tag such as `<string>` or `<style>`
    Element,
    /// `<item type="..." name="...">`
    Item,
    /// A whole file under `res/<type>/`
    File,
}

/// One declaration of a resource in one configuration
#[derive(Debug, Clone)]
pub struct ResourceItem {
    pub resource_type: ResourceType,
    pub name: String,
    pub config: FolderConfiguration,
    pub value: ResourceValue,
    pub location: Location,
    /// Location of the `name` attribute value when declared by a tag
    pub name_location: Option<Location>,
    pub translatable: bool,
    pub declared_by: DeclarationTag,
    /// Index of the declaring document in the project
    pub document: usize,
    pub element: Option<ElementId>,
}

impl ResourceItem {
    /// Location used when reporting on this declaration
    pub fn report_location(&self) -> &Location {
        self.name_location.as_ref().unwrap_or(&self.location)
    }
}

static RESOURCE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@(\+)?(?:\*?([A-Za-z][\w.]*):)?([a-z]+)/([\w.]+)$")
        .expect("resource url pattern is valid")
});

/// A parsed `@[+][package:]type/name` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUrl {
    pub create: bool,
    pub framework: bool,
    pub resource_type: ResourceType,
    pub name: String,
}

impl ResourceUrl {
    pub fn parse(value: &str) -> Option<Self> {
        let captures = RESOURCE_URL.captures(value.trim())?;
        let resource_type = ResourceType::from_name(&captures[3])?;
        Some(Self {
            create: captures.get(1).is_some(),
            framework: captures.get(2).is_some_and(|p| p.as_str() == "android"),
            resource_type,
            name: captures[4].to_string(),
        })
    }
}

impl fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{}{}{}/{}",
            if self.create { "+" } else { "" },
            if self.framework { "android:" } else { "" },
            self.resource_type,
            self.name
        )
    }
}
