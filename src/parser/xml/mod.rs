mod dom;
mod layout;
mod values;

pub use dom::{ElementId, XmlAttribute, XmlDocument, XmlElement, XmlError};
pub use layout::{IncludeSite, LayoutExtraction, LayoutParser};
pub use values::{ValuesExtraction, ValuesParser};
