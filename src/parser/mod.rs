pub mod java;
pub mod xml;

pub use java::JavaParser;
pub use xml::XmlDocument;
