//! Style inheritance
//!
//! [`StyleTable`] holds one [`StyleNode`] per style and configuration with its
//! parent edge already classified; [`StyleResolver`] walks those edges.

mod resolver;
mod table;

pub use resolver::{Resolution, ResolvedAttribute, StyleResolver};
pub use table::{parse_parent, ParentKind, StyleCycle, StyleNode, StyleTable};
