pub mod native_type;
pub use native_type::*;

pub mod graph_error;
pub use graph_error::*;

pub mod primitive_catalog;
pub use primitive_catalog::*;

pub mod expression_graph;
pub use expression_graph::*;

pub mod input_schema;
pub use input_schema::*;
