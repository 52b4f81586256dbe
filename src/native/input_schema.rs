use indexmap::IndexMap;

use crate::native::NativeType;

/// Ordered columns of the block a fragment's expressions read from.
///
/// Field references in the portable IR are positional, so insertion order
/// is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSchema {
    /// Map of column name -> native type
    pub fields: IndexMap<String, NativeType>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, ty: NativeType) {
        self.fields.insert(name.to_string(), ty);
    }

    pub fn with(mut self, name: &str, ty: NativeType) -> Self {
        self.add(name, ty);
        self
    }

    pub fn get(&self, name: &str) -> Option<&NativeType> {
        self.fields.get(name)
    }

    /// Column at a positional field reference.
    pub fn column(&self, index: usize) -> Option<(&str, &NativeType)> {
        self.fields.get_index(index).map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_positional() {
        let schema = InputSchema::new()
            .with("id", NativeType::Int64)
            .with("name", NativeType::nullable(NativeType::String));
        assert_eq!(schema.column(1), Some(("name", &NativeType::nullable(NativeType::String))));
        assert_eq!(schema.column(2), None);
        assert_eq!(schema.width(), 2);
    }
}
