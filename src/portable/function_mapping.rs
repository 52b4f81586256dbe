use indexmap::{map::Entry, IndexMap};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::lowering::{LoweringError, LoweringResult};

static SIGNATURE_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*:\S*$").expect("signature pattern is valid")
});

/// Plan-wide mapping from function reference to declared signature.
///
/// Built once while the plan is deserialized and read-only afterwards, so it
/// can be shared between threads lowering different fragments of the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionMapping {
    by_reference: IndexMap<u32, String>,
}

impl FunctionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reference. Signatures must look like `name:argtypes`, and a
    /// reference may only be declared again with the same signature.
    pub fn insert(&mut self, reference: u32, signature: impl Into<String>) -> LoweringResult<()> {
        let signature = signature.into();
        if !SIGNATURE_FORMAT.is_match(&signature) {
            return Err(LoweringError::InvalidSignature(signature));
        }
        match self.by_reference.entry(reference) {
            Entry::Occupied(existing) if existing.get() != &signature => {
                Err(LoweringError::DuplicateFunctionReference {
                    reference,
                    existing: existing.get().clone(),
                    signature,
                })
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(signature);
                Ok(())
            }
        }
    }

    pub fn from_entries<I, S>(entries: I) -> LoweringResult<Self>
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        let mut mapping = Self::new();
        for (reference, signature) in entries {
            mapping.insert(reference, signature)?;
        }
        Ok(mapping)
    }

    pub fn get(&self, reference: u32) -> Option<&str> {
        self.by_reference.get(&reference).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_reference.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_signatures() {
        let mapping = FunctionMapping::from_entries([
            (1, "add:i32_i32"),
            (2, "collect_list:i32"),
            (3, "count:"),
        ])
        .unwrap();
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.get(2), Some("collect_list:i32"));
        assert_eq!(mapping.get(9), None);
    }

    #[test]
    fn redeclaring_a_reference() {
        let mut mapping = FunctionMapping::from_entries([(1, "add:i32_i32")]).unwrap();
        mapping.insert(1, "add:i32_i32").unwrap();
        assert_eq!(mapping.len(), 1);

        let err = mapping.insert(1, "subtract:i32_i32").unwrap_err();
        assert_eq!(
            err,
            LoweringError::DuplicateFunctionReference {
                reference: 1,
                existing: "add:i32_i32".into(),
                signature: "subtract:i32_i32".into(),
            }
        );
        assert_eq!(mapping.get(1), Some("add:i32_i32"));
    }

    #[test]
    fn rejects_signature_without_separator() {
        let mut mapping = FunctionMapping::new();
        let err = mapping.insert(1, "add").unwrap_err();
        assert_eq!(err, LoweringError::InvalidSignature("add".into()));
        assert!(mapping.is_empty());
    }
}
