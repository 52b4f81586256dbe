use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::{
    lowering::{LoweringError, LoweringResult},
    native::NativeType,
};

/// Canonical scalar name -> native primitive.
pub static SCALAR_FUNCTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Arith
        ("add", "plus"),
        ("subtract", "minus"),
        ("multiply", "multiply"),
        ("divide", "divide"),
        ("modulus", "modulo"),
        ("abs", "abs"),
        // Comparison
        ("equal", "equals"),
        ("not_equal", "notEquals"),
        ("lt", "less"),
        ("lte", "lessOrEquals"),
        ("gt", "greater"),
        ("gte", "greaterOrEquals"),
        // Boolean
        ("and", "and"),
        ("or", "or"),
        ("not", "not"),
        // Nulls
        ("is_null", "isNull"),
        ("is_not_null", "isNotNull"),
        ("coalesce", "coalesce"),
        // String
        ("concat", "concat"),
        ("upper", "upper"),
        ("lower", "lower"),
        ("char_length", "length"),
    ])
});

/// Canonical aggregate name -> native primitive, by declared signature only.
pub static AGGREGATE_FUNCTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("sum", "sum"),
        ("count", "count"),
        ("avg", "avg"),
        ("min", "min"),
        ("max", "max"),
        ("first", "any"),
        ("last", "anyLast"),
        ("bit_and", "groupBitAnd"),
        ("bit_or", "groupBitOr"),
        ("collect_list", "groupArray"),
        ("collect_set", "groupUniqArray"),
    ])
});

pub struct NativeNameTables;

impl NativeNameTables {
    pub fn scalar(canonical: &str) -> LoweringResult<&'static str> {
        SCALAR_FUNCTIONS
            .get(canonical)
            .copied()
            .ok_or_else(|| LoweringError::UnknownFunction(canonical.to_string()))
    }

    pub fn aggregate(canonical: &str) -> LoweringResult<&'static str> {
        AGGREGATE_FUNCTIONS
            .get(canonical)
            .copied()
            .ok_or_else(|| LoweringError::UnknownFunction(canonical.to_string()))
    }

    /// Picks the aggregate primitive from the resolved argument types. Some
    /// canonical names map to several primitives depending on the input,
    /// which the declared signature alone does not tell apart.
    pub fn aggregate_by_types(canonical: &str, arg_types: &[NativeType]) -> LoweringResult<&'static str> {
        match (canonical, arg_types) {
            ("sum", [a]) if a.is_float() => Ok("sumKahan"),
            ("bit_and" | "bit_or", [a]) if !a.is_integer() => Err(LoweringError::UnknownFunction(format!(
                "{}({})",
                canonical, a
            ))),
            _ => Self::aggregate(canonical),
        }
    }
}
