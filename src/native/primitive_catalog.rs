use crate::native::{GraphError, NativeType};

/// Return-type rules of the native primitives the lowering tables can select.
///
/// This mirrors what the engine's function factory reports when a node is
/// built; it never evaluates anything.
pub struct PrimitiveCatalog;

impl PrimitiveCatalog {
    pub fn is_aggregate(name: &str) -> bool {
        matches!(
            name,
            "count" | "sum" | "sumKahan" | "avg" | "min" | "max" | "any" | "anyLast"
                | "groupArray" | "groupUniqArray" | "groupBitAnd" | "groupBitOr"
        )
    }

    pub fn scalar_return_type(name: &str, args: &[NativeType]) -> Result<NativeType, GraphError> {
        let any_nullable = args.iter().any(NativeType::is_nullable);
        let mismatch = || Self::mismatch(name, args);

        let ty = match (name, args) {
            ("plus" | "minus" | "multiply", [a, b]) => {
                if a.is_nothing() || b.is_nothing() {
                    return Ok(NativeType::nullable(NativeType::Nothing));
                }
                if !a.is_numeric() || !b.is_numeric() {
                    return Err(mismatch());
                }
                if a.is_float() || b.is_float() { NativeType::Float64 } else { NativeType::Int64 }
            }
            ("divide", [a, b]) if a.is_numeric() && b.is_numeric() => NativeType::Float64,
            ("modulo", [a, b]) if a.is_integer() && b.is_integer() => NativeType::Int64,
            ("modulo", [a, b]) if a.is_numeric() && b.is_numeric() => NativeType::Float64,
            ("equals" | "notEquals" | "less" | "lessOrEquals" | "greater" | "greaterOrEquals", [a, b]) => {
                if NativeType::common_supertype(a, b).is_none() {
                    return Err(mismatch());
                }
                NativeType::Bool
            }
            ("and" | "or", many) if many.len() >= 2 => {
                if !many.iter().all(|t| matches!(t.remove_nullable(), NativeType::Bool | NativeType::Nothing)) {
                    return Err(mismatch());
                }
                NativeType::Bool
            }
            ("not", [a]) if matches!(a.remove_nullable(), NativeType::Bool) => NativeType::Bool,
            ("isNull" | "isNotNull", [_]) => return Ok(NativeType::Bool),
            ("coalesce" | "ifNull", many) if !many.is_empty() => {
                if name == "ifNull" && many.len() != 2 {
                    return Err(mismatch());
                }
                let mut ty = NativeType::Nothing;
                for arg in many {
                    ty = NativeType::common_supertype(&ty, arg).ok_or_else(mismatch)?;
                }
                // Non-null as soon as any candidate is non-null.
                let all_nullable = many.iter().all(NativeType::is_nullable);
                return Ok(ty.with_nullability_of(all_nullable));
            }
            ("concat", many) if !many.is_empty() => {
                if !many.iter().all(|t| matches!(t.remove_nullable(), NativeType::String)) {
                    return Err(mismatch());
                }
                NativeType::String
            }
            ("upper" | "lower", [a]) if matches!(a.remove_nullable(), NativeType::String) => NativeType::String,
            ("length", [a]) if matches!(a.remove_nullable(), NativeType::String | NativeType::Array(_)) => {
                NativeType::UInt64
            }
            ("abs", [a]) if a.is_numeric() => a.remove_nullable().clone(),
            (known, _) if Self::is_scalar(known) => return Err(mismatch()),
            _ => return Err(GraphError::UnknownPrimitive(name.to_string())),
        };
        Ok(ty.with_nullability_of(any_nullable))
    }

    /// Aggregates run in the engine's "or null" mode: a group with no
    /// qualifying input yields NULL whenever the argument is nullable.
    pub fn aggregate_return_type(name: &str, args: &[NativeType]) -> Result<NativeType, GraphError> {
        let mismatch = || Self::mismatch(name, args);
        match (name, args) {
            ("count", _) => Ok(NativeType::UInt64),
            ("sum", [a]) if a.is_integer() => Ok(NativeType::Int64.with_nullability_of(a.is_nullable())),
            ("sum" | "sumKahan", [a]) if a.is_float() => {
                Ok(NativeType::Float64.with_nullability_of(a.is_nullable()))
            }
            ("avg", [a]) if a.is_numeric() => Ok(NativeType::nullable(NativeType::Float64)),
            ("min" | "max" | "any" | "anyLast", [a]) => Ok(a.clone()),
            ("groupArray" | "groupUniqArray", [a]) => {
                Ok(NativeType::array(a.remove_nullable().clone()).with_nullability_of(a.is_nullable()))
            }
            ("groupBitAnd" | "groupBitOr", [a]) if a.is_integer() => Ok(a.clone()),
            (known, _) if Self::is_aggregate(known) => Err(mismatch()),
            _ => Err(GraphError::UnknownPrimitive(name.to_string())),
        }
    }

    fn is_scalar(name: &str) -> bool {
        matches!(
            name,
            "plus" | "minus" | "multiply" | "divide" | "modulo" | "equals" | "notEquals" | "less"
                | "lessOrEquals" | "greater" | "greaterOrEquals" | "and" | "or" | "not" | "isNull"
                | "isNotNull" | "coalesce" | "ifNull" | "concat" | "upper" | "lower" | "length" | "abs"
        )
    }

    fn mismatch(name: &str, args: &[NativeType]) -> GraphError {
        let args = args.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        GraphError::ArgumentMismatch { name: name.to_string(), args }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(t: NativeType) -> NativeType { NativeType::nullable(t) }

    #[test]
    fn integer_arithmetic_widens_to_int64() {
        let ty = PrimitiveCatalog::scalar_return_type("plus", &[NativeType::Int32, NativeType::Int32]).unwrap();
        assert_eq!(ty, NativeType::Int64);

        let ty = PrimitiveCatalog::scalar_return_type("minus", &[n(NativeType::Int32), NativeType::Float32]).unwrap();
        assert_eq!(ty, n(NativeType::Float64));
    }

    #[test]
    fn if_null_drops_nullability_with_non_null_fallback() {
        let ty = PrimitiveCatalog::scalar_return_type(
            "ifNull",
            &[n(NativeType::array(NativeType::Int32)), NativeType::array(NativeType::Int32)],
        )
        .unwrap();
        assert_eq!(ty, NativeType::array(NativeType::Int32));
    }

    #[test]
    fn is_null_is_never_nullable() {
        let ty = PrimitiveCatalog::scalar_return_type("isNull", &[n(NativeType::String)]).unwrap();
        assert_eq!(ty, NativeType::Bool);
    }

    #[test]
    fn mismatched_arguments_and_unknown_primitives() {
        let err = PrimitiveCatalog::scalar_return_type("upper", &[NativeType::Int32]).unwrap_err();
        assert_eq!(err, GraphError::ArgumentMismatch { name: "upper".into(), args: "Int32".into() });

        let err = PrimitiveCatalog::scalar_return_type("frobnicate", &[]).unwrap_err();
        assert_eq!(err, GraphError::UnknownPrimitive("frobnicate".into()));
    }

    #[test]
    fn collect_primitives_are_nullable_for_nullable_input() {
        let ty = PrimitiveCatalog::aggregate_return_type("groupArray", &[n(NativeType::Int32)]).unwrap();
        assert_eq!(ty, n(NativeType::array(NativeType::Int32)));

        let ty = PrimitiveCatalog::aggregate_return_type("groupUniqArray", &[NativeType::Int32]).unwrap();
        assert_eq!(ty, NativeType::array(NativeType::Int32));
    }

    #[test]
    fn aggregate_rules() {
        assert_eq!(PrimitiveCatalog::aggregate_return_type("count", &[]).unwrap(), NativeType::UInt64);
        assert_eq!(
            PrimitiveCatalog::aggregate_return_type("sumKahan", &[NativeType::Float32]).unwrap(),
            NativeType::Float64
        );
        assert!(PrimitiveCatalog::aggregate_return_type("groupBitAnd", &[NativeType::String]).is_err());
        assert!(PrimitiveCatalog::is_aggregate("anyLast"));
        assert!(!PrimitiveCatalog::is_aggregate("plus"));
    }
}
