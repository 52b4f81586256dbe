use crate::{
    lowering::{FunctionLowering, LoweringContext, LoweringResult, NativeNameTables},
    native::NativeType,
};

/// Fallback for scalar names without a specialized lowering. Everything
/// comes from the provided trait methods; the argument types never change
/// the scalar primitive.
pub struct DefaultScalarLowering<'a> {
    ctx: &'a LoweringContext<'a>,
    name: String,
}

impl<'a> DefaultScalarLowering<'a> {
    pub fn new(ctx: &'a LoweringContext<'a>, name: &str) -> Self {
        Self { ctx, name: name.to_string() }
    }
}

impl FunctionLowering for DefaultScalarLowering<'_> {
    fn context(&self) -> &LoweringContext<'_> {
        self.ctx
    }

    fn identity(&self) -> LoweringResult<&str> {
        Ok(&self.name)
    }

    fn native_name_by_types(&self, _arg_types: &[NativeType]) -> LoweringResult<String> {
        NativeNameTables::scalar(&self.name).map(str::to_string)
    }
}
