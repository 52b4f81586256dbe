use std::collections::{hash_map::Entry, HashMap};

use once_cell::sync::Lazy;
use tracing::info;

use crate::lowering::{
    create_collect_list, create_collect_set, CollectListLowering, CollectSetLowering, FunctionLowering,
    LoweringContext, LoweringError, LoweringResult,
};

/// Builds a fresh lowering bound to the given context.
pub type LoweringConstructor = for<'a> fn(&'a LoweringContext<'a>) -> Box<dyn FunctionLowering + 'a>;

static GLOBAL: Lazy<LoweringResult<LoweringRegistry>> = Lazy::new(LoweringRegistry::default_registry);

/// Canonical name -> constructor of a specialized lowering.
///
/// Filled once at startup and only read afterwards. Names without an entry
/// go through the default scalar or common aggregate lowering.
#[derive(Default)]
pub struct LoweringRegistry {
    by_name: HashMap<String, LoweringConstructor>,
}

impl LoweringRegistry {
    pub fn new() -> Self {
        Self { by_name: HashMap::new() }
    }

    pub fn register(&mut self, name: &str, constructor: LoweringConstructor) -> LoweringResult<()> {
        match self.by_name.entry(name.to_string()) {
            Entry::Occupied(_) => Err(LoweringError::RegistrationConflict(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(constructor);
                Ok(())
            }
        }
    }

    /// A new instance for `name`; instances are never cached.
    pub fn get<'a>(&self, name: &str, ctx: &'a LoweringContext<'a>) -> LoweringResult<Box<dyn FunctionLowering + 'a>> {
        self.try_get(name, ctx)
            .ok_or_else(|| LoweringError::UnknownFunction(name.to_string()))
    }

    pub fn try_get<'a>(&self, name: &str, ctx: &'a LoweringContext<'a>) -> Option<Box<dyn FunctionLowering + 'a>> {
        self.by_name.get(name).map(|constructor| constructor(ctx))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn list(&self) -> Vec<String> {
        let mut v: Vec<_> = self.by_name.keys().cloned().collect();
        v.sort();
        v
    }

    pub fn default_registry() -> LoweringResult<Self> {
        let mut registry = Self::new();
        registry.register(CollectListLowering::NAME, create_collect_list)?;
        registry.register(CollectSetLowering::NAME, create_collect_set)?;
        info!(lowerings = ?registry.list(), "registered function lowerings");
        Ok(registry)
    }

    /// Process-wide registry with the built-in lowerings, built on first use.
    pub fn global() -> LoweringResult<&'static LoweringRegistry> {
        GLOBAL.as_ref().map_err(Clone::clone)
    }
}
