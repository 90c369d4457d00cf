//! Built-in aggregate functions

pub mod math;

use crate::evaluator::FormulaValue;
use std::collections::HashMap;

/// Function implementation signature
///
/// Functions receive the numeric entries of their flattened arguments; errors and
/// non-numeric values have already been handled by the evaluator.
pub type FunctionImpl = fn(&[f64]) -> FormulaValue;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Implementation
    pub implementation: FunctionImpl,
}

/// Function registry
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_math_functions();

        registry
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    fn register_math_functions(&mut self) {
        self.register(FunctionDef {
            name: "SUM",
            implementation: math::fn_sum,
        });

        self.register(FunctionDef {
            name: "AVERAGE",
            implementation: math::fn_average,
        });

        self.register(FunctionDef {
            name: "MIN",
            implementation: math::fn_min,
        });

        self.register(FunctionDef {
            name: "MAX",
            implementation: math::fn_max,
        });

        self.register(FunctionDef {
            name: "COUNT",
            implementation: math::fn_count,
        });
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
