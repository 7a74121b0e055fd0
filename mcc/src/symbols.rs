use crate::error::Error;
use crate::grammer::ast::{DataType, Param};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: DataType,
    /// Element count when declared as an array
    pub array: Option<usize>,
}

impl Variable {
    /// Bytes per element
    pub fn elem_size(&self) -> u32 {
        match self.ty {
            DataType::Char => 1,
            _ => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSig {
    pub name: String,
    pub return_type: DataType,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbolStats {
    pub total_symbols: usize,
    pub total_functions: usize,
}

/// Serializable snapshot of a table
#[derive(Debug, Clone, Serialize)]
pub struct SymbolExport {
    pub variables: Vec<Variable>,
    pub functions: Vec<FunctionSig>,
    pub stats: SymbolStats,
}

/// One flat namespace for every variable plus the function signatures
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolTable {
    pub variables: IndexMap<String, Variable>,
    pub functions: IndexMap<String, FunctionSig>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redefinition keeps the first declaration
    pub fn define_variable(&mut self, name: &str, ty: DataType, array: Option<usize>) {
        if self.variables.contains_key(name) {
            log::debug!("variable '{}' already defined, keeping the first", name);
            return;
        }
        let var = Variable {
            name: name.to_string(),
            ty,
            array,
        };
        self.variables.insert(name.to_string(), var);
    }

    pub fn lookup(&self, name: &str) -> Result<&Variable, Error> {
        self.variables
            .get(name)
            .ok_or_else(|| Error::UndefinedVariable(name.to_string()))
    }

    pub fn define_function(&mut self, name: &str, return_type: DataType, params: &[Param]) {
        if self.functions.contains_key(name) {
            return;
        }
        let sig = FunctionSig {
            name: name.to_string(),
            return_type,
            params: params.to_vec(),
        };
        self.functions.insert(name.to_string(), sig);
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionSig> {
        self.functions.get(name)
    }

    pub fn export(&self) -> SymbolExport {
        SymbolExport {
            variables: self.variables.values().cloned().collect(),
            functions: self.functions.values().cloned().collect(),
            stats: self.stats(),
        }
    }

    pub fn stats(&self) -> SymbolStats {
        SymbolStats {
            total_symbols: self.variables.len(),
            total_functions: self.functions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_definition_wins() {
        let mut table = SymbolTable::new();
        table.define_variable("x", DataType::Int, None);
        table.define_variable("x", DataType::Char, Some(3));
        let x = table.lookup("x").unwrap();
        assert_eq!(x.ty, DataType::Int);
        assert_eq!(x.array, None);
        assert_eq!(table.stats().total_symbols, 1);
    }

    #[test]
    fn undefined_variable() {
        let table = SymbolTable::new();
        assert_eq!(
            table.lookup("y").unwrap_err().to_string(),
            "Undefined variable 'y'"
        );
    }
}
