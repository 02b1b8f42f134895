//! Operator token lookup.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::{CalcError, Result};
use crate::operation::{BuiltinOperation, Operation};

/// Maps operator tokens to operations.
///
/// Tokens are case-insensitive and stored lowercase. Registering a token that
/// already exists replaces its binding and leaves every other token intact.
#[derive(Clone, Default)]
pub struct OperationRegistry {
    operations: BTreeMap<String, Rc<dyn Operation>>,
}

impl OperationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every [`BuiltinOperation`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for op in BuiltinOperation::ALL {
            registry.register(op.token(), op);
        }
        registry
    }

    /// Binds `token` to `operation`, returning the previous binding if any.
    pub fn register<O>(&mut self, token: &str, operation: O) -> Option<Rc<dyn Operation>>
    where
        O: Operation + 'static,
    {
        self.operations.insert(normalize(token), Rc::new(operation))
    }

    /// Looks up the operation for `token`.
    pub fn resolve(&self, token: &str) -> Result<Rc<dyn Operation>> {
        let key = normalize(token);
        self.operations
            .get(&key)
            .cloned()
            .ok_or_else(|| CalcError::UnknownOperator {
                token: token.trim().to_string(),
                available: self.tokens(),
            })
    }

    /// Returns true when `token` is registered.
    pub fn contains(&self, token: &str) -> bool {
        self.operations.contains_key(&normalize(token))
    }

    /// Registered tokens in sorted order.
    pub fn tokens(&self) -> Vec<String> {
        self.operations.keys().cloned().collect()
    }

    /// Iterates `(token, operation)` pairs in token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Operation)> {
        self.operations
            .iter()
            .map(|(token, op)| (token.as_str(), op.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("tokens", &self.tokens())
            .finish()
    }
}

fn normalize(token: &str) -> String {
    token.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcErrorKind;
    use crate::operation::FnOperation;

    #[test]
    fn test_builtins_resolve() {
        let registry = OperationRegistry::with_builtins();
        assert_eq!(registry.len(), 10);
        let op = registry.resolve("multiply").unwrap();
        assert_eq!(op.execute(7.0, 6.0).unwrap(), 42.0);
        assert_eq!(op.symbol(), "*");
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = OperationRegistry::with_builtins();
        assert!(registry.resolve("ADD").is_ok());
        assert!(registry.resolve(" Int_Divide ").is_ok());
    }

    #[test]
    fn test_unknown_token() {
        let registry = OperationRegistry::with_builtins();
        let err = registry.resolve("sqrt").err().unwrap();
        assert_eq!(err.kind(), CalcErrorKind::UnknownOperator);
        match err {
            CalcError::UnknownOperator { token, available } => {
                assert_eq!(token, "sqrt");
                assert!(available.contains(&"abs_diff".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_register_overwrites_only_target() {
        let mut registry = OperationRegistry::with_builtins();
        let previous = registry.register(
            "add",
            FnOperation::new("Saturating add", "+", |a: f64, b: f64| Ok((a + b).min(100.0))),
        );
        assert!(previous.is_some());
        assert_eq!(registry.resolve("add").unwrap().execute(90.0, 20.0).unwrap(), 100.0);
        assert_eq!(registry.resolve("subtract").unwrap().execute(90.0, 20.0).unwrap(), 70.0);
        assert_eq!(registry.len(), 10);
    }

    #[test]
    fn test_register_new_token() {
        let mut registry = OperationRegistry::new();
        assert!(registry.is_empty());
        let maximum = FnOperation::new("Maximum", "max", |a: f64, b: f64| Ok(a.max(b)));
        let previous = registry.register("max", maximum);
        assert!(previous.is_none());
        assert!(registry.contains("MAX"));
        assert_eq!(registry.tokens(), vec!["max".to_string()]);
    }
}
