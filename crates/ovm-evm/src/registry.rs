use alloy_primitives::{keccak256, map::HashMap, Selector};

use crate::{
    constants::{METHOD_PREFIX, METHOD_SUFFIX},
    RegistryError,
};

/// Computes the selector of an OVM method: the first 4 bytes of
/// `keccak256("ovm" + method_name + "()")`.
pub fn compute_selector(method_name: &str) -> Selector {
    let signature = [METHOD_PREFIX, method_name, METHOD_SUFFIX].concat();
    Selector::from_slice(&keccak256(signature.as_bytes())[..4])
}

/// The native operations served by the execution manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum OvmOperation {
    /// Caller-scoped storage read, `ovmSLOAD()`.
    #[display("SLOAD")]
    SLoad,
    /// Caller-scoped storage write, `ovmSSTORE()`.
    #[display("SSTORE")]
    SStore,
    /// Nonce-addressed creation on behalf of the active contract, `ovmCREATE()`.
    #[display("CREATE")]
    Create,
    /// Salt-addressed creation, `ovmCREATE2()`.
    #[display("CREATE2")]
    Create2,
    /// Call forwarded from the manager address, `ovmCALL()`.
    #[display("CALL")]
    Call,
}

impl OvmOperation {
    /// All operations, in registration order.
    pub const ALL: [Self; 5] = [Self::SLoad, Self::SStore, Self::Create, Self::Create2, Self::Call];

    /// The method name hashed into the selector, without the `ovm` prefix.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SLoad => "SLOAD",
            Self::SStore => "SSTORE",
            Self::Create => "CREATE",
            Self::Create2 => "CREATE2",
            Self::Call => "CALL",
        }
    }

    /// The selector routing a call to this operation.
    pub fn selector(self) -> Selector {
        compute_selector(self.name())
    }
}

/// Maps selectors to [`OvmOperation`]s. Built once at startup and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationRegistry {
    operations: HashMap<Selector, OvmOperation>,
}

impl OperationRegistry {
    /// Builds a registry from the given operations.
    ///
    /// Fails if an operation is given twice or if two operations hash to the same selector.
    pub fn new(operations: impl IntoIterator<Item = OvmOperation>) -> Result<Self, RegistryError> {
        let mut registry = Self { operations: HashMap::default() };
        for operation in operations {
            registry.insert(operation.selector(), operation)?;
        }
        Ok(registry)
    }

    fn insert(&mut self, selector: Selector, operation: OvmOperation) -> Result<(), RegistryError> {
        match self.operations.get(&selector) {
            Some(&existing) if existing == operation => {
                Err(RegistryError::DuplicateOperation(operation))
            }
            Some(&existing) => {
                Err(RegistryError::SelectorCollision { selector, existing, operation })
            }
            None => {
                self.operations.insert(selector, operation);
                Ok(())
            }
        }
    }

    /// Returns the operation registered for `selector`.
    #[inline]
    pub fn get(&self, selector: &Selector) -> Option<OvmOperation> {
        self.operations.get(selector).copied()
    }

    /// Returns `true` if `selector` is registered.
    #[inline]
    pub fn contains(&self, selector: &Selector) -> bool {
        self.operations.contains_key(selector)
    }

    /// Iterates over the registered selectors and operations in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Selector, OvmOperation)> + '_ {
        self.operations.iter().map(|(selector, operation)| (*selector, *operation))
    }

    /// The number of registered operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if no operation is registered.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for OperationRegistry {
    /// A registry holding every [`OvmOperation`].
    fn default() -> Self {
        let mut registry = Self { operations: HashMap::default() };
        for operation in OvmOperation::ALL {
            registry.operations.insert(operation.selector(), operation);
        }
        registry
    }
}
