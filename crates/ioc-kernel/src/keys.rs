//! Dependency keys with built-in meaning.

pub const REGISTER: &str = "IoC.Register";
pub const UNREGISTER: &str = "IoC.Unregister";
pub const SCOPE_CREATE: &str = "IoC.Scope.Create";
pub const SCOPE_CREATE_EMPTY: &str = "IoC.Scope.Create.Empty";
pub const SCOPE_CURRENT: &str = "IoC.Scope.Current";
pub const SCOPE_CURRENT_SET: &str = "IoC.Scope.Current.Set";
pub const SCOPE_CURRENT_CLEAR: &str = "IoC.Scope.Current.Clear";
pub const SCOPE_PARENT: &str = "IoC.Scope.Parent";
pub const ADAPTER: &str = "Adapter";

/// Exactly the keys installed into a fresh root scope.
pub const BUILTIN_KEYS: [&str; 9] = [
    REGISTER,
    UNREGISTER,
    SCOPE_CREATE,
    SCOPE_CREATE_EMPTY,
    SCOPE_CURRENT,
    SCOPE_CURRENT_SET,
    SCOPE_CURRENT_CLEAR,
    SCOPE_PARENT,
    ADAPTER,
];

/// Which side of an attribute an accessor key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessor {
    Get,
    Set,
}

impl Accessor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
        }
    }
}

/// `<contract>:<attribute-lowercased>.<get|set>`
pub fn accessor_key(contract: &str, attribute: &str, accessor: Accessor) -> String {
    format!(
        "{contract}:{}.{}",
        attribute.to_lowercase(),
        accessor.as_str()
    )
}

pub fn is_builtin(key: &str) -> bool {
    BUILTIN_KEYS.contains(&key)
}
