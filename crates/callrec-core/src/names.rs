//! VM-style type and method names.
//!
//! Types look like `Ljava/io/File`, methods like `Ljava/io/File.exists()Z`.
//! Both are validated on construction and ordered by their identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::CONSTRUCTOR_NAMES;
use crate::errors::{CallRecError, CallRecResult};

/// Fully qualified VM type identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName(String);

impl TypeName {
    pub fn new(identifier: impl Into<String>) -> CallRecResult<Self> {
        let identifier = identifier.into();
        if identifier.is_empty() || identifier.contains(['.', '(', ')', ' ']) {
            return Err(CallRecError::InvalidName {
                name: identifier,
                reason: "type identifiers must be non-empty and free of '.', '(', ')' and spaces"
                    .to_string(),
            });
        }
        Ok(Self(identifier))
    }

    pub fn identifier(&self) -> &str {
        &self.0
    }

    /// The unqualified class name, e.g. `File` for `Ljava/io/File`.
    pub fn class_name(&self) -> &str {
        let tail = self.0.rsplit('/').next().unwrap_or(&self.0);
        if tail.len() == self.0.len() {
            tail.strip_prefix('L').unwrap_or(tail)
        } else {
            tail
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TypeName {
    type Err = CallRecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TypeName {
    type Error = CallRecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        value.0
    }
}

/// Fully qualified VM method identifier: `<type>.<name>(<params>)<return>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MethodName {
    identifier: String,
    /// Byte offset of the `.` separating declaring type and method name.
    name_start: usize,
    /// Byte offset of the `(` opening the parameter list.
    params_start: usize,
}

impl MethodName {
    pub fn new(identifier: impl Into<String>) -> CallRecResult<Self> {
        let identifier = identifier.into();
        let invalid = |reason: &str| CallRecError::InvalidName {
            name: identifier.clone(),
            reason: reason.to_string(),
        };

        let params_start = identifier
            .rfind('(')
            .ok_or_else(|| invalid("missing '(' in method descriptor"))?;
        if !identifier[params_start..].contains(')') {
            return Err(invalid("missing ')' in method descriptor"));
        }
        let name_start = identifier[..params_start]
            .rfind('.')
            .ok_or_else(|| invalid("missing '.' between declaring type and method name"))?;
        if name_start == 0 {
            return Err(invalid("empty declaring type"));
        }
        if name_start + 1 == params_start {
            return Err(invalid("empty method name"));
        }

        Ok(Self {
            identifier,
            name_start,
            params_start,
        })
    }

    /// Build a method name from a declaring type and a signature such as `close()V`.
    pub fn from_parts(declaring_type: &TypeName, signature: &str) -> CallRecResult<Self> {
        Self::new(format!("{}.{}", declaring_type.identifier(), signature))
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn declaring_type(&self) -> TypeName {
        TypeName(self.identifier[..self.name_start].to_string())
    }

    /// Simple method name, e.g. `exists`.
    pub fn name(&self) -> &str {
        &self.identifier[self.name_start + 1..self.params_start]
    }

    /// Name plus descriptor, e.g. `exists()Z`.
    pub fn signature(&self) -> &str {
        &self.identifier[self.name_start + 1..]
    }

    /// Parameter and return descriptor, e.g. `()Z`.
    pub fn descriptor(&self) -> &str {
        &self.identifier[self.params_start..]
    }

    /// True for constructors, including the synthetic subtype constructor.
    pub fn is_init(&self) -> bool {
        CONSTRUCTOR_NAMES.contains(&self.name())
    }

    /// The same signature declared on another type.
    ///
    /// `Ljava/lang/String.wait()V` rebased on `Ljava/lang/Object` is
    /// `Ljava/lang/Object.wait()V`.
    pub fn rebase(&self, base: &TypeName) -> MethodName {
        let identifier = format!("{}.{}", base.identifier(), self.signature());
        let name_start = base.identifier().len();
        let params_start = name_start + (self.params_start - self.name_start);
        MethodName {
            identifier,
            name_start,
            params_start,
        }
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

impl FromStr for MethodName {
    type Err = CallRecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for MethodName {
    type Error = CallRecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MethodName> for String {
    fn from(value: MethodName) -> Self {
        value.identifier
    }
}
