use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One artifact lookup.
///
/// Serialized as `{"pm": .., "name": .., "version": ..}`, the item shape of
/// the bulk artifact search body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageQuery {
    #[serde(rename = "pm")]
    pub package_manager: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PackageQuery {
    pub fn new(package_manager: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package_manager: package_manager.into(),
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Drops the version, leaving the v2 package reference.
    pub fn to_ref(&self) -> PackageRef {
        PackageRef::new(&self.package_manager, &self.name)
    }
}

impl fmt::Display for PackageQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package_manager, self.name)?;
        if let Some(version) = &self.version {
            write!(f, "@{}", version)?;
        }
        Ok(())
    }
}

/// Parses `pm:name` or `pm:name@version`.
///
/// The version separator is the last `@` after the first character of the
/// name, so scoped npm names like `npm:@types/node@20.1.0` work.
impl FromStr for PackageQuery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pm, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("Invalid package '{}'. Use pm:name[@version]", s))?;

        if pm.is_empty() || rest.is_empty() {
            return Err(format!("Invalid package '{}'. Use pm:name[@version]", s));
        }

        let offset = usize::from(rest.starts_with('@'));
        let query = match rest[offset..].rfind('@') {
            Some(idx) => {
                let (name, version) = rest.split_at(offset + idx);
                let query = PackageQuery::new(pm, name);
                match &version[1..] {
                    "" => query,
                    version => query.with_version(version),
                }
            }
            None => PackageQuery::new(pm, rest),
        };

        Ok(query)
    }
}

/// A package reference for the v2 package endpoint, wire form `{"pm", "name"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageRef {
    #[serde(rename = "pm")]
    pub package_manager: String,
    pub name: String,
}

impl PackageRef {
    pub fn new(package_manager: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package_manager: package_manager.into(),
            name: name.into(),
        }
    }
}

impl FromStr for PackageRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((pm, name)) if !pm.is_empty() && !name.is_empty() => Ok(PackageRef::new(pm, name)),
            _ => Err(format!("Invalid package '{}'. Use pm:name", s)),
        }
    }
}
