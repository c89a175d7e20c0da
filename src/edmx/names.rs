// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Attribute value types: identifiers, namespaces and type names.

use serde::de::Error as DeError;
use serde::de::Visitor;
use serde::Deserialize;
use serde::Deserializer;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;

#[derive(Debug)]
pub enum Error {
    InvalidSimpleIdentifier(String),
    InvalidQualifiedName(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::InvalidSimpleIdentifier(id) => write!(f, "invalid simple identifier {id}"),
            Self::InvalidQualifiedName(id) => write!(f, "invalid qualified name {id}"),
        }
    }
}

/// 17.2 `SimpleIdentifier`
///
/// Starts with a letter or underscore, followed by letters, underscores
/// or digits.
#[derive(Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct SimpleIdentifier(String);

impl SimpleIdentifier {
    #[must_use]
    pub const fn inner(&self) -> &String {
        &self.0
    }
}

impl Display for SimpleIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

impl AsRef<str> for SimpleIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for SimpleIdentifier {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let valid_first = chars
            .next()
            .map(|first| first.is_alphabetic() || first == '_')
            .unwrap_or(false);
        if valid_first && chars.all(|c| c.is_alphanumeric() || c == '_') {
            Ok(Self(s.into()))
        } else {
            Err(Error::InvalidSimpleIdentifier(s.into()))
        }
    }
}

impl<'de> Deserialize<'de> for SimpleIdentifier {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        struct SiVisitor {}
        impl Visitor<'_> for SiVisitor {
            type Value = SimpleIdentifier;

            fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
                formatter.write_str("SimpleIdentifier string")
            }
            fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(DeError::custom)
            }
        }

        de.deserialize_string(SiVisitor {})
    }
}

/// 17.1 `Namespace`
///
/// Dot-separated sequence of simple identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Namespace {
    pub ids: Vec<SimpleIdentifier>,
}

impl Namespace {
    /// Check whether the namespace is the built-in `Edm` primitive
    /// namespace.
    #[must_use]
    pub fn is_edm(&self) -> bool {
        self.ids.len() == 1 && self.ids[0].inner() == "Edm"
    }
}

impl FromStr for Namespace {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            ids: s
                .split('.')
                .map(SimpleIdentifier::from_str)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut iter = self.ids.iter();
        if let Some(v) = iter.next() {
            v.fmt(f)?;
        }
        for v in iter {
            write!(f, ".{v}")?;
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        struct NsVisitor {}
        impl Visitor<'_> for NsVisitor {
            type Value = Namespace;

            fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
                formatter.write_str("Namespace string")
            }
            fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(DeError::custom)
            }
        }

        de.deserialize_string(NsVisitor {})
    }
}

/// 17.3 `QualifiedName`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub namespace: Namespace,
    pub name: SimpleIdentifier,
}

impl FromStr for QualifiedName {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ids = s
            .split('.')
            .map(SimpleIdentifier::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidQualifiedName(s.into()))?;
        let name = ids
            .pop()
            .filter(|_| !ids.is_empty())
            .ok_or_else(|| Error::InvalidQualifiedName(s.into()))?;
        Ok(Self {
            namespace: Namespace { ids },
            name,
        })
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

impl<'de> Deserialize<'de> for QualifiedName {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        struct QnVisitor {}
        impl Visitor<'_> for QnVisitor {
            type Value = QualifiedName;

            fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
                formatter.write_str("QualifiedName string")
            }
            fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(DeError::custom)
            }
        }

        de.deserialize_string(QnVisitor {})
    }
}

/// 17.4 `TypeName`
///
/// Either a single qualified type name or `Collection(...)` of one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeName {
    One(QualifiedName),
    CollectionOf(QualifiedName),
}

impl TypeName {
    #[must_use]
    pub const fn qualified_name(&self) -> &QualifiedName {
        match self {
            Self::One(v) | Self::CollectionOf(v) => v,
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::CollectionOf(_))
    }
}

impl FromStr for TypeName {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s
            .strip_prefix("Collection(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(element) => Ok(Self::CollectionOf(element.parse()?)),
            None => Ok(Self::One(s.parse()?)),
        }
    }
}

impl<'de> Deserialize<'de> for TypeName {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        struct TnVisitor {}
        impl Visitor<'_> for TnVisitor {
            type Value = TypeName;

            fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
                formatter.write_str("type name string")
            }
            fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(DeError::custom)
            }
        }

        de.deserialize_string(TnVisitor {})
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::from_str as json_from_str;

    #[test]
    fn simple_identifier_accepts_valid() {
        for case in &["Name", "name", "_name", "Name123", "v1_22_0", "a"] {
            assert!(
                SimpleIdentifier::from_str(case).is_ok(),
                "rejected valid identifier {}",
                case
            );
        }
    }

    #[test]
    fn simple_identifier_rejects_invalid() {
        for case in &["123Name", "Na-me", "Na.me", "Na me", "", "$Name"] {
            assert!(
                SimpleIdentifier::from_str(case).is_err(),
                "accepted invalid identifier {}",
                case
            );
        }
    }

    #[test]
    fn namespace_roundtrip() {
        for case in &["Chassis", "Chassis.v1_2_0", "Org.OData.Core.V1"] {
            let ns = Namespace::from_str(case).unwrap();
            assert_eq!(ns.to_string(), *case);
        }
        assert!(Namespace::from_str("Chassis..v1").is_err());
        assert!(Namespace::from_str(".Chassis").is_err());
    }

    #[test]
    fn namespace_edm_detection() {
        assert!(Namespace::from_str("Edm").unwrap().is_edm());
        assert!(!Namespace::from_str("Edm.Geo").unwrap().is_edm());
        assert!(!Namespace::from_str("Chassis").unwrap().is_edm());
    }

    #[test]
    fn qualified_name_splits_last_segment() {
        let qn = QualifiedName::from_str("Chassis.v1_2_0.Chassis").unwrap();
        assert_eq!(qn.name.inner(), "Chassis");
        assert_eq!(qn.namespace.ids.len(), 2);
        assert!(QualifiedName::from_str("Bare").is_err());
        assert!(QualifiedName::from_str("Trailing.").is_err());
    }

    #[test]
    fn type_name_collection_syntax() {
        assert!(matches!(
            TypeName::from_str("Edm.String").unwrap(),
            TypeName::One(_)
        ));
        let tn = TypeName::from_str("Collection(Resource.v1_0_0.Location)").unwrap();
        assert!(tn.is_collection());
        assert_eq!(tn.qualified_name().name.inner(), "Location");
        assert!(TypeName::from_str("Collection()").is_err());
        assert!(TypeName::from_str("Collection(Edm.String").is_err());
    }

    #[test]
    fn type_name_deserialize() {
        let tn: TypeName = json_from_str(r#""Collection(Edm.Int64)""#).unwrap();
        assert!(tn.is_collection());
        let bad: Result<TypeName, _> = json_from_str(r#""Not..AName""#);
        assert!(bad.is_err());
    }
}
