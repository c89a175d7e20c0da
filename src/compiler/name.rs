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

//! Namespace families and qualified type names.
//!
//! A family is a namespace with its trailing version segment removed:
//! `Chassis.v1_2_0` and `Chassis.v1_9_0` belong to the family
//! `Chassis`. All merge and resolution bookkeeping is keyed by family,
//! never by the raw versioned namespace.

use crate::compiler::Version;
use crate::edmx::Namespace;
use crate::edmx::SimpleIdentifier;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Namespace family: the version-independent part of a namespace.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Family {
    pub ids: Vec<SimpleIdentifier>,
}

impl Family {
    /// Split a namespace into its family and release version. The
    /// version segment must be the last one and cannot be the only
    /// one: a namespace that consists of a single version-looking
    /// segment is a family of its own.
    #[must_use]
    pub fn split(ns: &Namespace) -> (Self, Option<Version>) {
        if ns.ids.len() > 1 {
            if let Some(last) = ns.ids.last() {
                if let Some(version) = Version::parse_segment(last) {
                    return (
                        Self {
                            ids: ns.ids[..ns.ids.len() - 1].to_vec(),
                        },
                        Some(version),
                    );
                }
            }
        }
        (Self { ids: ns.ids.clone() }, None)
    }
}

impl Display for Family {
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

/// Name of a type, qualified by its namespace family.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    pub family: Family,
    pub name: SimpleIdentifier,
}

impl QualifiedName {
    #[must_use]
    pub const fn new(family: Family, name: SimpleIdentifier) -> Self {
        Self { family, name }
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.family, self.name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn splits_versioned_namespaces() {
        let (family, version) = Family::split(&Namespace::from_str("Chassis.v1_9_0").unwrap());
        assert_eq!(family.to_string(), "Chassis");
        assert_eq!(version, Some(Version::new(1, 9, 0)));
    }

    #[test]
    fn unversioned_namespace_is_its_own_family() {
        let (family, version) = Family::split(&Namespace::from_str("Resource").unwrap());
        assert_eq!(family.to_string(), "Resource");
        assert_eq!(version, None);

        // OData vocabularies use an uppercase V segment that is not a
        // release marker.
        let (family, version) =
            Family::split(&Namespace::from_str("Org.OData.Core.V1").unwrap());
        assert_eq!(family.to_string(), "Org.OData.Core.V1");
        assert_eq!(version, None);
    }

    #[test]
    fn qualified_name_orders_by_family_then_name() {
        let a = QualifiedName::new(
            Family::split(&Namespace::from_str("Chassis").unwrap()).0,
            SimpleIdentifier::from_str("Chassis").unwrap(),
        );
        let b = QualifiedName::new(
            Family::split(&Namespace::from_str("Thermal").unwrap()).0,
            SimpleIdentifier::from_str("Fan").unwrap(),
        );
        assert!(a < b);
        assert_eq!(a.to_string(), "Chassis.Chassis");
    }
}
