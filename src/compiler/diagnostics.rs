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

//! Aggregated per-document and per-type diagnostics.
//!
//! Failures below the run level are isolated: the failing document,
//! namespace or type is excluded and reported here while the rest of
//! the corpus continues through the pipeline. The final report
//! enumerates every exclusion and its reason.

use crate::compiler::Family;
use crate::compiler::QualifiedName;
use crate::compiler::Version;
use crate::edmx::PropertyName;
use crate::edmx::ValidateError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// One isolated failure.
#[derive(Debug)]
pub enum Diagnostic {
    /// A document failed to parse; the rest of the corpus continues.
    Parse {
        source_name: String,
        error: ValidateError,
    },
    /// Two documents declare the same namespace version with
    /// incompatible definitions; the whole family is excluded.
    VersionConflict {
        name: QualifiedName,
        version: Option<Version>,
        property: PropertyName,
    },
    /// Inheritance cycle; every type on the path is excluded.
    UnsupportedCycle { path: Vec<QualifiedName> },
    /// A referenced namespace could not be obtained; the referencing
    /// property degrades to an opaque placeholder.
    UnresolvedReference {
        family: Family,
        referrer: QualifiedName,
        property: Option<PropertyName>,
    },
    /// A type is excluded because its base type could not be resolved.
    UnresolvedBaseType {
        name: QualifiedName,
        base: QualifiedName,
    },
    /// A type is excluded because its base type was excluded.
    BaseTypeExcluded {
        name: QualifiedName,
        base: QualifiedName,
    },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Parse { source_name, error } => {
                write!(f, "document {source_name} failed to parse: {error}")
            }
            Self::VersionConflict {
                name,
                version,
                property,
            } => {
                write!(f, "conflicting declarations of {name}")?;
                if let Some(v) = version {
                    write!(f, " {v}")?;
                }
                write!(
                    f,
                    ": property {property} declared with different types; namespace excluded"
                )
            }
            Self::UnsupportedCycle { path } => {
                write!(f, "inheritance cycle cannot be translated: ")?;
                let mut iter = path.iter();
                if let Some(first) = iter.next() {
                    write!(f, "{first}")?;
                    for name in iter {
                        write!(f, " -> {name}")?;
                    }
                    write!(f, " -> {first}")?;
                }
                Ok(())
            }
            Self::UnresolvedReference {
                family,
                referrer,
                property,
            } => {
                write!(f, "namespace {family} could not be resolved")?;
                match property {
                    Some(p) => write!(f, "; {referrer}.{p} emitted as an opaque placeholder"),
                    None => write!(f, "; referenced by {referrer}"),
                }
            }
            Self::UnresolvedBaseType { name, base } => {
                write!(f, "{name} excluded: base type {base} could not be resolved")
            }
            Self::BaseTypeExcluded { name, base } => {
                write!(f, "{name} excluded: base type {base} was excluded")
            }
        }
    }
}

/// Ordered collection of diagnostics for one translation run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, d: Diagnostic) {
        self.items.push(d);
    }

    pub fn append(&mut self, mut other: Diagnostics) {
        self.items.append(&mut other.items);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}
