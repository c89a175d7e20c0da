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

//! EDMX (CSDL XML) parser and validator.
//!
//! Raw documents are deserialized with quick-xml into `De*` mirror
//! structures and then validated into clean structures. Declaration
//! order of schema items, properties and enum members is preserved
//! verbatim: it is semantically significant and drives field numbering
//! in the emitted output.

/// 17 Attribute Values
pub mod names;

/// 3.1 Element edmx:Edmx
pub mod edmx_root;

/// 3.2 Element edmx:DataServices
pub mod data_services;

/// 3.3 Element edmx:Reference / 3.4 Element edmx:Include
pub mod reference;

/// 5 Schema
pub mod schema;

/// 6 Structural Property / 7 Navigation Property
pub mod property;

/// 8 Entity Type
pub mod entity_type;

/// 9 Complex Type
pub mod complex_type;

/// 10 Enumeration Type
pub mod enum_type;

/// 14.3 Element edm:Annotation
pub mod annotation;

use annotation::Annotation;
use quick_xml::DeError;
use tagged_types::TaggedType;

pub use names::Namespace;
pub use names::QualifiedName;
pub use names::SimpleIdentifier;
pub use names::TypeName;

/// Local (unqualified) name of a type declared by a schema.
pub type LocalTypeName = TaggedType<SimpleIdentifier, LocalTypeNameTag>;
#[doc(hidden)]
#[derive(tagged_types::Tag)]
#[implement(Clone, Hash, PartialEq, Eq)]
#[transparent(Debug, Display, Deserialize)]
#[capability(inner_access)]
pub enum LocalTypeNameTag {}

/// Name of a structural or navigation property.
pub type PropertyName = SimpleIdentifier;

/// EDMX validation errors.
#[derive(Debug)]
pub enum ValidateError {
    /// XML deserialization error.
    XmlDeserialize(DeError),
    /// Invalid number of `DataServices` elements.
    WrongDataServicesNumber,
    /// Two types with the same name declared in one schema.
    DuplicateTypeName(SimpleIdentifier),
    /// Two properties with the same name declared in one type.
    DuplicatePropertyName(PropertyName),
    /// Schema validation error.
    Schema(Namespace, Box<ValidateError>),
    /// `EntityType` validation error.
    EntityType(SimpleIdentifier, Box<ValidateError>),
    /// `ComplexType` validation error.
    ComplexType(SimpleIdentifier, Box<ValidateError>),
}

impl std::fmt::Display for ValidateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XmlDeserialize(err) => write!(f, "XML deserialization error: {err}"),
            Self::WrongDataServicesNumber => {
                "document must contain a single DataServices element".fmt(f)
            }
            Self::DuplicateTypeName(name) => write!(f, "duplicate type name: {name}"),
            Self::DuplicatePropertyName(name) => write!(f, "duplicate property name: {name}"),
            Self::Schema(ns, err) => write!(f, "while validating schema {ns}: {err}"),
            Self::EntityType(name, err) => write!(f, "while validating entity type {name}: {err}"),
            Self::ComplexType(name, err) => {
                write!(f, "while validating complex type {name}: {err}")
            }
        }
    }
}

/// 11 Element edm:TypeDefinition
///
/// A named alias over a primitive underlying type.
#[derive(Debug, serde::Deserialize)]
pub struct TypeDefinition {
    #[serde(rename = "@Name")]
    pub name: LocalTypeName,
    #[serde(rename = "@UnderlyingType")]
    pub underlying_type: TypeName,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<Annotation>,
}

/// Reexport of the `Edmx` document root.
pub type Edmx = edmx_root::Edmx;
