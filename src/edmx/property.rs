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

use crate::edmx::annotation::Annotation;
use crate::edmx::PropertyName;
use crate::edmx::TypeName;
use serde::Deserialize;

/// 6.1 Element edm:Property
#[derive(Debug, Deserialize)]
pub struct StructuralProperty {
    /// 6.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: PropertyName,
    /// 6.1.2 Attribute `Type`
    #[serde(rename = "@Type")]
    pub ptype: TypeName,
    /// 6.2.1 Attribute `Nullable`
    #[serde(rename = "@Nullable")]
    pub nullable: Option<bool>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<Annotation>,
}

/// 7.1 Element edm:NavigationProperty
#[derive(Debug, Deserialize)]
pub struct NavigationProperty {
    /// 7.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: PropertyName,
    /// 7.1.2 Attribute `Type`
    #[serde(rename = "@Type")]
    pub ptype: TypeName,
    /// 7.1.3 Attribute `Nullable`
    #[serde(rename = "@Nullable")]
    pub nullable: Option<bool>,
    /// 7.1.5 Attribute `ContainsTarget`
    #[serde(rename = "@ContainsTarget")]
    pub contains_target: Option<bool>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<Annotation>,
}

/// Validated property of an entity or complex type.
#[derive(Debug)]
pub struct Property {
    /// Name of the property.
    pub name: PropertyName,
    /// Kind-specific attributes.
    pub attrs: PropertyAttrs,
}

/// Attributes of the two property kinds.
#[derive(Debug)]
pub enum PropertyAttrs {
    /// 6 Structural property.
    Structural(StructuralProperty),
    /// 7 Navigation property.
    Navigation(NavigationProperty),
}

impl From<StructuralProperty> for Property {
    fn from(p: StructuralProperty) -> Self {
        Self {
            name: p.name.clone(),
            attrs: PropertyAttrs::Structural(p),
        }
    }
}

impl From<NavigationProperty> for Property {
    fn from(p: NavigationProperty) -> Self {
        Self {
            name: p.name.clone(),
            attrs: PropertyAttrs::Navigation(p),
        }
    }
}

/// First property name declared more than once, if any.
#[must_use]
pub fn first_duplicate(properties: &[Property]) -> Option<PropertyName> {
    let mut seen = std::collections::HashSet::new();
    properties
        .iter()
        .find(|p| !seen.insert(&p.name))
        .map(|p| p.name.clone())
}
