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
use crate::edmx::property::NavigationProperty;
use crate::edmx::property::Property;
use crate::edmx::property::StructuralProperty;
use crate::edmx::LocalTypeName;
use crate::edmx::QualifiedName;
use crate::edmx::ValidateError;
use serde::Deserialize;

/// 9.1 Element edm:ComplexType
#[derive(Debug, Deserialize)]
pub struct DeComplexType {
    /// 9.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: LocalTypeName,
    /// 9.1.2 Attribute `BaseType`
    #[serde(rename = "@BaseType")]
    pub base_type: Option<QualifiedName>,
    /// 9.1.3 Attribute `Abstract`
    #[serde(rename = "@Abstract")]
    pub r#abstract: Option<bool>,
    /// Items of edm:ComplexType, in declaration order.
    #[serde(rename = "$value", default)]
    pub items: Vec<DeComplexTypeItem>,
}

/// Items of edm:ComplexType
#[derive(Debug, Deserialize)]
pub enum DeComplexTypeItem {
    #[serde(rename = "Property")]
    StructuralProperty(StructuralProperty),
    NavigationProperty(NavigationProperty),
    Annotation(Annotation),
}

/// Validated edm:ComplexType
#[derive(Debug)]
pub struct ComplexType {
    pub name: LocalTypeName,
    pub base_type: Option<QualifiedName>,
    pub is_abstract: bool,
    pub properties: Vec<Property>,
    pub annotations: Vec<Annotation>,
}

impl DeComplexType {
    /// # Errors
    ///
    /// - `ValidateError::ComplexType` with details of the failed item.
    pub fn validate(self) -> Result<ComplexType, ValidateError> {
        let (properties, annotations) =
            self.items
                .into_iter()
                .fold((Vec::new(), Vec::new()), |(mut ps, mut anns), v| {
                    match v {
                        DeComplexTypeItem::StructuralProperty(p) => ps.push(p.into()),
                        DeComplexTypeItem::NavigationProperty(p) => ps.push(p.into()),
                        DeComplexTypeItem::Annotation(a) => anns.push(a),
                    }
                    (ps, anns)
                });
        if let Some(dup) = crate::edmx::property::first_duplicate(&properties) {
            return Err(ValidateError::ComplexType(
                self.name.into_inner(),
                Box::new(ValidateError::DuplicatePropertyName(dup)),
            ));
        }
        Ok(ComplexType {
            name: self.name,
            base_type: self.base_type,
            is_abstract: self.r#abstract.unwrap_or(false),
            properties,
            annotations,
        })
    }
}
