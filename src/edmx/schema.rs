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
use crate::edmx::complex_type::ComplexType;
use crate::edmx::complex_type::DeComplexType;
use crate::edmx::entity_type::DeEntityType;
use crate::edmx::entity_type::EntityType;
use crate::edmx::enum_type::DeEnumType;
use crate::edmx::enum_type::EnumType;
use crate::edmx::Namespace;
use crate::edmx::SimpleIdentifier;
use crate::edmx::TypeDefinition;
use crate::edmx::ValidateError;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashSet;

/// 5.1 Element edm:Schema
#[derive(Debug, Deserialize)]
pub struct DeSchema {
    /// 5.1.1 Attribute Namespace
    #[serde(rename = "@Namespace")]
    pub namespace: Namespace,
    /// 5.1.2 Attribute Alias
    #[serde(rename = "@Alias")]
    pub alias: Option<Namespace>,
    /// Child elements of edm:Schema, in declaration order.
    #[serde(rename = "$value", default)]
    pub items: Vec<DeSchemaItem>,
}

/// Child item of edm:Schema.
///
/// Constructs outside the type set (terms, entity containers, actions,
/// annotations) are accepted and discarded: they carry no type shape.
#[derive(Debug, Deserialize)]
pub enum DeSchemaItem {
    EntityType(DeEntityType),
    ComplexType(DeComplexType),
    EnumType(DeEnumType),
    TypeDefinition(TypeDefinition),
    EntityContainer(IgnoredAny),
    Action(IgnoredAny),
    Function(IgnoredAny),
    Term(IgnoredAny),
    Annotation(IgnoredAny),
}

/// Validated type declaration of a schema.
#[derive(Debug)]
pub enum SchemaItem {
    EntityType(EntityType),
    ComplexType(ComplexType),
    EnumType(EnumType),
    TypeDefinition(TypeDefinition),
}

impl SchemaItem {
    #[must_use]
    pub fn name(&self) -> &SimpleIdentifier {
        match self {
            Self::EntityType(v) => v.name.inner(),
            Self::ComplexType(v) => v.name.inner(),
            Self::EnumType(v) => v.name.inner(),
            Self::TypeDefinition(v) => v.name.inner(),
        }
    }
}

/// Validated edm:Schema.
///
/// Items keep their declaration order; two declarations with the same
/// name in one schema are rejected.
#[derive(Debug)]
pub struct Schema {
    pub namespace: Namespace,
    pub alias: Option<Namespace>,
    pub items: Vec<SchemaItem>,
}

impl DeSchema {
    /// # Errors
    ///
    /// Returns an error if any of the items fails to validate or a
    /// type name is declared twice.
    pub fn validate(self) -> Result<Schema, ValidateError> {
        let namespace = self.namespace;
        let items = self
            .items
            .into_iter()
            .filter_map(|v| match v {
                DeSchemaItem::EntityType(v) => Some(v.validate().map(SchemaItem::EntityType)),
                DeSchemaItem::ComplexType(v) => Some(v.validate().map(SchemaItem::ComplexType)),
                DeSchemaItem::EnumType(v) => Some(Ok(SchemaItem::EnumType(v.validate()))),
                DeSchemaItem::TypeDefinition(v) => Some(Ok(SchemaItem::TypeDefinition(v))),
                DeSchemaItem::EntityContainer(_)
                | DeSchemaItem::Action(_)
                | DeSchemaItem::Function(_)
                | DeSchemaItem::Term(_)
                | DeSchemaItem::Annotation(_) => None,
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ValidateError::Schema(namespace.clone(), Box::new(e)))?;

        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.name().clone()) {
                return Err(ValidateError::Schema(
                    namespace,
                    Box::new(ValidateError::DuplicateTypeName(item.name().clone())),
                ));
            }
        }

        Ok(Schema {
            namespace,
            alias: self.alias,
            items,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::edmx::Edmx;

    #[test]
    fn item_order_is_preserved() {
        let data = r#"
           <edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="Power.v1_0_0">
                 <ComplexType Name="Zeta"/>
                 <EnumType Name="Alpha"/>
                 <ComplexType Name="Mid"/>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        let edmx = Edmx::parse(data).unwrap();
        let names: Vec<_> = edmx.data_services.schemas[0]
            .items
            .iter()
            .map(|i| i.name().inner().clone())
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn duplicate_names_rejected() {
        let data = r#"
           <edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="Power.v1_0_0">
                 <ComplexType Name="Twice"/>
                 <EnumType Name="Twice"/>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        assert!(Edmx::parse(data).is_err());
    }

    #[test]
    fn foreign_constructs_are_skipped() {
        let data = r#"
           <edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="Org.OData.Core.V1" Alias="Core">
                 <Term Name="Description" Type="Edm.String"/>
                 <EnumType Name="Kept"/>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        let edmx = Edmx::parse(data).unwrap();
        assert_eq!(edmx.data_services.schemas[0].items.len(), 1);
    }
}
