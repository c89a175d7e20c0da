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
use serde::de::IgnoredAny;
use serde::Deserialize;

/// 8.1 Element edm:EntityType
#[derive(Debug, Deserialize)]
pub struct DeEntityType {
    /// 8.1.1 Attribute Name
    #[serde(rename = "@Name")]
    pub name: LocalTypeName,
    /// 8.1.2 Attribute `BaseType`
    #[serde(rename = "@BaseType")]
    pub base_type: Option<QualifiedName>,
    /// 8.1.3 Attribute `Abstract`
    #[serde(rename = "@Abstract")]
    pub r#abstract: Option<bool>,
    /// Items of edm:EntityType, in declaration order.
    #[serde(rename = "$value", default)]
    pub items: Vec<DeEntityTypeItem>,
}

/// Items of edm:EntityType
#[derive(Debug, Deserialize)]
pub enum DeEntityTypeItem {
    /// 8.2 Element edm:Key. Keys carry no field shape.
    Key(IgnoredAny),
    #[serde(rename = "Property")]
    StructuralProperty(StructuralProperty),
    NavigationProperty(NavigationProperty),
    Annotation(Annotation),
}

/// Validated edm:EntityType
#[derive(Debug)]
pub struct EntityType {
    pub name: LocalTypeName,
    pub base_type: Option<QualifiedName>,
    pub is_abstract: bool,
    pub properties: Vec<Property>,
    pub annotations: Vec<Annotation>,
}

impl DeEntityType {
    /// # Errors
    ///
    /// - `ValidateError::EntityType` with details of the failed item.
    pub fn validate(self) -> Result<EntityType, ValidateError> {
        let (properties, annotations) =
            self.items
                .into_iter()
                .fold((Vec::new(), Vec::new()), |(mut ps, mut anns), v| {
                    match v {
                        DeEntityTypeItem::Key(_) => {}
                        DeEntityTypeItem::StructuralProperty(p) => ps.push(p.into()),
                        DeEntityTypeItem::NavigationProperty(p) => ps.push(p.into()),
                        DeEntityTypeItem::Annotation(a) => anns.push(a),
                    }
                    (ps, anns)
                });
        if let Some(dup) = crate::edmx::property::first_duplicate(&properties) {
            return Err(ValidateError::EntityType(
                self.name.into_inner(),
                Box::new(ValidateError::DuplicatePropertyName(dup)),
            ));
        }
        Ok(EntityType {
            name: self.name,
            base_type: self.base_type,
            is_abstract: self.r#abstract.unwrap_or(false),
            properties,
            annotations,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn property_order_survives_validation() {
        let data = r#"<EntityType Name="Chassis" BaseType="Resource.v1_0_0.Resource">
             <Key><PropertyRef Name="Id"/></Key>
             <Property Name="ChassisType" Type="Chassis.v1_0_0.ChassisType"/>
             <NavigationProperty Name="Thermal" Type="Thermal.Thermal" ContainsTarget="true"/>
             <Property Name="Manufacturer" Type="Edm.String"/>
           </EntityType>"#;
        let et = quick_xml::de::from_str::<DeEntityType>(data)
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(et.name.inner().as_ref(), "Chassis");
        assert!(et.base_type.is_some());
        let names: Vec<_> = et.properties.iter().map(|p| p.name.inner().clone()).collect();
        assert_eq!(names, vec!["ChassisType", "Thermal", "Manufacturer"]);
    }

    #[test]
    fn duplicate_property_names_are_rejected() {
        let data = r#"<EntityType Name="Chassis">
             <Property Name="Model" Type="Edm.String"/>
             <Property Name="Model" Type="Edm.String"/>
           </EntityType>"#;
        let result = quick_xml::de::from_str::<DeEntityType>(data).unwrap().validate();
        assert!(matches!(result, Err(ValidateError::EntityType(..))));
    }
}
