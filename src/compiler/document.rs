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

//! Schema documents in the engine model.
//!
//! One `SchemaDocument` corresponds to one `edm:Schema` element:
//! a namespace family, the release version parsed from the namespace,
//! and the type declarations in declaration order. This is the unit
//! the graph builder folds; the XML layer is not consulted again
//! after conversion.

use crate::compiler::Family;
use crate::compiler::QualifiedName;
use crate::compiler::Version;
use crate::edmx;
use crate::edmx::annotation;
use crate::edmx::property::PropertyAttrs;
use crate::edmx::schema::SchemaItem;
use crate::edmx::PropertyName;
use crate::edmx::SimpleIdentifier;
use crate::mapper::Primitive;
use tagged_types::TaggedType;

/// Whether a property may be null in the source schema.
pub type IsNullable = TaggedType<bool, IsNullableTag>;
#[doc(hidden)]
#[derive(tagged_types::Tag)]
#[implement(Clone, Copy)]
#[transparent(Debug)]
#[capability(inner_access)]
pub enum IsNullableTag {}

/// One `edm:Schema` converted to the engine model.
#[derive(Debug)]
pub struct SchemaDocument {
    pub family: Family,
    pub version: Option<Version>,
    pub types: Vec<TypeDecl>,
}

/// One type declaration of a schema document.
#[derive(Debug)]
pub struct TypeDecl {
    pub name: SimpleIdentifier,
    pub description: Option<String>,
    pub kind: DeclKind,
}

/// Closed set of type declaration kinds.
#[derive(Debug)]
pub enum DeclKind {
    Entity(StructuredDecl),
    Complex(StructuredDecl),
    Enum(Vec<EnumMemberDecl>),
    PrimitiveAlias(TypeReference),
}

/// Declaration body shared by entity and complex types.
#[derive(Debug)]
pub struct StructuredDecl {
    pub base: Option<NamedReference>,
    pub is_abstract: bool,
    pub properties: Vec<PropertyDecl>,
}

/// One declared property, structural or navigation.
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub name: PropertyName,
    pub reference: TypeReference,
    pub is_collection: bool,
    pub is_nullable: IsNullable,
    /// `None` for structural properties.
    pub navigation: Option<NavigationMode>,
    pub read_only: bool,
    pub description: Option<String>,
}

impl PropertyDecl {
    /// Whether the referenced type is embedded in the owning message.
    /// Navigation targets are linked by reference unless the schema
    /// asks for expansion.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        !matches!(self.navigation, Some(NavigationMode::Reference))
    }
}

/// How a navigation property carries its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationMode {
    /// `ContainsTarget` or `OData.AutoExpand`: target is inlined.
    Embedded,
    /// Plain Redfish link: target is carried by reference.
    Reference,
}

/// One enum member with its optional explicit value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMemberDecl {
    pub name: SimpleIdentifier,
    pub value: Option<i64>,
    pub description: Option<String>,
}

/// A type reference awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeReference {
    Primitive(Primitive),
    Named(NamedReference),
}

/// Reference to a type by namespace family, local name and the
/// version constraint carried by the referencing namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedReference {
    pub family: Family,
    pub name: SimpleIdentifier,
    pub version: Option<Version>,
}

impl NamedReference {
    /// The family-qualified name this reference resolves to.
    #[must_use]
    pub fn qualified(&self) -> QualifiedName {
        QualifiedName::new(self.family.clone(), self.name.clone())
    }
}

impl TypeReference {
    fn from_qualified(qn: &edmx::QualifiedName) -> Self {
        if qn.namespace.is_edm() {
            Self::Primitive(Primitive::from_edm(&qn.name))
        } else {
            let (family, version) = Family::split(&qn.namespace);
            Self::Named(NamedReference {
                family,
                name: qn.name.clone(),
                version,
            })
        }
    }
}

/// Convert every schema of a parsed document to the engine model.
#[must_use]
pub fn documents_from_edmx(edmx: &edmx::Edmx) -> Vec<SchemaDocument> {
    edmx.data_services
        .schemas
        .iter()
        .map(|schema| {
            let (family, version) = Family::split(&schema.namespace);
            SchemaDocument {
                family,
                version,
                types: schema.items.iter().map(convert_item).collect(),
            }
        })
        .collect()
}

fn convert_item(item: &SchemaItem) -> TypeDecl {
    match item {
        SchemaItem::EntityType(et) => TypeDecl {
            name: et.name.inner().clone(),
            description: annotation::description(&et.annotations).map(ToString::to_string),
            kind: DeclKind::Entity(StructuredDecl {
                base: named_base(et.base_type.as_ref()),
                is_abstract: et.is_abstract,
                properties: et.properties.iter().map(convert_property).collect(),
            }),
        },
        SchemaItem::ComplexType(ct) => TypeDecl {
            name: ct.name.inner().clone(),
            description: annotation::description(&ct.annotations).map(ToString::to_string),
            kind: DeclKind::Complex(StructuredDecl {
                base: named_base(ct.base_type.as_ref()),
                is_abstract: ct.is_abstract,
                properties: ct.properties.iter().map(convert_property).collect(),
            }),
        },
        SchemaItem::EnumType(et) => TypeDecl {
            name: et.name.inner().clone(),
            description: annotation::description(&et.annotations).map(ToString::to_string),
            kind: DeclKind::Enum(
                et.members
                    .iter()
                    .map(|m| EnumMemberDecl {
                        name: m.name.inner().clone(),
                        value: m.value,
                        description: annotation::description(&m.annotations)
                            .map(ToString::to_string),
                    })
                    .collect(),
            ),
        },
        SchemaItem::TypeDefinition(td) => TypeDecl {
            name: td.name.inner().clone(),
            description: annotation::description(&td.annotations).map(ToString::to_string),
            kind: DeclKind::PrimitiveAlias(TypeReference::from_qualified(
                td.underlying_type.qualified_name(),
            )),
        },
    }
}

fn named_base(base: Option<&edmx::QualifiedName>) -> Option<NamedReference> {
    base.map(|qn| match TypeReference::from_qualified(qn) {
        TypeReference::Named(r) => r,
        // A base type in the Edm namespace does not occur in practice;
        // treat the local name as an unversioned family so resolution
        // reports it instead of the parser.
        TypeReference::Primitive(_) => {
            let (family, version) = Family::split(&qn.namespace);
            NamedReference {
                family,
                name: qn.name.clone(),
                version,
            }
        }
    })
}

fn convert_property(p: &edmx::property::Property) -> PropertyDecl {
    match &p.attrs {
        PropertyAttrs::Structural(sp) => PropertyDecl {
            name: p.name.clone(),
            reference: TypeReference::from_qualified(sp.ptype.qualified_name()),
            is_collection: sp.ptype.is_collection(),
            is_nullable: IsNullable::new(sp.nullable.unwrap_or(true)),
            navigation: None,
            read_only: annotation::is_read_only(&sp.annotations),
            description: annotation::description(&sp.annotations).map(ToString::to_string),
        },
        PropertyAttrs::Navigation(np) => PropertyDecl {
            name: p.name.clone(),
            reference: TypeReference::from_qualified(np.ptype.qualified_name()),
            is_collection: np.ptype.is_collection(),
            is_nullable: IsNullable::new(np.nullable.unwrap_or(true)),
            navigation: Some(navigation_mode(np)),
            read_only: annotation::is_read_only(&np.annotations),
            description: annotation::description(&np.annotations).map(ToString::to_string),
        },
    }
}

fn navigation_mode(np: &edmx::property::NavigationProperty) -> NavigationMode {
    if np.contains_target.unwrap_or(false) || annotation::auto_expand(&np.annotations) {
        NavigationMode::Embedded
    } else {
        NavigationMode::Reference
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::edmx::Edmx;

    fn documents(data: &str) -> Vec<SchemaDocument> {
        documents_from_edmx(&Edmx::parse(data).unwrap())
    }

    #[test]
    fn splits_namespace_and_version() {
        let docs = documents(
            r#"<edmx:Edmx Version="4.0">
                 <edmx:DataServices>
                   <Schema Namespace="Drive.v1_4_0">
                     <EntityType Name="Drive"/>
                   </Schema>
                   <Schema Namespace="Drive">
                     <EnumType Name="MediaType"/>
                   </Schema>
                 </edmx:DataServices>
               </edmx:Edmx>"#,
        );
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].family.to_string(), "Drive");
        assert_eq!(docs[0].version, Some(Version::new(1, 4, 0)));
        assert_eq!(docs[1].version, None);
    }

    #[test]
    fn navigation_expansion_rules() {
        let docs = documents(
            r#"<edmx:Edmx Version="4.0">
                 <edmx:DataServices>
                   <Schema Namespace="Chassis.v1_0_0">
                     <EntityType Name="Chassis">
                       <NavigationProperty Name="Thermal" Type="Thermal.Thermal" ContainsTarget="true"/>
                       <NavigationProperty Name="Expanded" Type="Power.Power">
                         <Annotation Term="OData.AutoExpand"/>
                       </NavigationProperty>
                       <NavigationProperty Name="ManagedBy" Type="Collection(Manager.Manager)"/>
                     </EntityType>
                   </Schema>
                 </edmx:DataServices>
               </edmx:Edmx>"#,
        );
        let props = match &docs[0].types[0].kind {
            DeclKind::Entity(sd) => &sd.properties,
            other => panic!("unexpected kind: {:?}", other),
        };
        assert_eq!(props[0].navigation, Some(NavigationMode::Embedded));
        assert_eq!(props[1].navigation, Some(NavigationMode::Embedded));
        assert_eq!(props[2].navigation, Some(NavigationMode::Reference));
        assert!(props[2].is_collection);
        assert!(props[0].is_embedded());
        assert!(!props[2].is_embedded());
    }

    #[test]
    fn primitive_references_are_classified_at_parse_time() {
        let docs = documents(
            r#"<edmx:Edmx Version="4.0">
                 <edmx:DataServices>
                   <Schema Namespace="Sensor.v1_0_0">
                     <ComplexType Name="Threshold">
                       <Property Name="Reading" Type="Edm.Decimal"/>
                       <Property Name="Name" Type="Edm.String" Nullable="false"/>
                     </ComplexType>
                   </Schema>
                 </edmx:DataServices>
               </edmx:Edmx>"#,
        );
        let props = match &docs[0].types[0].kind {
            DeclKind::Complex(sd) => &sd.properties,
            other => panic!("unexpected kind: {:?}", other),
        };
        assert_eq!(props[0].reference, TypeReference::Primitive(Primitive::Float));
        assert!(!props[1].is_nullable.into_inner());
    }
}
