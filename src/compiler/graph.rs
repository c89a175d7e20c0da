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

//! Global type graph and the version merge.
//!
//! The graph holds one merged definition per (family, type name). The
//! merge is a pure fold over all schema documents of a family and is
//! independent of the order the documents were supplied in:
//!
//! - the newest declaring version supplies the definition shape;
//! - a version chain (each release deriving from its predecessor via
//!   an intra-family base type) is collapsed, and the merged base is
//!   the chain's outermost foreign base;
//! - a property keeps the position given by the version that first
//!   introduced it; a property stranded in a release the newest
//!   declaration does not reach is dropped;
//! - enum members take the newest declaration's order, and an explicit
//!   member value from the latest release that pins one.

use crate::compiler::diagnostics::Diagnostic;
use crate::compiler::diagnostics::Diagnostics;
use crate::compiler::document::DeclKind;
use crate::compiler::document::EnumMemberDecl;
use crate::compiler::document::NamedReference;
use crate::compiler::document::PropertyDecl;
use crate::compiler::document::SchemaDocument;
use crate::compiler::document::StructuredDecl;
use crate::compiler::document::TypeDecl;
use crate::compiler::document::TypeReference;
use crate::compiler::Family;
use crate::compiler::QualifiedName;
use crate::compiler::Version;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Merged definition of one type.
#[derive(Debug)]
pub struct TypeDefinition {
    pub name: QualifiedName,
    /// Newest version that declares the type.
    pub version: Option<Version>,
    pub description: Option<String>,
    pub kind: TypeKind,
}

/// Closed set of merged type kinds.
#[derive(Debug)]
pub enum TypeKind {
    Entity(Structured),
    Complex(Structured),
    Enum(Vec<EnumMemberDecl>),
    PrimitiveAlias(TypeReference),
}

/// Merged body of an entity or complex type.
#[derive(Debug)]
pub struct Structured {
    /// Outermost foreign base after collapsing the version chain.
    pub base: Option<NamedReference>,
    pub is_abstract: bool,
    pub properties: Vec<MergedProperty>,
}

/// One property with the release that introduced it.
#[derive(Debug)]
pub struct MergedProperty {
    pub decl: PropertyDecl,
    pub introduced: Option<Version>,
}

/// Global mapping from qualified name to merged definition.
///
/// `BTreeMap` keys give the deterministic iteration order every
/// downstream phase relies on.
#[derive(Debug, Default)]
pub struct TypeGraph {
    pub types: BTreeMap<QualifiedName, TypeDefinition>,
}

impl TypeGraph {
    /// Fold all documents into merged definitions.
    ///
    /// A version conflict poisons its whole family: every type of the
    /// family is withheld from the graph and a diagnostic is pushed.
    #[must_use]
    pub fn build(documents: &[SchemaDocument], diagnostics: &mut Diagnostics) -> Self {
        // (name, version) -> declaration; duplicate compatible
        // declarations collapse, incompatible ones poison the family.
        let mut declarations: BTreeMap<QualifiedName, BTreeMap<Option<Version>, &TypeDecl>> =
            BTreeMap::new();
        let mut poisoned: BTreeSet<Family> = BTreeSet::new();

        for doc in documents {
            for decl in &doc.types {
                let qname = QualifiedName::new(doc.family.clone(), decl.name.clone());
                let versions = declarations.entry(qname.clone()).or_default();
                if let Some(existing) = versions.get(&doc.version) {
                    if let Some(property) = first_conflict(existing, decl) {
                        diagnostics.push(Diagnostic::VersionConflict {
                            name: qname,
                            version: doc.version,
                            property,
                        });
                        poisoned.insert(doc.family.clone());
                    }
                } else {
                    versions.insert(doc.version, decl);
                }
            }
        }

        let types = declarations
            .into_iter()
            .filter(|(qname, _)| !poisoned.contains(&qname.family))
            .map(|(qname, versions)| {
                let merged = merge_versions(&qname, &versions);
                (qname, merged)
            })
            .collect();

        Self { types }
    }

    /// Families that have at least one merged definition.
    #[must_use]
    pub fn families(&self) -> BTreeSet<Family> {
        self.types.keys().map(|k| k.family.clone()).collect()
    }

    #[must_use]
    pub fn get(&self, name: &QualifiedName) -> Option<&TypeDefinition> {
        self.types.get(name)
    }
}

/// Find a property declared by both with different shapes.
fn first_conflict(a: &TypeDecl, b: &TypeDecl) -> Option<crate::edmx::PropertyName> {
    match (&a.kind, &b.kind) {
        (DeclKind::Entity(sa), DeclKind::Entity(sb))
        | (DeclKind::Complex(sa), DeclKind::Complex(sb)) => {
            for pa in &sa.properties {
                if let Some(pb) = sb.properties.iter().find(|p| p.name == pa.name) {
                    if pb.reference != pa.reference || pb.is_collection != pa.is_collection {
                        return Some(pa.name.clone());
                    }
                }
            }
            None
        }
        (DeclKind::Enum(_), DeclKind::Enum(_))
        | (DeclKind::PrimitiveAlias(_), DeclKind::PrimitiveAlias(_)) => None,
        // Different kinds under the same name and version.
        _ => Some(a.name.clone()),
    }
}

fn merge_versions(
    qname: &QualifiedName,
    versions: &BTreeMap<Option<Version>, &TypeDecl>,
) -> TypeDefinition {
    // BTreeMap order guarantees the last entry is the newest release.
    let (&newest_version, newest) = versions
        .iter()
        .next_back()
        .expect("a declaration map is never empty");

    let kind = match &newest.kind {
        DeclKind::Entity(sd) => TypeKind::Entity(merge_structured(qname, versions, sd, |k| {
            if let DeclKind::Entity(sd) = k {
                Some(sd)
            } else {
                None
            }
        })),
        DeclKind::Complex(sd) => TypeKind::Complex(merge_structured(qname, versions, sd, |k| {
            if let DeclKind::Complex(sd) = k {
                Some(sd)
            } else {
                None
            }
        })),
        DeclKind::Enum(_) => TypeKind::Enum(merge_enum(versions)),
        DeclKind::PrimitiveAlias(r) => TypeKind::PrimitiveAlias(r.clone()),
    };

    TypeDefinition {
        name: qname.clone(),
        version: newest_version,
        description: newest.description.clone(),
        kind,
    }
}

/// Versions the newest declaration reaches through intra-family base
/// chaining, newest first. The final element carries the merged base.
fn version_chain<'a>(
    qname: &QualifiedName,
    versions: &BTreeMap<Option<Version>, &'a TypeDecl>,
    newest: &'a StructuredDecl,
    as_structured: impl Fn(&'a DeclKind) -> Option<&'a StructuredDecl>,
) -> Vec<(Option<Version>, &'a StructuredDecl)> {
    let newest_version = versions.keys().next_back().copied().flatten();
    let mut chain = vec![(newest_version, newest)];
    let mut visited: BTreeSet<Option<Version>> = vec![newest_version].into_iter().collect();
    let mut current = newest;
    while let Some(base) = &current.base {
        if base.family != qname.family || base.name != qname.name {
            break;
        }
        if !visited.insert(base.version) {
            break;
        }
        match versions.get(&base.version).and_then(|d| as_structured(&d.kind)) {
            Some(prev) => {
                chain.push((base.version, prev));
                current = prev;
            }
            None => break,
        }
    }
    chain
}

fn merge_structured<'a>(
    qname: &QualifiedName,
    versions: &BTreeMap<Option<Version>, &'a TypeDecl>,
    newest: &'a StructuredDecl,
    as_structured: impl Fn(&'a DeclKind) -> Option<&'a StructuredDecl> + Copy,
) -> Structured {
    let chain = version_chain(qname, versions, newest, as_structured);

    // The merged base is the outermost base of the chain, unless it
    // is the dangling intra-family link of an incomplete corpus.
    let base = chain
        .last()
        .and_then(|(_, decl)| decl.base.clone())
        .filter(|b| b.family != qname.family || b.name != qname.name);

    // First introduction position of every property across all
    // releases, reachable or not: a property re-declared by a newer
    // release keeps the slot of its first appearance.
    let mut introduction: BTreeMap<&crate::edmx::PropertyName, (Option<Version>, usize)> =
        BTreeMap::new();
    for (version, decl) in versions.iter() {
        if let Some(sd) = as_structured(&decl.kind) {
            for (index, prop) in sd.properties.iter().enumerate() {
                let slot = (*version, index);
                introduction
                    .entry(&prop.name)
                    .and_modify(|cur| {
                        if slot < *cur {
                            *cur = slot;
                        }
                    })
                    .or_insert(slot);
            }
        }
    }

    // A property survives if a release on the chain declares it; its
    // shape comes from the newest such release.
    let mut survivors: BTreeMap<&crate::edmx::PropertyName, (Option<Version>, &PropertyDecl)> =
        BTreeMap::new();
    for (version, decl) in chain.iter().rev() {
        for prop in &decl.properties {
            survivors.insert(&prop.name, (*version, prop));
        }
    }

    let mut merged: Vec<(&(Option<Version>, usize), &PropertyDecl)> = survivors
        .iter()
        .map(|(name, (_, prop))| (&introduction[name], *prop))
        .collect();
    merged.sort_by_key(|(slot, _)| **slot);

    Structured {
        base,
        is_abstract: newest.is_abstract,
        properties: merged
            .into_iter()
            .map(|(&(introduced, _), prop)| MergedProperty {
                decl: prop.clone(),
                introduced,
            })
            .collect(),
    }
}

fn merge_enum(versions: &BTreeMap<Option<Version>, &TypeDecl>) -> Vec<EnumMemberDecl> {
    let newest_members = versions
        .values()
        .next_back()
        .and_then(|d| {
            if let DeclKind::Enum(ms) = &d.kind {
                Some(ms)
            } else {
                None
            }
        })
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    newest_members
        .iter()
        .map(|member| {
            // The latest release that pins an explicit value wins.
            let value = versions
                .values()
                .rev()
                .find_map(|d| {
                    if let DeclKind::Enum(ms) = &d.kind {
                        ms.iter()
                            .find(|m| m.name == member.name)
                            .and_then(|m| m.value)
                    } else {
                        None
                    }
                })
                .or(member.value);
            EnumMemberDecl {
                name: member.name.clone(),
                value,
                description: member.description.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compiler::document::documents_from_edmx;
    use crate::edmx::Edmx;
    use std::str::FromStr;

    fn build(documents: &[&str]) -> (TypeGraph, Diagnostics) {
        let docs: Vec<_> = documents
            .iter()
            .flat_map(|d| documents_from_edmx(&Edmx::parse(d).unwrap()))
            .collect();
        let mut diags = Diagnostics::default();
        let graph = TypeGraph::build(&docs, &mut diags);
        (graph, diags)
    }

    fn qname(family: &str, name: &str) -> QualifiedName {
        QualifiedName::new(
            Family {
                ids: family
                    .split('.')
                    .map(|s| crate::edmx::SimpleIdentifier::from_str(s).unwrap())
                    .collect(),
            },
            crate::edmx::SimpleIdentifier::from_str(name).unwrap(),
        )
    }

    const DRIVE_V1: &str = r#"<edmx:Edmx Version="4.0">
         <edmx:DataServices>
           <Schema Namespace="Drive.v1_0_0">
             <EntityType Name="Drive">
               <Property Name="Model" Type="Edm.String"/>
               <Property Name="CapacityBytes" Type="Edm.Int64"/>
             </EntityType>
           </Schema>
         </edmx:DataServices>
       </edmx:Edmx>"#;

    const DRIVE_V2: &str = r#"<edmx:Edmx Version="4.0">
         <edmx:DataServices>
           <Schema Namespace="Drive.v1_2_0">
             <EntityType Name="Drive" BaseType="Drive.v1_0_0.Drive">
               <Property Name="SerialNumber" Type="Edm.String"/>
             </EntityType>
           </Schema>
         </edmx:DataServices>
       </edmx:Edmx>"#;

    #[test]
    fn newest_version_wins_and_chain_merges_properties() {
        let (graph, diags) = build(&[DRIVE_V1, DRIVE_V2]);
        assert!(diags.is_empty());
        let def = graph.get(&qname("Drive", "Drive")).unwrap();
        assert_eq!(def.version, Some(Version::new(1, 2, 0)));
        let props = match &def.kind {
            TypeKind::Entity(sd) => &sd.properties,
            other => panic!("unexpected kind: {:?}", other),
        };
        let names: Vec<_> = props.iter().map(|p| p.decl.name.inner().clone()).collect();
        assert_eq!(names, vec!["Model", "CapacityBytes", "SerialNumber"]);
        assert_eq!(props[0].introduced, Some(Version::new(1, 0, 0)));
        assert_eq!(props[2].introduced, Some(Version::new(1, 2, 0)));
        // The intra-family chain base is consumed by the merge.
        match &def.kind {
            TypeKind::Entity(sd) => assert!(sd.base.is_none()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn merge_is_input_order_independent() {
        let (forward, _) = build(&[DRIVE_V1, DRIVE_V2]);
        let (backward, _) = build(&[DRIVE_V2, DRIVE_V1]);
        let f = format!("{:?}", forward.get(&qname("Drive", "Drive")));
        let b = format!("{:?}", backward.get(&qname("Drive", "Drive")));
        assert_eq!(f, b);
    }

    #[test]
    fn redeclaring_corpus_keeps_first_introduction_order() {
        // The newest release redeclares the full property list in a
        // different order; positions follow first introduction.
        let v1 = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="Fan.v1_0_0">
                 <ComplexType Name="Fan">
                   <Property Name="Rpm" Type="Edm.Int64"/>
                   <Property Name="Name" Type="Edm.String"/>
                 </ComplexType>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        let v2 = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="Fan.v1_1_0">
                 <ComplexType Name="Fan">
                   <Property Name="Name" Type="Edm.String"/>
                   <Property Name="Location" Type="Edm.String"/>
                   <Property Name="Rpm" Type="Edm.Int64"/>
                 </ComplexType>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        let (graph, _) = build(&[v2, v1]);
        let def = graph.get(&qname("Fan", "Fan")).unwrap();
        let props = match &def.kind {
            TypeKind::Complex(sd) => &sd.properties,
            other => panic!("unexpected kind: {:?}", other),
        };
        let names: Vec<_> = props.iter().map(|p| p.decl.name.inner().clone()).collect();
        assert_eq!(names, vec!["Rpm", "Name", "Location"]);
    }

    #[test]
    fn property_stranded_in_superseded_release_is_dropped() {
        let v1 = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="Fan.v1_0_0">
                 <ComplexType Name="Fan">
                   <Property Name="Removed" Type="Edm.String"/>
                   <Property Name="Kept" Type="Edm.String"/>
                 </ComplexType>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        // No intra-family base: v2 does not reach the v1 release.
        let v2 = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="Fan.v2_0_0">
                 <ComplexType Name="Fan">
                   <Property Name="Kept" Type="Edm.String"/>
                 </ComplexType>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        let (graph, _) = build(&[v1, v2]);
        let def = graph.get(&qname("Fan", "Fan")).unwrap();
        let props = match &def.kind {
            TypeKind::Complex(sd) => &sd.properties,
            other => panic!("unexpected kind: {:?}", other),
        };
        let names: Vec<_> = props.iter().map(|p| p.decl.name.inner().clone()).collect();
        assert_eq!(names, vec!["Kept"]);
    }

    #[test]
    fn version_conflict_poisons_the_family() {
        let a = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="Fan.v1_0_0">
                 <ComplexType Name="Fan">
                   <Property Name="Rpm" Type="Edm.Int64"/>
                 </ComplexType>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        let b = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="Fan.v1_0_0">
                 <ComplexType Name="Fan">
                   <Property Name="Rpm" Type="Edm.String"/>
                 </ComplexType>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        let (graph, diags) = build(&[a, b]);
        assert!(graph.get(&qname("Fan", "Fan")).is_none());
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn enum_explicit_values_survive_the_newest_release() {
        let v1 = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="Led.v1_0_0">
                 <EnumType Name="State">
                   <Member Name="Off" Value="0"/>
                   <Member Name="Lit" Value="4"/>
                 </EnumType>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        let v2 = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="Led.v1_1_0">
                 <EnumType Name="State">
                   <Member Name="Off"/>
                   <Member Name="Lit"/>
                   <Member Name="Blinking"/>
                 </EnumType>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        let (graph, _) = build(&[v2, v1]);
        let def = graph.get(&qname("Led", "State")).unwrap();
        let members = match &def.kind {
            TypeKind::Enum(ms) => ms,
            other => panic!("unexpected kind: {:?}", other),
        };
        assert_eq!(members[0].value, Some(0));
        assert_eq!(members[1].value, Some(4));
        assert_eq!(members[2].value, None);
    }
}
