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

//! proto3 emitter.
//!
//! One unit per namespace family, each declaring its types in
//! emission order. Inherited properties are materialized by inclusion
//! (base chain first) and numbered sequentially from 1; numbering is
//! a pure function of the resolved graph, so an unchanged corpus
//! reproduces byte-identical output. Navigation links, broken cycles
//! and references into excluded types are carried by the fixed
//! `NavigationReference` message; references the source could not
//! provide degrade to opaque string placeholders with a comment.

/// Message rendering
pub mod message;

/// Enum rendering
pub mod enum_def;

use crate::compiler::graph::MergedProperty;
use crate::compiler::graph::Structured;
use crate::compiler::graph::TypeKind;
use crate::compiler::resolver::Resolved;
use crate::compiler::Family;
use crate::compiler::QualifiedName;
use crate::compiler::document::TypeReference;
use crate::edmx::PropertyName;
use crate::mapper::Primitive;
use enum_def::EnumDef;
use message::Field;
use message::Message;
use message::MessageEntry;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Name and file of the fixed by-reference message.
const NAVIGATION_REFERENCE: &str = "NavigationReference";
const NAVIGATION_REFERENCE_FILE: &str = "NavigationReference.proto";

/// One emitted output unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoUnit {
    pub file_name: String,
    pub content: String,
}

/// Internal invariant violations. Any of these surviving resolution
/// indicates a bug and is fatal for the whole run.
#[derive(Debug)]
pub enum EmissionError {
    /// A base type disappeared between resolution and emission.
    MissingBase {
        name: QualifiedName,
        base: QualifiedName,
    },
    /// A reference survived resolution without being resolved,
    /// excluded or marked external.
    UnresolvedSurvivor {
        referrer: QualifiedName,
        property: PropertyName,
        target: QualifiedName,
    },
    /// An alias chain did not terminate.
    AliasChain { name: QualifiedName },
}

impl Display for EmissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::MissingBase { name, base } => {
                write!(f, "emission invariant broken: {name} lost base {base}")
            }
            Self::UnresolvedSurvivor {
                referrer,
                property,
                target,
            } => write!(
                f,
                "emission invariant broken: {referrer}.{property} still references unresolved {target}"
            ),
            Self::AliasChain { name } => {
                write!(f, "emission invariant broken: alias chain at {name} does not terminate")
            }
        }
    }
}

impl std::error::Error for EmissionError {}

/// Serializes a resolved graph to proto3 text units.
pub struct ProtoGenerator<'a> {
    resolved: &'a Resolved,
    families: BTreeSet<Family>,
}

/// How a field carries its value, decided per reference.
enum FieldCarrier {
    Scalar(Primitive),
    Embedded(QualifiedName),
    Link { comment: Option<String> },
    Placeholder(QualifiedName),
}

impl<'a> ProtoGenerator<'a> {
    #[must_use]
    pub fn new(resolved: &'a Resolved) -> Self {
        let families = resolved.graph.families();
        Self { resolved, families }
    }

    /// Generate all units in deterministic order.
    ///
    /// # Errors
    ///
    /// `EmissionError` if the resolved graph violates an invariant.
    pub fn generate(&self) -> Result<Vec<ProtoUnit>, EmissionError> {
        // Group the global emission order by family, keeping the
        // in-family order.
        let mut grouped: Vec<(Family, Vec<&QualifiedName>)> = Vec::new();
        for name in &self.resolved.order {
            match grouped.iter_mut().find(|(f, _)| *f == name.family) {
                Some((_, names)) => names.push(name),
                None => grouped.push((name.family.clone(), vec![name])),
            }
        }
        grouped.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut units = Vec::new();
        let mut navigation_needed = false;
        for (family, names) in grouped {
            if let Some(unit) = self.generate_unit(&family, &names, &mut navigation_needed)? {
                units.push(unit);
            }
        }
        if navigation_needed {
            units.push(navigation_reference_unit());
        }
        Ok(units)
    }

    fn generate_unit(
        &self,
        family: &Family,
        names: &[&QualifiedName],
        navigation_needed: &mut bool,
    ) -> Result<Option<ProtoUnit>, EmissionError> {
        let mut imports: BTreeSet<String> = BTreeSet::new();
        let mut declarations: Vec<String> = Vec::new();

        for &name in names {
            let def = match self.resolved.graph.get(name) {
                Some(def) => def,
                None => continue,
            };
            match &def.kind {
                TypeKind::Entity(sd) | TypeKind::Complex(sd) => {
                    let message =
                        self.build_message(family, name, sd, def.description.clone(), &mut imports)?;
                    declarations.push(message.to_string());
                }
                TypeKind::Enum(members) => {
                    let enum_def = EnumDef::build(
                        name.name.inner(),
                        def.description.clone(),
                        members,
                    );
                    declarations.push(enum_def.to_string());
                }
                // Aliases are inlined at their use sites.
                TypeKind::PrimitiveAlias(_) => {}
            }
        }

        if declarations.is_empty() {
            return Ok(None);
        }

        if imports.contains(NAVIGATION_REFERENCE_FILE) {
            *navigation_needed = true;
        }

        let mut content = String::from("syntax = \"proto3\";\n\n");
        content.push_str(&format!("package {family};\n\n"));
        let mut sorted_imports: Vec<&String> = imports.iter().collect();
        sorted_imports.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        for import in &sorted_imports {
            content.push_str(&format!("import \"{import}\";\n"));
        }
        if !sorted_imports.is_empty() {
            content.push('\n');
        }
        content.push_str(&declarations.join("\n\n"));
        content.push('\n');

        Ok(Some(ProtoUnit {
            file_name: format!("{family}.proto"),
            content,
        }))
    }

    fn build_message(
        &self,
        unit_family: &Family,
        name: &QualifiedName,
        structured: &Structured,
        comment: Option<String>,
        imports: &mut BTreeSet<String>,
    ) -> Result<Message, EmissionError> {
        let groups = self.flatten(name, structured)?;
        let mut entries = Vec::new();
        let mut number = 1u32;
        // A derived type redeclaring an inherited property keeps the
        // inherited slot.
        let mut seen: BTreeSet<&PropertyName> = BTreeSet::new();
        for (provenance, properties) in groups {
            let properties: Vec<&MergedProperty> = properties
                .into_iter()
                .filter(|p| seen.insert(&p.decl.name))
                .collect();
            if properties.is_empty() {
                continue;
            }
            if number != 1 {
                entries.push(MessageEntry::Blank);
            }
            entries.push(MessageEntry::Comment(format!("from {provenance}")));
            for prop in properties {
                let carrier = self.field_carrier(name, prop)?;
                let type_name = match &carrier {
                    FieldCarrier::Scalar(p) => {
                        if let Some(caveat) = p.caveat() {
                            entries.push(MessageEntry::Comment(caveat));
                        }
                        p.proto_type().to_string()
                    }
                    FieldCarrier::Embedded(target) => {
                        if target.family == *unit_family {
                            target.name.inner().clone()
                        } else {
                            imports.insert(format!("{}.proto", target.family));
                            format!(".{}.{}", target.family, target.name)
                        }
                    }
                    FieldCarrier::Link { comment } => {
                        if let Some(comment) = comment {
                            entries.push(MessageEntry::Comment(comment.clone()));
                        }
                        imports.insert(NAVIGATION_REFERENCE_FILE.into());
                        NAVIGATION_REFERENCE.to_string()
                    }
                    FieldCarrier::Placeholder(target) => {
                        entries.push(MessageEntry::Comment(format!(
                            "unresolved reference to {target}; carried as an opaque string"
                        )));
                        "string".to_string()
                    }
                };
                entries.push(MessageEntry::Field(Field {
                    repeated: prop.decl.is_collection,
                    type_name,
                    name: prop.decl.name.inner().clone(),
                    number,
                }));
                number += 1;
            }
        }
        Ok(Message {
            name: name.name.inner().clone(),
            comment,
            entries,
        })
    }

    /// Base-first flattening of the inheritance chain.
    fn flatten(
        &self,
        name: &QualifiedName,
        structured: &Structured,
    ) -> Result<Vec<(QualifiedName, Vec<&'a MergedProperty>)>, EmissionError> {
        let mut groups = Vec::new();
        if let Some(base) = &structured.base {
            let target = base.qualified();
            let base_def = self
                .resolved
                .graph
                .get(&target)
                .ok_or_else(|| EmissionError::MissingBase {
                    name: name.clone(),
                    base: target.clone(),
                })?;
            match &base_def.kind {
                TypeKind::Entity(base_sd) | TypeKind::Complex(base_sd) => {
                    groups.extend(self.flatten(&target, base_sd)?);
                }
                _ => {
                    return Err(EmissionError::MissingBase {
                        name: name.clone(),
                        base: target,
                    })
                }
            }
        }
        // The graph borrow outlives self; re-borrow through the graph
        // to return properties with the generator's lifetime.
        let own = self
            .resolved
            .graph
            .get(name)
            .map(|def| match &def.kind {
                TypeKind::Entity(sd) | TypeKind::Complex(sd) => sd.properties.iter().collect(),
                _ => Vec::new(),
            })
            .unwrap_or_default();
        groups.push((name.clone(), own));
        Ok(groups)
    }

    fn field_carrier(
        &self,
        owner: &QualifiedName,
        prop: &MergedProperty,
    ) -> Result<FieldCarrier, EmissionError> {
        if !prop.decl.is_embedded() {
            return Ok(FieldCarrier::Link { comment: None });
        }
        if self.resolved.is_indirect(owner, &prop.decl.name) {
            return Ok(FieldCarrier::Link {
                comment: Some("embedding cycle broken; carried by reference".into()),
            });
        }
        match &prop.decl.reference {
            TypeReference::Primitive(p) => Ok(FieldCarrier::Scalar(p.clone())),
            TypeReference::Named(r) => {
                let target = r.qualified();
                self.named_carrier(owner, &prop.decl.name, target)
            }
        }
    }

    fn named_carrier(
        &self,
        owner: &QualifiedName,
        property: &PropertyName,
        target: QualifiedName,
    ) -> Result<FieldCarrier, EmissionError> {
        // Alias chains are finite: a cycle would have been excluded.
        let mut target = target;
        let mut hops = 0usize;
        loop {
            if self.resolved.excluded.contains_key(&target) {
                return Ok(FieldCarrier::Link {
                    comment: Some(format!("{target} excluded from output; carried by reference")),
                });
            }
            match self.resolved.graph.get(&target) {
                None => {
                    return if self.resolved.external.contains(&target.family)
                        || self.families.contains(&target.family)
                    {
                        Ok(FieldCarrier::Placeholder(target))
                    } else {
                        Err(EmissionError::UnresolvedSurvivor {
                            referrer: owner.clone(),
                            property: property.clone(),
                            target,
                        })
                    }
                }
                Some(def) => match &def.kind {
                    TypeKind::PrimitiveAlias(TypeReference::Primitive(p)) => {
                        return Ok(FieldCarrier::Scalar(p.clone()))
                    }
                    TypeKind::PrimitiveAlias(TypeReference::Named(r)) => {
                        hops += 1;
                        if hops > self.resolved.graph.types.len() {
                            return Err(EmissionError::AliasChain { name: target });
                        }
                        target = r.qualified();
                    }
                    _ => return Ok(FieldCarrier::Embedded(target)),
                },
            }
        }
    }
}

fn navigation_reference_unit() -> ProtoUnit {
    let content = "syntax = \"proto3\";\n\n\
                   // Link to a resource carried by identity instead of value.\n\
                   message NavigationReference {\n\
                   \x20   string id = 1;\n\
                   }\n";
    ProtoUnit {
        file_name: NAVIGATION_REFERENCE_FILE.into(),
        content: content.into(),
    }
}
