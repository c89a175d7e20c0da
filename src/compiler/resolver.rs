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

//! Reference resolution, cycle breaking and emission ordering.
//!
//! The resolver works over an index-based adjacency structure rather
//! than ownership links: the semantic graph is cyclic and the nodes
//! live in the type graph, keyed by name. Resolution proceeds in
//! three passes:
//!
//! 1. Fetch: namespaces referenced but absent from the corpus are
//!    requested from the `SchemaSource`, at most once per family and
//!    with a bounded number of attempts, and merged into the graph
//!    until no new namespace appears. Families the source does not
//!    have are marked external; their referencing properties degrade
//!    to placeholders.
//! 2. Cycles: depth-first traversal over the dependency edges with a
//!    deterministic (name-ascending) visit order. A cycle closed by
//!    an embedded property reference is broken by turning that
//!    property into a by-reference link. A cycle through base types
//!    cannot be broken that way: the involved types are excluded and
//!    reported, and the rest of the graph proceeds.
//! 3. Order: Kahn's algorithm over the now-acyclic edges, ties broken
//!    by qualified name ascending, so a type is always declared after
//!    everything it embeds and reruns produce identical output.

use crate::compiler::diagnostics::Diagnostic;
use crate::compiler::diagnostics::Diagnostics;
use crate::compiler::document::documents_from_edmx;
use crate::compiler::document::SchemaDocument;
use crate::compiler::document::TypeReference;
use crate::compiler::graph::TypeGraph;
use crate::compiler::graph::TypeKind;
use crate::compiler::source::Fetched;
use crate::compiler::source::SchemaSource;
use crate::compiler::Family;
use crate::compiler::QualifiedName;
use crate::compiler::Version;
use crate::edmx::Edmx;
use crate::edmx::PropertyName;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::BinaryHeap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Bound on fetch attempts per namespace before the resolver gives up
/// and degrades the referencing properties to placeholders.
pub const FETCH_ATTEMPTS: usize = 3;

/// Why a type is withheld from emission.
#[derive(Debug)]
pub enum Exclusion {
    /// The type takes part in an inheritance cycle.
    BaseCycle,
    /// The base type (transitively) was excluded.
    BaseExcluded(QualifiedName),
    /// The base type could not be resolved at all.
    UnresolvedBase(QualifiedName),
}

impl Display for Exclusion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::BaseCycle => "part of an inheritance cycle".fmt(f),
            Self::BaseExcluded(base) => write!(f, "base type {base} was excluded"),
            Self::UnresolvedBase(base) => write!(f, "base type {base} could not be resolved"),
        }
    }
}

/// Outcome of resolution: the read-only graph plus everything the
/// emitter needs to order, indirect and exclude.
#[derive(Debug)]
pub struct Resolved {
    pub graph: TypeGraph,
    /// Total emission order over included types.
    pub order: Vec<QualifiedName>,
    /// Properties rewritten to by-reference links to break cycles.
    pub indirect: BTreeSet<(QualifiedName, PropertyName)>,
    /// Families the source could not provide.
    pub external: BTreeSet<Family>,
    /// Types withheld from emission, with reasons.
    pub excluded: BTreeMap<QualifiedName, Exclusion>,
}

impl Resolved {
    /// Whether a property was rewritten to an indirect reference.
    #[must_use]
    pub fn is_indirect(&self, name: &QualifiedName, property: &PropertyName) -> bool {
        self.indirect
            .contains(&(name.clone(), property.clone()))
    }
}

/// Internal invariant violation: the edge set still held a cycle
/// after breaking. Indicates a bug, fatal for the run.
#[derive(Debug)]
pub struct OrderingError {
    pub remaining: Vec<QualifiedName>,
}

impl Display for OrderingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "emission order could not be completed for {} types",
            self.remaining.len()
        )
    }
}

/// Dependency edge kinds. Base and alias links cannot be indirected;
/// embedded property links can.
#[derive(Clone, Debug)]
enum EdgeKind {
    Base,
    Property(PropertyName),
}

#[derive(Clone, Debug)]
struct Edge {
    to: usize,
    kind: EdgeKind,
}

/// Resolve all references of a document corpus.
pub struct Resolver<'s> {
    source: &'s mut dyn SchemaSource,
}

impl<'s> Resolver<'s> {
    pub fn new(source: &'s mut dyn SchemaSource) -> Self {
        Self { source }
    }

    /// Run all three passes. Diagnostics accumulate per-type and
    /// per-namespace failures; only a broken internal invariant is a
    /// hard error.
    ///
    /// # Errors
    ///
    /// `OrderingError` if a cycle survives breaking, which indicates
    /// a bug.
    pub fn resolve(
        self,
        mut documents: Vec<SchemaDocument>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Resolved, OrderingError> {
        let mut build_diags = Diagnostics::default();
        let mut graph = TypeGraph::build(&documents, &mut build_diags);
        let mut external: BTreeSet<Family> = BTreeSet::new();
        let mut attempted: BTreeSet<Family> = BTreeSet::new();

        // Fetch to fixpoint; each fetched document may reference
        // further namespaces. The graph is re-folded after each round
        // so merge results stay order-independent.
        loop {
            let missing = missing_families(&graph, &external);
            if missing.is_empty() {
                break;
            }
            for (family, version) in missing {
                if !attempted.insert(family.clone()) {
                    external.insert(family);
                    continue;
                }
                match fetch_with_retries(self.source, &family, version.as_ref()) {
                    Some(text) => match Edmx::parse(&text) {
                        Ok(edmx) => documents.extend(documents_from_edmx(&edmx)),
                        Err(error) => {
                            diagnostics.push(Diagnostic::Parse {
                                source_name: family.to_string(),
                                error,
                            });
                            external.insert(family);
                        }
                    },
                    None => {
                        external.insert(family);
                    }
                }
            }
            build_diags = Diagnostics::default();
            graph = TypeGraph::build(&documents, &mut build_diags);
        }
        diagnostics.append(build_diags);

        // A family may have been fetched without actually declaring
        // the referenced names; treat it as present, the dangling
        // references degrade per-property below.
        let nodes: Vec<QualifiedName> = graph.types.keys().cloned().collect();
        let index: BTreeMap<&QualifiedName, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n, i)).collect();

        let mut excluded: BTreeMap<QualifiedName, Exclusion> = BTreeMap::new();
        let mut edges: Vec<Vec<Edge>> = vec![Vec::new(); nodes.len()];

        for (i, name) in nodes.iter().enumerate() {
            let def = &graph.types[name];
            match &def.kind {
                TypeKind::Entity(sd) | TypeKind::Complex(sd) => {
                    if let Some(base) = &sd.base {
                        let target = base.qualified();
                        let structured_target = graph.get(&target).map(|def| {
                            matches!(def.kind, TypeKind::Entity(_) | TypeKind::Complex(_))
                        });
                        match (index.get(&target), structured_target) {
                            (Some(&to), Some(true)) if target != *name => {
                                edges[i].push(Edge {
                                    to,
                                    kind: EdgeKind::Base,
                                });
                            }
                            (Some(_), Some(true)) => {}
                            // Absent, or present but not a type one
                            // can derive from.
                            _ => {
                                diagnostics.push(Diagnostic::UnresolvedBaseType {
                                    name: name.clone(),
                                    base: target.clone(),
                                });
                                excluded.insert(name.clone(), Exclusion::UnresolvedBase(target));
                            }
                        }
                    }
                    for prop in &sd.properties {
                        if let TypeReference::Named(r) = &prop.decl.reference {
                            let target = r.qualified();
                            match index.get(&target) {
                                Some(&to) => {
                                    if prop.decl.is_embedded() && target != *name {
                                        edges[i].push(Edge {
                                            to,
                                            kind: EdgeKind::Property(prop.decl.name.clone()),
                                        });
                                    }
                                }
                                // A link target carried by reference
                                // never needs the definition.
                                None if prop.decl.is_embedded() => {
                                    diagnostics.push(Diagnostic::UnresolvedReference {
                                        family: r.family.clone(),
                                        referrer: name.clone(),
                                        property: Some(prop.decl.name.clone()),
                                    });
                                }
                                None => {}
                            }
                        }
                    }
                }
                TypeKind::PrimitiveAlias(TypeReference::Named(r)) => {
                    let target = r.qualified();
                    match index.get(&target) {
                        Some(&to) if target != *name => {
                            edges[i].push(Edge {
                                to,
                                kind: EdgeKind::Base,
                            });
                        }
                        Some(_) => {}
                        None => {
                            diagnostics.push(Diagnostic::UnresolvedReference {
                                family: r.family.clone(),
                                referrer: name.clone(),
                                property: None,
                            });
                        }
                    }
                }
                TypeKind::PrimitiveAlias(TypeReference::Primitive(_)) | TypeKind::Enum(_) => {}
            }
        }

        let (broken, cycle_excluded) = break_cycles(&nodes, &edges, diagnostics);
        let indirect: BTreeSet<(QualifiedName, PropertyName)> = broken
            .iter()
            .map(|&(from, ref pname)| (nodes[from].clone(), pname.clone()))
            .collect();
        for i in cycle_excluded {
            excluded
                .entry(nodes[i].clone())
                .or_insert(Exclusion::BaseCycle);
        }

        propagate_base_exclusions(&graph, &mut excluded, diagnostics);

        let order = emission_order(&nodes, &edges, &broken, &excluded)?;

        Ok(Resolved {
            graph,
            order,
            indirect,
            external,
            excluded,
        })
    }
}

/// Referenced families with no presence in the graph, together with
/// the highest version constraint any reference carries.
fn missing_families(
    graph: &TypeGraph,
    external: &BTreeSet<Family>,
) -> BTreeMap<Family, Option<Version>> {
    let present = graph.families();
    let mut missing: BTreeMap<Family, Option<Version>> = BTreeMap::new();
    let mut note = |family: &Family, version: &Option<Version>| {
        if !present.contains(family) && !external.contains(family) {
            let slot = missing.entry(family.clone()).or_insert(None);
            if *version > *slot {
                *slot = *version;
            }
        }
    };
    for def in graph.types.values() {
        match &def.kind {
            TypeKind::Entity(sd) | TypeKind::Complex(sd) => {
                if let Some(base) = &sd.base {
                    note(&base.family, &base.version);
                }
                for prop in &sd.properties {
                    if let TypeReference::Named(r) = &prop.decl.reference {
                        note(&r.family, &r.version);
                    }
                }
            }
            TypeKind::PrimitiveAlias(TypeReference::Named(r)) => note(&r.family, &r.version),
            TypeKind::PrimitiveAlias(TypeReference::Primitive(_)) | TypeKind::Enum(_) => {}
        }
    }
    missing
}

fn fetch_with_retries(
    source: &mut dyn SchemaSource,
    family: &Family,
    version: Option<&Version>,
) -> Option<String> {
    for _ in 0..FETCH_ATTEMPTS {
        match source.fetch(family, version) {
            Ok(Fetched::Document(text)) => return Some(text),
            Ok(Fetched::NotFound) => return None,
            Err(_) => {}
        }
    }
    None
}

/// Depth-first traversal classifying back edges. Embedded property
/// back edges are broken; base back edges exclude the whole cycle.
fn break_cycles(
    nodes: &[QualifiedName],
    edges: &[Vec<Edge>],
    diagnostics: &mut Diagnostics,
) -> (BTreeSet<(usize, PropertyName)>, BTreeSet<usize>) {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let mut color = vec![Color::White; nodes.len()];
    let mut broken: BTreeSet<(usize, PropertyName)> = BTreeSet::new();
    let mut excluded: BTreeSet<usize> = BTreeSet::new();

    for start in 0..nodes.len() {
        if color[start] != Color::White {
            continue;
        }
        // Iterative DFS; the stack holds (node, next edge position).
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        color[start] = Color::Gray;
        while let Some(&mut (node, ref mut pos)) = stack.last_mut() {
            if *pos >= edges[node].len() {
                color[node] = Color::Black;
                stack.pop();
                continue;
            }
            let edge = &edges[node][*pos];
            *pos += 1;
            match color[edge.to] {
                Color::White => {
                    color[edge.to] = Color::Gray;
                    stack.push((edge.to, 0));
                }
                Color::Gray => match &edge.kind {
                    EdgeKind::Property(pname) => {
                        broken.insert((node, pname.clone()));
                    }
                    EdgeKind::Base => {
                        let cycle_start = stack
                            .iter()
                            .position(|&(n, _)| n == edge.to)
                            .unwrap_or(stack.len() - 1);
                        let path: Vec<QualifiedName> = stack[cycle_start..]
                            .iter()
                            .map(|&(n, _)| nodes[n].clone())
                            .collect();
                        for (n, _) in &stack[cycle_start..] {
                            excluded.insert(*n);
                        }
                        diagnostics.push(Diagnostic::UnsupportedCycle { path });
                    }
                },
                Color::Black => {}
            }
        }
    }

    (broken, excluded)
}

/// Exclusions travel down the inheritance chain: a type cannot be
/// flattened if anything it derives from is withheld.
fn propagate_base_exclusions(
    graph: &TypeGraph,
    excluded: &mut BTreeMap<QualifiedName, Exclusion>,
    diagnostics: &mut Diagnostics,
) {
    loop {
        let mut added: Vec<(QualifiedName, QualifiedName)> = Vec::new();
        for (name, def) in &graph.types {
            if excluded.contains_key(name) {
                continue;
            }
            if let TypeKind::Entity(sd) | TypeKind::Complex(sd) = &def.kind {
                if let Some(base) = &sd.base {
                    let target = base.qualified();
                    if excluded.contains_key(&target) {
                        added.push((name.clone(), target));
                    }
                }
            }
        }
        if added.is_empty() {
            break;
        }
        for (name, base) in added {
            diagnostics.push(Diagnostic::BaseTypeExcluded {
                name: name.clone(),
                base: base.clone(),
            });
            excluded.insert(name, Exclusion::BaseExcluded(base));
        }
    }
}

/// Kahn's algorithm over the reduced edge set; ties are broken by
/// qualified name so the order is a pure function of the graph.
fn emission_order(
    nodes: &[QualifiedName],
    edges: &[Vec<Edge>],
    broken: &BTreeSet<(usize, PropertyName)>,
    excluded: &BTreeMap<QualifiedName, Exclusion>,
) -> Result<Vec<QualifiedName>, OrderingError> {
    let included: Vec<bool> = nodes.iter().map(|n| !excluded.contains_key(n)).collect();

    let is_active = |from: usize, edge: &Edge| -> bool {
        if !included[from] || !included[edge.to] {
            return false;
        }
        match &edge.kind {
            EdgeKind::Base => true,
            EdgeKind::Property(pname) => !broken.contains(&(from, pname.clone())),
        }
    };

    // A type depends on everything it embeds; dependencies are
    // declared first.
    let mut dependencies = vec![0usize; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (from, node_edges) in edges.iter().enumerate() {
        for edge in node_edges {
            if is_active(from, edge) {
                dependencies[from] += 1;
                dependents[edge.to].push(from);
            }
        }
    }

    let mut ready: BinaryHeap<Reverse<(&QualifiedName, usize)>> = (0..nodes.len())
        .filter(|&i| included[i] && dependencies[i] == 0)
        .map(|i| Reverse((&nodes[i], i)))
        .collect();

    let mut order = Vec::new();
    while let Some(Reverse((_, i))) = ready.pop() {
        order.push(nodes[i].clone());
        for &dependent in &dependents[i] {
            dependencies[dependent] -= 1;
            if dependencies[dependent] == 0 {
                ready.push(Reverse((&nodes[dependent], dependent)));
            }
        }
    }

    let expected = included.iter().filter(|&&b| b).count();
    if order.len() == expected {
        Ok(order)
    } else {
        let emitted: BTreeSet<&QualifiedName> = order.iter().collect();
        Err(OrderingError {
            remaining: nodes
                .iter()
                .enumerate()
                .filter(|&(i, n)| included[i] && !emitted.contains(n))
                .map(|(_, n)| n.clone())
                .collect(),
        })
    }
}
