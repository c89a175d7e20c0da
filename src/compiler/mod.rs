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

//! Compiler of multiple schema documents into a resolved type graph.

/// Namespace families and qualified names
pub mod name;

/// Version triples
pub mod version;

/// Schema documents in the engine model
pub mod document;

/// Global type graph and version merge
pub mod graph;

/// Reference resolution, cycle breaking and emission order
pub mod resolver;

/// External schema document source
pub mod source;

/// Aggregated run diagnostics
pub mod diagnostics;

/// Reexport `Family` to the level of the compiler.
pub type Family = name::Family;
/// Reexport `QualifiedName` to the level of the compiler.
pub type QualifiedName = name::QualifiedName;
/// Reexport `Version` to the level of the compiler.
pub type Version = version::Version;
/// Reexport `TypeGraph` to the level of the compiler.
pub type TypeGraph = graph::TypeGraph;
/// Reexport `Resolved` to the level of the compiler.
pub type Resolved = resolver::Resolved;
/// Reexport `Resolver` to the level of the compiler.
pub type Resolver<'s> = resolver::Resolver<'s>;
/// Reexport `Diagnostics` to the level of the compiler.
pub type Diagnostics = diagnostics::Diagnostics;
/// Reexport `Diagnostic` to the level of the compiler.
pub type Diagnostic = diagnostics::Diagnostic;
