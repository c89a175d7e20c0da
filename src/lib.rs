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

//! Translator from Redfish/Swordfish CSDL schemas to proto3 units.
//!
//! The pipeline: the EDMX layer parses raw documents; the compiler
//! folds them into a version-merged type graph, resolves every
//! cross-document reference (fetching missing namespaces from a
//! `SchemaSource`), breaks reference cycles and computes a
//! deterministic emission order; the proto generator serializes the
//! resolved graph, one unit per namespace family.

pub mod commands;
pub mod compiler;
pub mod edmx;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod mapper;
pub mod validator;

pub use error::Error;
