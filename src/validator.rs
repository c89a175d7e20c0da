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

//! Downstream validation boundary.
//!
//! The engine does not depend on a validator for its own correctness;
//! the trait exists so emitted units can be wired straight into a
//! downstream IDL compiler. Driving `protoc` itself is a collaborator
//! concern and lives outside this crate.

use crate::generator::proto::ProtoUnit;

/// Verdict of a validator over the full emitted output set.
#[derive(Debug)]
pub struct Validation {
    pub passed: bool,
    pub diagnostics: Vec<String>,
}

/// Consumer that checks emitted units, e.g. an external IDL compiler.
pub trait Validator {
    fn validate(&self, units: &[ProtoUnit]) -> Validation;
}

/// Validator that accepts everything. Stands in when no downstream
/// compiler is wired up.
#[derive(Debug, Default)]
pub struct AcceptAll;

impl Validator for AcceptAll {
    fn validate(&self, _: &[ProtoUnit]) -> Validation {
        Validation {
            passed: true,
            diagnostics: Vec::new(),
        }
    }
}
