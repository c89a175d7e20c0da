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

//! Deserialization of edm:Annotation and OData term lookup helpers.

use crate::edmx::QualifiedName;
use serde::Deserialize;

/// 14.3 Element edm:Annotation
///
/// Only constant expressions used by the Redfish vocabulary are
/// captured; nested records and collections are ignored.
#[derive(Debug, Deserialize)]
pub struct Annotation {
    /// 14.3.1 Attribute Term
    #[serde(rename = "@Term")]
    pub term: QualifiedName,
    #[serde(rename = "@String")]
    pub string: Option<String>,
    #[serde(rename = "@Bool")]
    pub bool_value: Option<bool>,
    #[serde(rename = "@EnumMember")]
    pub enum_member: Option<String>,
}

impl Annotation {
    /// Check the annotation term against a vocabulary name, e.g.
    /// (`"OData"`, `"Description"`).
    #[must_use]
    pub fn is_term(&self, vocabulary: &str, name: &str) -> bool {
        self.term.name.inner() == name
            && self.term.namespace.ids.len() == 1
            && self.term.namespace.ids[0].inner() == vocabulary
    }
}

/// `OData.Description` of an annotated element.
#[must_use]
pub fn description(annotations: &[Annotation]) -> Option<&str> {
    annotations
        .iter()
        .find(|a| a.is_term("OData", "Description"))
        .and_then(|a| a.string.as_deref())
}

/// `OData.LongDescription` of an annotated element.
#[must_use]
pub fn long_description(annotations: &[Annotation]) -> Option<&str> {
    annotations
        .iter()
        .find(|a| a.is_term("OData", "LongDescription"))
        .and_then(|a| a.string.as_deref())
}

/// Whether `OData.Permissions` marks the element read-only.
#[must_use]
pub fn is_read_only(annotations: &[Annotation]) -> bool {
    annotations
        .iter()
        .filter(|a| a.is_term("OData", "Permissions"))
        .any(|a| a.enum_member.as_deref() == Some("OData.Permission/Read"))
}

/// Whether `OData.AutoExpand` asks to inline the navigation target.
#[must_use]
pub fn auto_expand(annotations: &[Annotation]) -> bool {
    annotations
        .iter()
        .any(|a| a.is_term("OData", "AutoExpand"))
}

/// Whether `OData.AutoExpandReferences` asks to inline only the
/// references of the navigation target.
#[must_use]
pub fn auto_expand_references(annotations: &[Annotation]) -> bool {
    annotations
        .iter()
        .any(|a| a.is_term("OData", "AutoExpandReferences"))
}
