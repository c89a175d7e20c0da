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

//! Rendering of proto3 enum declarations.
//!
//! Member order and explicit values are preserved; members without an
//! explicit value are numbered sequentially from the last assigned
//! value. proto3 requires the first listed value to be zero, so a
//! `<NAME>_UNSPECIFIED = 0` sentinel is prepended when the source
//! values start elsewhere; if that collides with an explicit zero
//! further down, aliasing is enabled instead of renumbering.

use crate::compiler::document::EnumMemberDecl;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// One enum declaration ready to render.
#[derive(Debug)]
pub struct EnumDef {
    pub name: String,
    /// Comment above the declaration.
    pub comment: Option<String>,
    pub allow_alias: bool,
    pub entries: Vec<EnumEntry>,
}

/// One enum value.
#[derive(Debug)]
pub struct EnumEntry {
    pub name: String,
    pub value: i64,
}

impl EnumDef {
    /// Assign values to the members of a merged enum type.
    #[must_use]
    pub fn build(name: &str, comment: Option<String>, members: &[EnumMemberDecl]) -> Self {
        let mut next = 0i64;
        let mut entries: Vec<EnumEntry> = members
            .iter()
            .map(|member| {
                let value = member.value.unwrap_or(next);
                next = value + 1;
                EnumEntry {
                    name: format!("{}_{}", name, member.name),
                    value,
                }
            })
            .collect();

        if entries.first().map(|e| e.value != 0).unwrap_or(true) {
            entries.insert(
                0,
                EnumEntry {
                    name: format!("{name}_UNSPECIFIED"),
                    value: 0,
                },
            );
        }

        let mut seen = BTreeSet::new();
        let allow_alias = entries.iter().any(|e| !seen.insert(e.value));

        Self {
            name: name.into(),
            comment,
            allow_alias,
            entries,
        }
    }
}

impl Display for EnumDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(comment) = &self.comment {
            writeln!(f, "// {comment}")?;
        }
        writeln!(f, "enum {} {{", self.name)?;
        if self.allow_alias {
            writeln!(f, "    option allow_alias = true;")?;
        }
        for entry in &self.entries {
            writeln!(f, "    {} = {};", entry.name, entry.value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::edmx::SimpleIdentifier;
    use std::str::FromStr;

    fn member(name: &str, value: Option<i64>) -> EnumMemberDecl {
        EnumMemberDecl {
            name: SimpleIdentifier::from_str(name).unwrap(),
            value,
            description: None,
        }
    }

    #[test]
    fn positional_members_count_from_zero() {
        let def = EnumDef::build(
            "FanMode",
            None,
            &[member("Auto", None), member("Manual", None)],
        );
        assert_eq!(
            def.to_string(),
            "enum FanMode {\n    FanMode_Auto = 0;\n    FanMode_Manual = 1;\n}"
        );
    }

    #[test]
    fn explicit_values_are_preserved_and_resume_counting() {
        let def = EnumDef::build(
            "State",
            None,
            &[
                member("Off", Some(0)),
                member("Lit", Some(4)),
                member("Blinking", None),
            ],
        );
        let values: Vec<_> = def.entries.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![0, 4, 5]);
        assert!(!def.allow_alias);
    }

    #[test]
    fn nonzero_start_gets_a_sentinel() {
        let def = EnumDef::build("Code", None, &[member("A", Some(3)), member("B", None)]);
        assert_eq!(def.entries[0].name, "Code_UNSPECIFIED");
        assert_eq!(def.entries[0].value, 0);
        assert_eq!(def.entries[1].value, 3);
    }

    #[test]
    fn zero_alias_enables_allow_alias() {
        let def = EnumDef::build("Code", None, &[member("A", Some(3)), member("B", Some(0))]);
        assert!(def.allow_alias);
        assert!(def.to_string().contains("option allow_alias = true;"));
    }

    #[test]
    fn empty_enum_still_has_a_zero_value() {
        let def = EnumDef::build("Empty", None, &[]);
        assert_eq!(def.entries.len(), 1);
        assert_eq!(def.entries[0].value, 0);
    }
}
