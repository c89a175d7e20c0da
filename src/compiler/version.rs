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

//! Schema version triples.

use crate::edmx::SimpleIdentifier;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Version of a namespace release, parsed from the Redfish-style
/// namespace segment `v<major>_<minor>_<errata>` (also covers the
/// Swordfish year-based releases such as `v2021_4_0`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub errata: u32,
}

impl Version {
    #[must_use]
    pub const fn new(major: u32, minor: u32, errata: u32) -> Self {
        Self {
            major,
            minor,
            errata,
        }
    }

    /// Parse a namespace segment as a version. Missing minor and
    /// errata components default to zero. Returns `None` if the
    /// segment is not a version marker.
    #[must_use]
    pub fn parse_segment(id: &SimpleIdentifier) -> Option<Self> {
        let rest = id.inner().strip_prefix('v')?;
        let mut parts = rest.split('_');
        let mut next_number = || -> Option<Option<u32>> {
            match parts.next() {
                None => Some(None),
                Some(p) => p.parse::<u32>().ok().map(Some),
            }
        };
        let major = next_number()??;
        let minor = next_number()?.unwrap_or(0);
        let errata = next_number()?.unwrap_or(0);
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            major,
            minor,
            errata,
        })
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "v{}_{}_{}", self.major, self.minor, self.errata)
    }
}
