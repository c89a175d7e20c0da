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

//! Mapping of `Edm` primitive types to protobuf scalar types.
//!
//! The mapping is a fixed table. Types without a protobuf equivalent
//! (timestamps, durations, GUIDs and anything unrecognized) are
//! carried as strings and the emitted field receives a caveat comment
//! documenting the conversion.

use crate::edmx::SimpleIdentifier;

/// Primitive type of the `Edm` namespace, collapsed to the categories
/// the target format distinguishes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Boolean,
    /// All `Edm` integer widths: Int64, Int32, Int16, Byte, SByte.
    Integer,
    /// `Edm.Decimal`, `Edm.Double` and `Edm.Single`.
    Float,
    DateTime,
    Duration,
    Guid,
    /// A primitive with no protobuf equivalent, carried as a string.
    Other(SimpleIdentifier),
}

impl Primitive {
    /// Classify an `Edm` type by its local name.
    #[must_use]
    pub fn from_edm(name: &SimpleIdentifier) -> Self {
        match name.inner().as_str() {
            "String" => Self::String,
            "Boolean" => Self::Boolean,
            "Int64" | "Int32" | "Int16" | "Byte" | "SByte" => Self::Integer,
            "Decimal" | "Double" | "Single" => Self::Float,
            "DateTimeOffset" => Self::DateTime,
            "Duration" => Self::Duration,
            "Guid" => Self::Guid,
            _ => Self::Other(name.clone()),
        }
    }

    /// The protobuf scalar keyword for this primitive.
    #[must_use]
    pub fn proto_type(&self) -> &'static str {
        match self {
            Self::String | Self::DateTime | Self::Duration | Self::Guid | Self::Other(_) => {
                "string"
            }
            Self::Boolean => "bool",
            Self::Integer => "int64",
            Self::Float => "double",
        }
    }

    /// Conversion caveat for primitives without an exact protobuf
    /// counterpart; rendered as a comment on the emitted field.
    #[must_use]
    pub fn caveat(&self) -> Option<String> {
        match self {
            Self::String | Self::Boolean | Self::Integer | Self::Float => None,
            Self::DateTime => Some("Edm.DateTimeOffset carried as an ISO 8601 string".into()),
            Self::Duration => Some("Edm.Duration carried as an ISO 8601 duration string".into()),
            Self::Guid => Some("Edm.Guid carried in its canonical string form".into()),
            Self::Other(name) => Some(format!(
                "Edm.{name} has no protobuf equivalent; carried as a string"
            )),
        }
    }
}
