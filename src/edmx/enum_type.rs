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

use crate::edmx::annotation::Annotation;
use crate::edmx::LocalTypeName;
use crate::edmx::SimpleIdentifier;
use serde::Deserialize;
use tagged_types::TaggedType;

pub type EnumMemberName = TaggedType<SimpleIdentifier, EnumMemberNameTag>;
#[doc(hidden)]
#[derive(tagged_types::Tag)]
#[implement(Clone, Eq, PartialEq)]
#[transparent(Deserialize, FromStr, Debug, Display)]
#[capability(inner_access)]
pub enum EnumMemberNameTag {}

/// 10.1 Element edm:EnumType
#[derive(Debug, Deserialize)]
pub struct DeEnumType {
    /// 10.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: LocalTypeName,
    /// Child elements of `EnumType`, in declaration order.
    #[serde(rename = "$value", default)]
    pub items: Vec<DeEnumTypeItem>,
}

#[derive(Debug, Deserialize)]
pub enum DeEnumTypeItem {
    /// 10.2 Element edm:Member
    Member(EnumMember),
    /// Annotations can appear in any type.
    Annotation(Annotation),
}

/// 10.2 Element edm:Member
///
/// A member without an explicit `Value` receives a positional value
/// downstream; an explicit `Value` is preserved verbatim.
#[derive(Debug, Deserialize)]
pub struct EnumMember {
    /// 10.2.1 Attribute Name
    #[serde(rename = "@Name")]
    pub name: EnumMemberName,
    /// 10.2.2 Attribute Value
    #[serde(rename = "@Value")]
    pub value: Option<i64>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<Annotation>,
}

/// Validated edm:EnumType.
#[derive(Debug)]
pub struct EnumType {
    pub name: LocalTypeName,
    pub members: Vec<EnumMember>,
    pub annotations: Vec<Annotation>,
}

impl DeEnumType {
    pub fn validate(self) -> EnumType {
        let (members, annotations) =
            self.items
                .into_iter()
                .fold((Vec::new(), Vec::new()), |(mut ms, mut anns), v| {
                    match v {
                        DeEnumTypeItem::Member(v) => ms.push(v),
                        DeEnumTypeItem::Annotation(v) => anns.push(v),
                    }
                    (ms, anns)
                });
        EnumType {
            name: self.name,
            members,
            annotations,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn members_keep_order_and_explicit_values() {
        let data = r#"<EnumType Name="IndicatorLED">
             <Member Name="Unknown" Value="0"/>
             <Member Name="Lit" Value="2"/>
             <Member Name="Blinking"/>
             <Annotation Term="OData.Description" String="LED state."/>
           </EnumType>"#;
        let et = quick_xml::de::from_str::<DeEnumType>(data).unwrap().validate();
        assert_eq!(et.members.len(), 3);
        assert_eq!(et.members[0].value, Some(0));
        assert_eq!(et.members[1].value, Some(2));
        assert_eq!(et.members[2].value, None);
        assert_eq!(et.members[2].name.inner().as_ref(), "Blinking");
        assert_eq!(et.annotations.len(), 1);
    }
}
