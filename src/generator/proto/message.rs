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

//! Rendering of proto3 message declarations.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// One message declaration ready to render.
#[derive(Debug)]
pub struct Message {
    pub name: String,
    /// Comment above the declaration.
    pub comment: Option<String>,
    pub entries: Vec<MessageEntry>,
}

/// Body line of a message.
#[derive(Debug)]
pub enum MessageEntry {
    /// `// ...` line inside the body.
    Comment(String),
    /// Blank separator between flattened property groups.
    Blank,
    Field(Field),
}

/// One numbered field.
#[derive(Debug)]
pub struct Field {
    pub repeated: bool,
    pub type_name: String,
    pub name: String,
    pub number: u32,
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(comment) = &self.comment {
            writeln!(f, "// {comment}")?;
        }
        writeln!(f, "message {} {{", self.name)?;
        for entry in &self.entries {
            match entry {
                MessageEntry::Comment(text) => writeln!(f, "    // {text}")?,
                MessageEntry::Blank => writeln!(f)?,
                MessageEntry::Field(field) => {
                    let repeated = if field.repeated { "repeated " } else { "" };
                    writeln!(
                        f,
                        "    {repeated}{} {} = {};",
                        field.type_name, field.name, field.number
                    )?;
                }
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_fields_and_comments() {
        let message = Message {
            name: "Drive".into(),
            comment: Some("A disk drive.".into()),
            entries: vec![
                MessageEntry::Comment("from Drive.Drive".into()),
                MessageEntry::Field(Field {
                    repeated: false,
                    type_name: "string".into(),
                    name: "Model".into(),
                    number: 1,
                }),
                MessageEntry::Field(Field {
                    repeated: true,
                    type_name: ".Volume.Volume".into(),
                    name: "Volumes".into(),
                    number: 2,
                }),
            ],
        };
        assert_eq!(
            message.to_string(),
            "// A disk drive.\n\
             message Drive {\n\
             \x20   // from Drive.Drive\n\
             \x20   string Model = 1;\n\
             \x20   repeated .Volume.Volume Volumes = 2;\n\
             }"
        );
    }
}
