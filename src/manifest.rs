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

//! Translation manifest.
//!
//! A TOML file that names the corpus to translate, so build scripts
//! do not have to pass hundreds of document paths on the command
//! line.

use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::fs::File;
use std::io::Error as IoError;
use std::io::Read as _;
use std::path::Path;
use std::path::PathBuf;
use toml::de::Error as TomlError;

/// Manifest that defines one translation run.
#[derive(Deserialize, Debug, Default)]
pub struct TranslationManifest {
    /// CSDL documents to translate.
    #[serde(rename = "csdl-files", default)]
    pub csdl_files: Vec<String>,
    /// Directory consulted for namespaces the corpus references but
    /// does not contain.
    #[serde(rename = "schema-dir")]
    pub schema_dir: Option<PathBuf>,
    /// Directory the proto units are written to.
    #[serde(rename = "output-dir")]
    pub output_dir: Option<PathBuf>,
}

impl TranslationManifest {
    /// Read a manifest from a TOML file.
    ///
    /// # Errors
    ///
    /// - `Error::Io` if the file cannot be read
    /// - `Error::Toml` if the content is not a valid manifest
    pub fn read(fname: &Path) -> Result<Self, Error> {
        let mut file = File::open(fname).map_err(Error::Io)?;
        let mut content = String::new();
        file.read_to_string(&mut content).map_err(Error::Io)?;
        toml::from_str(&content).map_err(Error::Toml)
    }
}

#[derive(Debug)]
pub enum Error {
    Io(IoError),
    Toml(TomlError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io(err) => write!(f, "input/output error: {err}"),
            Self::Toml(err) => write!(f, "manifest file format error: {err}"),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_a_full_manifest() {
        let manifest: TranslationManifest = toml::from_str(
            r#"
            csdl-files = ["csdl/ServiceRoot_v1.xml", "csdl/Chassis_v1.xml"]
            schema-dir = "csdl"
            output-dir = "proto"
            "#,
        )
        .unwrap();
        assert_eq!(manifest.csdl_files.len(), 2);
        assert_eq!(manifest.schema_dir, Some(PathBuf::from("csdl")));
        assert_eq!(manifest.output_dir, Some(PathBuf::from("proto")));
    }

    #[test]
    fn all_fields_are_optional() {
        let manifest: TranslationManifest = toml::from_str("").unwrap();
        assert!(manifest.csdl_files.is_empty());
        assert!(manifest.schema_dir.is_none());
    }
}
