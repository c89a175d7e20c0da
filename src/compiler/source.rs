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

//! External schema document source.
//!
//! The resolver asks a `SchemaSource` for namespaces it cannot find
//! in the supplied corpus. Retrieval from a remote schema repository
//! is a collaborator concern; the implementations here cover the
//! local cases: a directory of downloaded documents, an in-memory
//! map, and the empty source.

use crate::compiler::Family;
use crate::compiler::Version;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::fs::File;
use std::io::Error as IoError;
use std::io::Read as _;
use std::path::PathBuf;

/// Outcome of one fetch.
#[derive(Debug)]
pub enum Fetched {
    /// Raw CSDL text of the document that declares the namespace.
    Document(String),
    /// The source definitively does not have the namespace.
    NotFound,
}

/// Transient fetch failure. The resolver retries a bounded number of
/// times before degrading the referencing properties to placeholders.
#[derive(Debug)]
pub struct SourceError {
    pub message: String,
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "schema source error: {}", self.message)
    }
}

impl From<IoError> for SourceError {
    fn from(err: IoError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Provider of raw schema documents by namespace family.
///
/// Must be idempotent and side-effect-free from the engine's
/// perspective; caching is the implementation's concern. The version
/// is a hint: a source may serve a newer release and the merge keeps
/// the newest anyway.
pub trait SchemaSource {
    /// Fetch the document declaring `family`.
    ///
    /// # Errors
    ///
    /// `SourceError` on a transient failure worth retrying.
    fn fetch(&mut self, family: &Family, version: Option<&Version>)
        -> Result<Fetched, SourceError>;
}

/// Source that has nothing. Every unresolved namespace degrades to a
/// placeholder.
#[derive(Debug, Default)]
pub struct NullSource;

impl SchemaSource for NullSource {
    fn fetch(&mut self, _: &Family, _: Option<&Version>) -> Result<Fetched, SourceError> {
        Ok(Fetched::NotFound)
    }
}

/// Directory of schema documents following the DMTF bundle naming:
/// `<Family>_v1.xml`, with `<Family>.xml` accepted as a fallback.
#[derive(Debug)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl SchemaSource for DirectorySource {
    fn fetch(&mut self, family: &Family, _: Option<&Version>) -> Result<Fetched, SourceError> {
        for name in &[format!("{family}_v1.xml"), format!("{family}.xml")] {
            let path = self.dir.join(name);
            if path.is_file() {
                let mut content = String::new();
                File::open(&path)?.read_to_string(&mut content)?;
                return Ok(Fetched::Document(content));
            }
        }
        Ok(Fetched::NotFound)
    }
}

/// In-memory source keyed by family name. Used by tests and by
/// callers that preload documents themselves.
#[derive(Debug, Default)]
pub struct MapSource {
    docs: BTreeMap<String, String>,
}

impl MapSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, family: impl Into<String>, document: impl Into<String>) {
        self.docs.insert(family.into(), document.into());
    }
}

impl SchemaSource for MapSource {
    fn fetch(&mut self, family: &Family, _: Option<&Version>) -> Result<Fetched, SourceError> {
        Ok(match self.docs.get(&family.to_string()) {
            Some(text) => Fetched::Document(text.clone()),
            None => Fetched::NotFound,
        })
    }
}
