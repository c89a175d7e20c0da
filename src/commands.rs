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

//! Command-line entry points for the translator.
//!
//! The `Compile` command reads a corpus of CSDL documents (listed on
//! the command line or in a TOML manifest), resolves it against an
//! optional local schema directory, and writes one proto unit per
//! namespace family. Documents that fail to parse are reported and
//! skipped; the run continues with the rest of the corpus and ends
//! with a report that names every excluded namespace and type.

use crate::compiler::document::documents_from_edmx;
use crate::compiler::document::SchemaDocument;
use crate::compiler::source::DirectorySource;
use crate::compiler::source::NullSource;
use crate::compiler::source::SchemaSource;
use crate::compiler::Diagnostic;
use crate::compiler::Diagnostics;
use crate::compiler::Resolver;
use crate::edmx::Edmx;
use crate::error::Error;
use crate::generator::proto::ProtoGenerator;
use crate::manifest::TranslationManifest;
use clap::Subcommand;
use std::fs::create_dir_all;
use std::fs::write;
use std::fs::File;
use std::io::Read as _;
use std::path::PathBuf;

/// Translator high-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate CSDL schemas to proto units.
    Compile {
        /// TOML manifest naming the corpus; command-line documents
        /// and directories are added on top of it.
        #[arg(short, long)]
        manifest: Option<PathBuf>,
        /// CSDL documents to translate.
        csdls: Vec<String>,
        /// Directory consulted for referenced namespaces that are
        /// not part of the corpus.
        #[arg(short, long)]
        schema_dir: Option<PathBuf>,
        /// Output directory for the generated proto units.
        #[arg(short, long, default_value = "proto")]
        output: PathBuf,
    },
}

/// Process a translator command.
///
/// # Errors
///
/// Returns an error if command processing fails as a whole;
/// per-document failures are reported in the returned lines instead.
pub fn process_command(command: &Commands) -> Result<Vec<String>, Error> {
    match command {
        Commands::Compile {
            manifest,
            csdls,
            schema_dir,
            output,
        } => {
            let manifest = manifest
                .as_ref()
                .map(|path| {
                    TranslationManifest::read(path).map_err(|e| Error::Manifest(path.clone(), e))
                })
                .transpose()?
                .unwrap_or_default();

            let files: Vec<&String> = manifest.csdl_files.iter().chain(csdls.iter()).collect();
            if files.is_empty() {
                return Err(Error::AtLeastOneCsdlFileNeeded);
            }

            let mut diagnostics = Diagnostics::default();
            let documents = read_documents(&files, &mut diagnostics)?;

            let mut source: Box<dyn SchemaSource> =
                match schema_dir.as_ref().or(manifest.schema_dir.as_ref()) {
                    Some(dir) => Box::new(DirectorySource::new(dir.clone())),
                    None => Box::new(NullSource),
                };
            let resolved = Resolver::new(source.as_mut())
                .resolve(documents, &mut diagnostics)
                .map_err(Error::Ordering)?;

            let units = ProtoGenerator::new(&resolved)
                .generate()
                .map_err(Error::Emission)?;

            let out_dir = manifest.output_dir.as_ref().unwrap_or(output);
            create_dir_all(out_dir).map_err(|e| Error::WriteOutput(out_dir.clone(), e))?;
            for unit in &units {
                let path = out_dir.join(&unit.file_name);
                write(&path, &unit.content).map_err(|e| Error::WriteOutput(path.clone(), e))?;
            }

            let mut display_output = Vec::new();
            display_output.push(format!(
                "{} proto units written to {}",
                units.len(),
                out_dir.display()
            ));
            for diagnostic in diagnostics.iter() {
                display_output.push(format!("warning: {diagnostic}"));
            }
            for (name, reason) in &resolved.excluded {
                display_output.push(format!("excluded: {name}: {reason}"));
            }
            for family in &resolved.external {
                display_output.push(format!(
                    "external: namespace {family} was not available; references degraded"
                ));
            }
            Ok(display_output)
        }
    }
}

/// Parse every document, isolating per-document failures: a document
/// that does not parse is reported and the rest of the corpus
/// continues.
fn read_documents(
    files: &[&String],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<SchemaDocument>, Error> {
    let mut documents = Vec::new();
    for fname in files {
        let mut content = String::new();
        let mut file =
            File::open(fname).map_err(|err| Error::Io((*fname).clone(), err))?;
        file.read_to_string(&mut content)
            .map_err(|err| Error::Io((*fname).clone(), err))?;
        match Edmx::parse(&content) {
            Ok(edmx) => documents.extend(documents_from_edmx(&edmx)),
            Err(error) => diagnostics.push(Diagnostic::Parse {
                source_name: (*fname).clone(),
                error,
            }),
        }
    }
    Ok(documents)
}
