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

use crate::compiler::resolver::OrderingError;
use crate::generator::proto::EmissionError;
use crate::manifest::Error as ManifestError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::io::Error as IoError;
use std::path::PathBuf;

/// Run-level errors. Everything here halts the run; per-document and
/// per-type failures travel through diagnostics instead.
#[derive(Debug)]
pub enum Error {
    AtLeastOneCsdlFileNeeded,
    Io(String, IoError),
    Manifest(PathBuf, ManifestError),
    Ordering(OrderingError),
    Emission(EmissionError),
    WriteOutput(PathBuf, IoError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::AtLeastOneCsdlFileNeeded => {
                "at least one CSDL file is needed for translation".fmt(f)
            }
            Self::Io(fname, error) => write!(f, "input/output error: file: {fname}: {error}"),
            Self::Manifest(fname, error) => {
                write!(f, "manifest error: file: {}: {error}", fname.display())
            }
            Self::Ordering(error) => write!(f, "{error}"),
            Self::Emission(error) => write!(f, "{error}"),
            Self::WriteOutput(fname, error) => {
                write!(f, "failed to write output file: {}: {error}", fname.display())
            }
        }
    }
}

impl StdError for Error {}
