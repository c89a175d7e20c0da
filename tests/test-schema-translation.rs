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

//! End-to-end translation over an in-memory corpus.

use csdl_proto_compiler::compiler::document::documents_from_edmx;
use csdl_proto_compiler::compiler::source::MapSource;
use csdl_proto_compiler::compiler::source::NullSource;
use csdl_proto_compiler::compiler::source::SchemaSource;
use csdl_proto_compiler::compiler::Diagnostic;
use csdl_proto_compiler::compiler::Diagnostics;
use csdl_proto_compiler::compiler::Resolver;
use csdl_proto_compiler::edmx::Edmx;
use csdl_proto_compiler::generator::proto::ProtoGenerator;
use csdl_proto_compiler::generator::proto::ProtoUnit;
use csdl_proto_compiler::validator::AcceptAll;
use csdl_proto_compiler::validator::Validator;

fn translate_with(
    source: &mut dyn SchemaSource,
    documents: &[&str],
) -> (Vec<ProtoUnit>, Diagnostics) {
    let docs: Vec<_> = documents
        .iter()
        .map(|d| Edmx::parse(d).expect("corpus document must parse"))
        .collect();
    let docs = docs.iter().flat_map(documents_from_edmx).collect();
    let mut diagnostics = Diagnostics::default();
    let resolved = Resolver::new(source)
        .resolve(docs, &mut diagnostics)
        .expect("resolution must complete");
    let units = ProtoGenerator::new(&resolved)
        .generate()
        .expect("emission must complete");
    (units, diagnostics)
}

fn translate(documents: &[&str]) -> (Vec<ProtoUnit>, Diagnostics) {
    let mut source = NullSource;
    translate_with(&mut source, documents)
}

fn unit<'u>(units: &'u [ProtoUnit], file_name: &str) -> &'u ProtoUnit {
    units
        .iter()
        .find(|u| u.file_name == file_name)
        .unwrap_or_else(|| panic!("missing unit {}", file_name))
}

const SERVICE_V1_0: &str = r#"<edmx:Edmx Version="4.0">
     <edmx:DataServices>
       <Schema Namespace="Service.v1_0_0">
         <EntityType Name="Service">
           <Property Name="Id" Type="Edm.String"/>
           <Property Name="Healthy" Type="Edm.Boolean"/>
         </EntityType>
       </Schema>
     </edmx:DataServices>
   </edmx:Edmx>"#;

const SERVICE_V1_1: &str = r#"<edmx:Edmx Version="4.0">
     <edmx:DataServices>
       <Schema Namespace="Service.v1_1_0">
         <EntityType Name="Service" BaseType="Service.v1_0_0.Service">
           <Property Name="Uptime" Type="Edm.Int64"/>
         </EntityType>
       </Schema>
     </edmx:DataServices>
   </edmx:Edmx>"#;

const SERVICE_V2021: &str = r#"<edmx:Edmx Version="4.0">
     <edmx:DataServices>
       <Schema Namespace="Service.v2021_4_0">
         <EntityType Name="Service" BaseType="Service.v1_1_0.Service">
           <Property Name="Load" Type="Edm.Decimal"/>
         </EntityType>
       </Schema>
     </edmx:DataServices>
   </edmx:Edmx>"#;

#[test]
fn version_selection_keeps_only_the_newest_shape() {
    let (units, diags) = translate(&[SERVICE_V1_0, SERVICE_V1_1, SERVICE_V2021]);
    assert!(diags.is_empty());
    let service = unit(&units, "Service.proto");
    // One message, carrying the full merged property sequence in
    // first-introduction order.
    assert_eq!(service.content.matches("message Service").count(), 1);
    let id_at = service.content.find("string Id = 1;").unwrap();
    let healthy_at = service.content.find("bool Healthy = 2;").unwrap();
    let uptime_at = service.content.find("int64 Uptime = 3;").unwrap();
    let load_at = service.content.find("double Load = 4;").unwrap();
    assert!(id_at < healthy_at && healthy_at < uptime_at && uptime_at < load_at);
}

#[test]
fn output_is_idempotent_and_input_order_independent() {
    let (first, _) = translate(&[SERVICE_V1_0, SERVICE_V1_1, SERVICE_V2021]);
    let (second, _) = translate(&[SERVICE_V1_0, SERVICE_V1_1, SERVICE_V2021]);
    assert_eq!(first, second, "reruns must be byte-identical");

    let (permuted, _) = translate(&[SERVICE_V2021, SERVICE_V1_0, SERVICE_V1_1]);
    assert_eq!(first, permuted, "document supply order must not matter");
}

#[test]
fn primitive_round_trip_per_kind() {
    let corpus = r#"<edmx:Edmx Version="4.0">
         <edmx:DataServices>
           <Schema Namespace="Sample.v1_0_0">
             <ComplexType Name="Sample">
               <Property Name="Text" Type="Edm.String"/>
               <Property Name="Count" Type="Edm.Int64"/>
               <Property Name="Ratio" Type="Edm.Decimal"/>
               <Property Name="Enabled" Type="Edm.Boolean"/>
             </ComplexType>
           </Schema>
         </edmx:DataServices>
       </edmx:Edmx>"#;
    let (units, _) = translate(&[corpus]);
    let sample = unit(&units, "Sample.proto");
    assert!(sample.content.contains("string Text = 1;"));
    assert!(sample.content.contains("int64 Count = 2;"));
    assert!(sample.content.contains("double Ratio = 3;"));
    assert!(sample.content.contains("bool Enabled = 4;"));
}

#[test]
fn mutual_reference_compiles_with_one_indirection() {
    let corpus = r#"<edmx:Edmx Version="4.0">
         <edmx:DataServices>
           <Schema Namespace="Pair.v1_0_0">
             <ComplexType Name="Alpha">
               <Property Name="Partner" Type="Pair.v1_0_0.Beta"/>
             </ComplexType>
             <ComplexType Name="Beta">
               <Property Name="Partner" Type="Pair.v1_0_0.Alpha"/>
             </ComplexType>
           </Schema>
         </edmx:DataServices>
       </edmx:Edmx>"#;
    let (units, _) = translate(&[corpus]);
    let pair = unit(&units, "Pair.proto");
    // Exactly one of the two references became a by-reference link.
    assert_eq!(
        pair.content.matches("NavigationReference Partner").count(),
        1
    );
    // The embedded partner is declared before its dependent, so the
    // unit needs no forward declarations.
    let beta_at = pair.content.find("message Beta ").unwrap();
    let alpha_at = pair.content.find("message Alpha ").unwrap();
    assert!(beta_at < alpha_at);
}

#[test]
fn inheritance_cycle_is_isolated() {
    let corpus = r#"<edmx:Edmx Version="4.0">
         <edmx:DataServices>
           <Schema Namespace="Rings.v1_0_0">
             <ComplexType Name="X" BaseType="Rings.v1_0_0.Y">
               <Property Name="A" Type="Edm.String"/>
             </ComplexType>
             <ComplexType Name="Y" BaseType="Rings.v1_0_0.X">
               <Property Name="B" Type="Edm.String"/>
             </ComplexType>
             <ComplexType Name="Bystander">
               <Property Name="Name" Type="Edm.String"/>
             </ComplexType>
           </Schema>
         </edmx:DataServices>
       </edmx:Edmx>"#;
    let (units, diags) = translate(&[corpus]);
    let rings = unit(&units, "Rings.proto");
    assert!(rings.content.contains("message Bystander"));
    assert!(!rings.content.contains("message X"));
    assert!(!rings.content.contains("message Y"));
    let cycle = diags
        .iter()
        .find_map(|d| match d {
            Diagnostic::UnsupportedCycle { path } => Some(path),
            _ => None,
        })
        .expect("the cycle must be diagnosed");
    let names: Vec<_> = cycle.iter().map(ToString::to_string).collect();
    assert!(names.contains(&"Rings.X".to_string()));
    assert!(names.contains(&"Rings.Y".to_string()));
}

#[test]
fn missing_namespace_is_fetched_from_the_source() {
    let chassis = r#"<edmx:Edmx Version="4.0">
         <edmx:DataServices>
           <Schema Namespace="Chassis.v1_0_0">
             <EntityType Name="Chassis">
               <Property Name="Status" Type="Status.Condition"/>
             </EntityType>
           </Schema>
         </edmx:DataServices>
       </edmx:Edmx>"#;
    let status = r#"<edmx:Edmx Version="4.0">
         <edmx:DataServices>
           <Schema Namespace="Status">
             <ComplexType Name="Condition">
               <Property Name="Severity" Type="Edm.String"/>
             </ComplexType>
           </Schema>
         </edmx:DataServices>
       </edmx:Edmx>"#;
    let mut source = MapSource::new();
    source.insert("Status", status);
    let (units, diags) = translate_with(&mut source, &[chassis]);
    assert!(diags.is_empty());
    let chassis_unit = unit(&units, "Chassis.proto");
    assert!(chassis_unit.content.contains("import \"Status.proto\";"));
    assert!(chassis_unit
        .content
        .contains("    .Status.Condition Status = 1;"));
    assert!(units.iter().any(|u| u.file_name == "Status.proto"));
}

#[test]
fn unavailable_namespace_degrades_to_a_commented_placeholder() {
    let corpus = r#"<edmx:Edmx Version="4.0">
         <edmx:DataServices>
           <Schema Namespace="Card.v1_0_0">
             <ComplexType Name="Card">
               <Property Name="VendorData" Type="Acme.v1_0_0.Blob"/>
               <Property Name="Name" Type="Edm.String"/>
             </ComplexType>
           </Schema>
         </edmx:DataServices>
       </edmx:Edmx>"#;
    let (units, diags) = translate(&[corpus]);
    let card = unit(&units, "Card.proto");
    assert!(card.content.contains(
        "    // unresolved reference to Acme.Blob; carried as an opaque string\n\
         \x20   string VendorData = 1;"
    ));
    assert!(card.content.contains("string Name = 2;"));
    assert!(diags
        .iter()
        .any(|d| matches!(d, Diagnostic::UnresolvedReference { .. })));
}

#[test]
fn emitted_units_satisfy_the_validator_interface() {
    let (units, _) = translate(&[SERVICE_V1_0, SERVICE_V1_1, SERVICE_V2021]);
    let verdict = AcceptAll.validate(&units);
    assert!(verdict.passed);
    assert!(verdict.diagnostics.is_empty());
}
