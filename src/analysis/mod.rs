// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Key analysis of note collections.

pub mod tonic;

pub use tonic::{analyze_tonic, infer_tonic, TonicAnalysis};
