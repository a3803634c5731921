//! `ferrule type` and `ferrule sig`: inspect translations without building.

use ferrule_codegen::{translate_signature, HostSignature};
use serde::Serialize;

use crate::{ReportFormat, SigArgs};

/// A translated annotation as reported to the user.
#[derive(Debug, Serialize)]
struct TypeReport {
    annotation: String,
    cpp: String,
    headers: Vec<String>,
}

/// A translated signature as reported to the user.
#[derive(Debug, Serialize)]
struct SignatureReport {
    signature: String,
    binding_annotations: Vec<String>,
    headers: Vec<String>,
}

/// Runs `ferrule type`.
pub fn run_type(annotation: &str, format: ReportFormat) -> Result<i32, Box<dyn std::error::Error>> {
    let target = ferrule_types::translate(annotation)?;
    let report = TypeReport {
        annotation: annotation.to_string(),
        cpp: target.to_string(),
        headers: target.headers().into_iter().map(str::to_string).collect(),
    };
    println!("{}", render_type(&report, format)?);
    Ok(0)
}

/// Runs `ferrule sig`.
pub fn run(args: &SigArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let report = signature_report(&args.name, &args.signature)?;
    println!("{}", render_signature(&report, args.format)?);
    Ok(0)
}

fn signature_report(name: &str, text: &str) -> Result<SignatureReport, Box<dyn std::error::Error>> {
    let signature = HostSignature::parse(text)?;
    let translated = translate_signature(name, &signature)?;
    Ok(SignatureReport {
        signature: translated.rendered,
        binding_annotations: translated.binding_annotations,
        headers: translated.headers,
    })
}

fn render_type(report: &TypeReport, format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report),
        ReportFormat::Text => {
            let mut out = report.cpp.clone();
            for header in &report.headers {
                out.push_str(&format!("\n#include {header}"));
            }
            Ok(out)
        }
    }
}

fn render_signature(report: &SignatureReport, format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report),
        ReportFormat::Text => {
            let mut out = report.signature.clone();
            if !report.binding_annotations.is_empty() {
                out.push_str(&format!("\nbinding: {}", report.binding_annotations.join(", ")));
            }
            for header in &report.headers {
                out.push_str(&format!("\n#include {header}"));
            }
            Ok(out)
        }
    }
}
