use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;
use svccall_parcel::ParcelValue;
use svccall_schema::{DecodedReturn, MethodSchema, ServiceInterface};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct CallOutput<'a> {
    service: &'a str,
    method: &'a str,
    code: u32,
    value: Value,
}

#[derive(Serialize)]
struct MethodOutput<'a> {
    service: &'a str,
    interface: &'a str,
    code: u32,
    name: &'a str,
    arguments: Option<Vec<&'static str>>,
    returns: Option<&'static str>,
}

#[derive(Serialize)]
struct DecodeOutput {
    bytes: String,
    status: Option<i32>,
    value: Value,
}

pub fn value_to_json(value: Option<&ParcelValue>) -> Value {
    match value {
        None | Some(ParcelValue::Null) => Value::Null,
        Some(ParcelValue::Int32(v)) => Value::from(*v),
        Some(ParcelValue::Int64(v)) => Value::from(*v),
        Some(ParcelValue::Bool(v)) => Value::from(*v),
        Some(ParcelValue::String(v)) => Value::from(v.as_str()),
    }
}

fn value_text(value: Option<&ParcelValue>) -> String {
    match value {
        Some(ParcelValue::String(text)) => text.clone(),
        Some(value) => value.to_string(),
        None => "(void)".to_string(),
    }
}

pub fn print_call(
    service: &ServiceInterface,
    method: &MethodSchema,
    value: Option<&ParcelValue>,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = CallOutput {
                service: &service.service,
                method: &method.name,
                code: method.code,
                value: value_to_json(value),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["SERVICE", "METHOD", "CODE", "VALUE"]);
            table.add_row(vec![
                service.service.clone(),
                method.name.clone(),
                method.code.to_string(),
                value_text(value),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", value_text(value)),
    }
}

pub fn print_methods<'a>(
    services: impl IntoIterator<Item = &'a ServiceInterface>,
    format: OutputFormat,
) {
    let rows: Vec<MethodOutput<'_>> = services
        .into_iter()
        .flat_map(|service| {
            service.registry.methods().iter().map(move |method| MethodOutput {
                service: &service.service,
                interface: service.registry.name(),
                code: method.code,
                name: &method.name,
                arguments: method
                    .argument_types
                    .as_ref()
                    .map(|types| types.iter().map(|t| t.name()).collect()),
                returns: method.return_type.map(|t| t.name()),
            })
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            let mut table = new_table(vec!["SERVICE", "CODE", "METHOD", "ARGUMENTS", "RETURNS"]);
            for row in &rows {
                table.add_row(vec![
                    row.service.to_string(),
                    row.code.to_string(),
                    row.name.to_string(),
                    row.arguments
                        .as_ref()
                        .map_or_else(|| "?".to_string(), |args| args.join(", ")),
                    row.returns.unwrap_or("?").to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                let arguments = row
                    .arguments
                    .as_ref()
                    .map_or_else(|| "?".to_string(), |args| args.join(", "));
                println!(
                    "{} {:>3}  {} {}({})",
                    row.service,
                    row.code,
                    row.returns.unwrap_or("?"),
                    row.name,
                    arguments
                );
            }
        }
    }
}

pub fn print_decoded(bytes: &[u8], decoded: Option<&DecodedReturn>, format: OutputFormat) {
    let hex = hex_words(bytes);
    match format {
        OutputFormat::Json => {
            let out = DecodeOutput {
                bytes: hex,
                status: decoded.map(|d| d.status),
                value: value_to_json(decoded.and_then(|d| d.value.as_ref())),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["BYTES", "STATUS", "VALUE"]);
            table.add_row(vec![
                hex,
                decoded.map_or_else(String::new, |d| d.status.to_string()),
                decoded.map_or_else(String::new, |d| value_text(d.value.as_ref())),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("bytes: {hex}");
            if let Some(decoded) = decoded {
                println!("status: {}", decoded.status);
                println!("value: {}", value_text(decoded.value.as_ref()));
            }
        }
    }
}

/// Space-separated 4-byte groups, e.g. `00000000 01000000`.
fn hex_words(bytes: &[u8]) -> String {
    bytes
        .chunks(4)
        .map(|word| word.iter().map(|b| format!("{b:02x}")).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}
