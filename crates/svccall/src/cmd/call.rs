use svccall_dispatch::{DispatchConfig, ServiceCaller};
use svccall_parcel::ParcelValue;
use svccall_schema::{MethodSchema, SchemaError, SchemaPart};
use svccall_transport::ShellStream;

use crate::cmd::{load_catalog, parse_duration, CallArgs, ChannelArgs};
use crate::exit::{
    dispatch_error, parcel_error, schema_error, transport_error, CliResult, SUCCESS,
};
use crate::output::{print_call, OutputFormat};

pub fn run(args: CallArgs, format: OutputFormat) -> CliResult<i32> {
    let catalog = load_catalog(&args.definition)?;
    let service = catalog
        .get(&args.service)
        .map_err(|err| schema_error("lookup failed", err))?;
    let method = service
        .registry
        .method(&args.method)
        .map_err(|err| schema_error("lookup failed", err))?;
    let arguments = parse_arguments(method, &args.args)?;

    let stream = open_channel(&args.channel)?;
    let config = DispatchConfig {
        max_reply_size: args.channel.max_reply_size,
        ..DispatchConfig::default()
    };
    let mut caller = ServiceCaller::with_config(stream, config);
    if !args.channel.no_prime {
        caller
            .send_newline()
            .map_err(|err| dispatch_error("prime failed", err))?;
    }

    let value = caller
        .call(service, &args.method, &arguments)
        .map_err(|err| dispatch_error("call failed", err))?;
    print_call(service, method, value.as_ref(), format);

    Ok(SUCCESS)
}

/// Parse command-line literals against the method's argument schema.
///
/// Runs before the channel is opened, so caller mistakes never reach the device.
fn parse_arguments(method: &MethodSchema, literals: &[String]) -> CliResult<Vec<ParcelValue>> {
    let Some(types) = &method.argument_types else {
        return Err(schema_error(
            "cannot call",
            SchemaError::SchemaUnknown {
                method: method.name.clone(),
                part: SchemaPart::Arguments,
            },
        ));
    };
    if types.len() != literals.len() {
        return Err(schema_error(
            "cannot call",
            SchemaError::ArityMismatch {
                method: method.name.clone(),
                expected: types.len(),
                given: literals.len(),
            },
        ));
    }

    types
        .iter()
        .zip(literals)
        .enumerate()
        .map(|(position, (wire_type, literal))| {
            wire_type
                .parse_value(literal)
                .map_err(|err| parcel_error(&format!("argument {}", position + 1), err))
        })
        .collect()
}

fn open_channel(args: &ChannelArgs) -> CliResult<ShellStream> {
    let stream = match &args.unix {
        #[cfg(unix)]
        Some(path) => ShellStream::connect_unix(path),
        #[cfg(not(unix))]
        Some(_) => {
            return Err(crate::exit::CliError::new(
                crate::exit::USAGE,
                "--unix is only supported on unix platforms",
            ))
        }
        None => ShellStream::connect_tcp(args.addr.as_str()),
    }
    .map_err(|err| transport_error("connect failed", err))?;

    if let Some(timeout) = &args.read_timeout {
        stream
            .set_read_timeout(Some(parse_duration(timeout)?))
            .map_err(|err| transport_error("configure failed", err))?;
    }
    Ok(stream)
}
