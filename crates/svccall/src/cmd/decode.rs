use std::io::Read;

use svccall_parcel::{decode_record_dump, WireType};
use svccall_schema::MethodSchema;

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, parcel_error, schema_error, CliResult, SUCCESS};
use crate::output::{print_decoded, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| io_error("failed reading stdin", err))?;
            text
        }
    };

    let bytes = decode_record_dump(&text).map_err(|err| parcel_error("decode failed", err))?;
    let decoded = match args.return_type {
        Some(return_type) => Some(
            reply_schema(return_type.into())
                .decode_return(&bytes)
                .map_err(|err| schema_error("decode failed", err))?,
        ),
        None => None,
    };

    print_decoded(&bytes, decoded.as_ref(), format);
    Ok(SUCCESS)
}

fn reply_schema(return_type: WireType) -> MethodSchema {
    MethodSchema {
        code: 0,
        argument_types: Some(Vec::new()),
        return_type: Some(return_type),
        name: "reply".to_string(),
    }
}
