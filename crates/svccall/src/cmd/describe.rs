use crate::cmd::{load_catalog, DescribeArgs};
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_methods, OutputFormat};

pub fn run(args: DescribeArgs, format: OutputFormat) -> CliResult<i32> {
    let catalog = load_catalog(&args.definition)?;

    match &args.service {
        Some(name) => {
            let service = catalog
                .get(name)
                .map_err(|err| schema_error("describe failed", err))?;
            print_methods([service], format);
        }
        None => print_methods(catalog.services(), format),
    }

    Ok(SUCCESS)
}
